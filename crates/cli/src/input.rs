//! Input determination and validation.
//!
//! The command line to parse can be given either as one shell-like string or
//! as trailing arguments, but not both at once.

use argsketch_core::compile::Compiled;
use argsketch_core::emit::Namespace;
use argsketch_core::error::{Error, Result};

/// The command line handed to the compiled pattern.
#[derive(PartialEq, Clone, Debug)]
pub enum Input {
    /// Nothing to parse; only the compiled arguments are shown
    None,
    /// A single string given with `-c/--command`
    Command(String),
    /// Pre-split trailing arguments
    Tokens(Vec<String>),
}

impl Input {
    /// Parses the input with a compiled pattern. [`Input::None`] yields
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while building or running the parser.
    pub fn parse(&self, compiled: &Compiled) -> Result<Option<Namespace>> {
        match self {
            Self::None => Ok(None),
            Self::Command(line) => compiled.parse_str(line).map(Some),
            Self::Tokens(tokens) => compiled.parse(tokens).map(Some),
        }
    }
}

/// Trait for objects that can determine their input.
pub trait Provider {
    /// Validates that the input forms aren't mixed and returns the [`Input`].
    ///
    /// # Errors
    ///
    /// Returns an error if both input forms are present.
    fn get_input(&self) -> Result<Input>;
}

/// Determines the input from a command string and trailing arguments.
///
/// # Errors
///
/// Returns [`Error::MixedInput`] if both are provided.
///
/// # Examples
///
/// ```rust
/// use argsketch_cli::input::{determine, Input};
///
/// let input = determine(Some("-v 3"), &[]).unwrap();
/// assert_eq!(input, Input::Command("-v 3".to_string()));
///
/// let input = determine(None, &[]).unwrap();
/// assert_eq!(input, Input::None);
/// ```
pub fn determine(command: Option<&str>, tokens: &[String]) -> Result<Input> {
    match (command, tokens.is_empty()) {
        (Some(_), false) => Err(Error::MixedInput),
        (Some(command), true) => Ok(Input::Command(command.to_string())),
        (None, false) => Ok(Input::Tokens(tokens.to_vec())),
        (None, true) => Ok(Input::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argsketch_core::compile::Compiler;
    use argsketch_core::value::Value;

    #[test]
    fn test_determine_none() {
        assert_eq!(determine(None, &[]).unwrap(), Input::None);
    }

    #[test]
    fn test_determine_tokens() {
        let tokens = vec!["a".to_string(), "--b".to_string()];
        match determine(None, &tokens).unwrap() {
            Input::Tokens(values) => assert_eq!(values, tokens),
            other => panic!("Expected tokens, got {other:?}"),
        }
    }

    #[test]
    fn test_determine_mixed_error() {
        let tokens = vec!["a".to_string()];
        assert!(matches!(
            determine(Some("b"), &tokens).unwrap_err(),
            Error::MixedInput
        ));
    }

    #[test]
    fn test_parse_each_input() {
        let compiled = Compiler::new().compile("message --times:int=1").unwrap();

        assert!(Input::None.parse(&compiled).unwrap().is_none());

        let namespace = Input::Command("'hi there' -t 2".to_string())
            .parse(&compiled)
            .unwrap()
            .unwrap();
        assert_eq!(namespace["message"], Value::Str("hi there".to_string()));
        assert_eq!(namespace["times"], Value::Int(2));

        let namespace = Input::Tokens(vec!["hi there".to_string()])
            .parse(&compiled)
            .unwrap()
            .unwrap();
        assert_eq!(namespace["message"], Value::Str("hi there".to_string()));
        assert_eq!(namespace["times"], Value::Int(1));
    }
}
