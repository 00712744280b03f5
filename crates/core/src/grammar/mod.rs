//! Grammar of a single pattern token.
//!
//! A token is parsed in three stages, each consuming a prefix of the token and
//! handing the rest to the next one:
//!
//! ```text
//! -v|verbose  !++  :int:+:(1, 2)  =1
//! names       modifiers  properties  default
//! ```
//!
//! The bare token `^` is the exclusive-group operator and skips the grammar.

use log::debug;

use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::value::{Evaluator, Value};

pub mod modifier;
pub mod name;
pub mod property;

pub use modifier::parse_modifiers;
pub use name::parse_name;
pub use property::parse_properties;

/// Literal text of the exclusive-group operator.
pub const EXCLUSIVE_OPERATOR: &str = "^";

/// What a token is resolved against.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// Values for `$0`, `$1`, ...
    pub references: &'a [Value],
    pub evaluator: &'a dyn Evaluator,
    /// Infer short names from long ones.
    pub infer_names: bool,
}

/// One element of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Argument(Descriptor),
    /// The `^` operator.
    Exclusive,
}

/// Parses one raw token into a descriptor or the `^` operator.
///
/// # Errors
///
/// Returns the first name, syntax or resolution error found in the token.
///
/// # Examples
///
/// ```
/// use argsketch_core::grammar::{parse_token, Context, Token};
/// use argsketch_core::value::LiteralEvaluator;
///
/// let evaluator = LiteralEvaluator::new();
/// let context = Context { references: &[], evaluator: &evaluator, infer_names: false };
///
/// let Token::Argument(descriptor) = parse_token("-v|verbose!", &context).unwrap() else {
///     panic!("expected an argument");
/// };
/// assert_eq!(descriptor.names(), vec!["-v", "--verbose"]);
/// assert_eq!(descriptor.required(), Some(true));
/// ```
pub fn parse_token(token: &str, context: &Context<'_>) -> Result<Token> {
    if token == EXCLUSIVE_OPERATOR {
        return Ok(Token::Exclusive);
    }

    let (descriptor, rest) = parse_name(token, context.infer_names)?;
    let (descriptor, rest) = parse_modifiers(descriptor, rest)?;
    let descriptor = parse_properties(descriptor, rest, context)?;

    debug!("Parsed token `{}` into {}", token, descriptor);
    Ok(Token::Argument(descriptor))
}
