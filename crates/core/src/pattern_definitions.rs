use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::compile::{Compiled, Compiler};
use crate::error::Result;
use crate::value::{evaluate_all, LiteralEvaluator};

/// The patterns of a definition file: either plain tokens, or tokens mapped to
/// their help text.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Patterns {
    List(Vec<String>),
    Help(IndexMap<String, String>),
}

impl Patterns {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(patterns) => patterns.len(),
            Self::Help(patterns) => patterns.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PatternDefinition {
    pub name: Option<String>,
    pub infer_names: Option<bool>,
    /// Literal expressions for `$0`, `$1`, ...
    pub values: Option<Vec<String>>,
    pub patterns: Patterns,
}

impl PatternDefinition {
    /// A compiler configured from this definition.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the reference values cannot be evaluated.
    pub fn compiler(&self) -> Result<Compiler> {
        let evaluator = LiteralEvaluator::new();
        let values = evaluate_all(self.values.as_deref().unwrap_or_default(), &evaluator)?;

        let mut compiler = Compiler::new()
            .with_values(values)
            .with_infer_names(self.infer_names.unwrap_or(true))
            .with_evaluator(evaluator);
        if let Some(name) = &self.name {
            compiler = compiler.with_name(name.clone());
        }

        Ok(compiler)
    }

    /// Compiles the patterns; the mapping form attaches help text.
    ///
    /// # Errors
    ///
    /// Returns the first error found while compiling.
    pub fn compile(&self) -> Result<Compiled> {
        let compiler = self.compiler()?;
        match &self.patterns {
            Patterns::List(patterns) => compiler.compile_iter(patterns),
            Patterns::Help(patterns) => compiler.compile_mapping(patterns.clone()),
        }
    }
}

impl Display for PatternDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(formatter, "{} ({} patterns)", name, self.patterns.len()),
            None => write!(formatter, "{} patterns", self.patterns.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_deserialize_list() {
        let definition: PatternDefinition = serde_yaml::from_str(
            r#"
patterns:
  - "x:int"
  - "-v|verbose"
"#,
        )
        .unwrap();
        assert!(matches!(definition.patterns, Patterns::List(ref p) if p.len() == 2));
        assert!(definition.name.is_none());
    }

    #[test]
    fn test_deserialize_mapping_keeps_order() {
        let definition: PatternDefinition = serde_yaml::from_str(
            r#"
name: power
patterns:
  "y:int": "the exponent"
  "x:int": "the base"
"#,
        )
        .unwrap();
        let Patterns::Help(patterns) = &definition.patterns else {
            panic!("expected a mapping");
        };
        let keys: Vec<&str> = patterns.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["y:int", "x:int"]);
        assert_eq!(definition.to_string(), "power (2 patterns)");
    }

    #[test]
    fn test_compile_with_values() {
        let definition: PatternDefinition = serde_yaml::from_str(
            r#"
infer_names: false
values: ["('fast', 'slow')"]
patterns: ["--mode:$0=\"fast\""]
"#,
        )
        .unwrap();
        let compiled = definition.compile().unwrap();
        let descriptor = compiled.descriptors().next().unwrap();
        assert_eq!(descriptor.names(), vec!["--mode"]);
        assert_eq!(descriptor.default(), Some(&Value::Str("fast".to_string())));
    }
}
