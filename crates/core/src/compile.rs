//! Assembly of a whole pattern into its compiled entries.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use log::info;

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::grammar::{parse_token, Context};
use crate::group::{resolve_groups, Entry};
use crate::lexer::split_args;
use crate::value::{Evaluator, LiteralEvaluator, Value};

/// Command name used in usage output when none is configured.
pub const DEFAULT_COMMAND_NAME: &str = "argsketch";

/// Compiles patterns into [`Compiled`] argument sets.
///
/// # Examples
///
/// ```
/// use argsketch_core::compile::Compiler;
/// use argsketch_core::value::Value;
///
/// let compiled = Compiler::new().compile("-v|verbose! --count:int=0").unwrap();
/// assert_eq!(compiled.entries().len(), 2);
///
/// let namespace = compiled.parse_str("-v --count 3").unwrap();
/// assert_eq!(namespace["verbose"], Value::Bool(true));
/// assert_eq!(namespace["count"], Value::Int(3));
/// ```
pub struct Compiler {
    name: String,
    references: Vec<Value>,
    infer_names: bool,
    evaluator: Box<dyn Evaluator>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            name: DEFAULT_COMMAND_NAME.to_string(),
            references: Vec::new(),
            infer_names: true,
            evaluator: Box::new(LiteralEvaluator::new()),
        }
    }
}

impl Compiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the values `$0`, `$1`, ... refer to.
    #[must_use]
    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.references = values;
        self
    }

    /// Whether options with only a long name get a short name inferred from
    /// its first letter. Enabled by default.
    #[must_use]
    pub fn with_infer_names(mut self, infer_names: bool) -> Self {
        self.infer_names = infer_names;
        self
    }

    /// Replaces the [`LiteralEvaluator`] used for expressions.
    ///
    /// The evaluator sees every type, choices and default expression of the
    /// patterns compiled with it.
    #[must_use]
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Compiles a whitespace separated pattern.
    ///
    /// # Errors
    ///
    /// Returns the first error found; nothing is compiled partially.
    pub fn compile(&self, pattern: &str) -> Result<Compiled> {
        let tokens = split_args(pattern)?;
        self.assemble(tokens, IndexMap::new(), false)
    }

    /// Compiles patterns that are already split, one token per item.
    ///
    /// # Errors
    ///
    /// Returns the first error found; nothing is compiled partially.
    pub fn compile_iter<I, S>(&self, patterns: I) -> Result<Compiled>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = patterns
            .into_iter()
            .map(|pattern| pattern.as_ref().to_string())
            .collect();
        self.assemble(tokens, IndexMap::new(), false)
    }

    /// Compiles a mapping from pattern token to help text. The resulting
    /// command gets a `-h/--help` flag.
    ///
    /// # Errors
    ///
    /// Returns the first error found; nothing is compiled partially.
    pub fn compile_mapping<I, K, V>(&self, mapping: I) -> Result<Compiled>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let help: IndexMap<String, String> = mapping
            .into_iter()
            .map(|(pattern, help)| (pattern.into(), help.into()))
            .collect();
        let tokens = help.keys().cloned().collect();
        self.assemble(tokens, help, true)
    }

    fn assemble(
        &self,
        tokens: Vec<String>,
        help: IndexMap<String, String>,
        help_flag: bool,
    ) -> Result<Compiled> {
        if tokens.is_empty() {
            return Err(Error::NoArguments);
        }

        let context = Context {
            references: &self.references,
            evaluator: self.evaluator.as_ref(),
            infer_names: self.infer_names,
        };

        let stream = tokens
            .iter()
            .map(|token| parse_token(token, &context))
            .collect::<Result<Vec<_>>>()?;
        let entries = resolve_groups(stream)?;

        info!(
            "Compiled {} tokens into {} entries for `{}`",
            tokens.len(),
            entries.len(),
            self.name
        );

        Ok(Compiled {
            name: self.name.clone(),
            entries,
            help,
            help_flag,
        })
    }
}

/// The result of compiling a pattern: standalone arguments and exclusive
/// groups, ready to be turned into a [`clap::Command`].
#[derive(Debug, Clone)]
pub struct Compiled {
    pub(crate) name: String,
    pub(crate) entries: Vec<Entry>,
    pub(crate) help: IndexMap<String, String>,
    pub(crate) help_flag: bool,
}

impl Compiled {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Every descriptor, group members included, in output order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> {
        self.entries.iter().flat_map(|entry| match entry {
            Entry::Argument(descriptor) => std::slice::from_ref(descriptor),
            Entry::Group(group) => group.members(),
        })
    }

    /// Help text for a descriptor, looked up by its pattern.
    #[must_use]
    pub fn help_for(&self, descriptor: &Descriptor) -> Option<&str> {
        self.help.get(descriptor.pattern()).map(String::as_str)
    }

    #[must_use]
    pub fn has_help_flag(&self) -> bool {
        self.help_flag
    }
}

impl PartialEq for Compiled {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Display for Compiled {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(formatter, "{entry}")?;
        }
        Ok(())
    }
}
