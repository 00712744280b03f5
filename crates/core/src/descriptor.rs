//! The structured form of one declared argument.
//!
//! A [`Descriptor`] is built in stages by the grammar parsers. Every stage
//! consumes the descriptor and returns an updated one, so a descriptor is never
//! shared while it is only partially built.
//!
//! Equality and hashing only look at the observable names (the short name,
//! inferred or not, followed by the long name). Two descriptors for `--count`
//! are equal even when their types or defaults differ, which is what group
//! membership and conflict checks rely on.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A boolean toggle.
    StoreTrue,
    /// Counts occurrences.
    Count,
}

impl Action {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StoreTrue => "store_true",
            Self::Count => "count",
        }
    }
}

/// How many values an argument takes ("nargs").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    /// `?`
    Optional,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl Arity {
    /// Parses an arity property, returning `Ok(None)` for text that is not an
    /// arity at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArity`] for a count that does not fit in `usize`.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        match text {
            "?" => Ok(Some(Self::Optional)),
            "+" => Ok(Some(Self::OneOrMore)),
            "*" => Ok(Some(Self::ZeroOrMore)),
            _ if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => text
                .parse()
                .map(|count| Some(Self::Exact(count)))
                .map_err(|_| Error::InvalidArity(text.to_string())),
            _ => Ok(None),
        }
    }

    /// Whether the argument yields a list of values rather than one value.
    #[must_use]
    pub fn is_multiple(self) -> bool {
        !matches!(self, Self::Optional)
    }
}

impl Display for Arity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(count) => write!(formatter, "{count}"),
            Self::Optional => formatter.write_str("?"),
            Self::OneOrMore => formatter.write_str("+"),
            Self::ZeroOrMore => formatter.write_str("*"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Descriptor {
    pattern: String,
    short: Option<String>,
    long: Option<String>,
    required: Option<bool>,
    action: Option<Action>,
    arity: Option<Arity>,
    value_type: Option<ValueType>,
    choices: Option<Value>,
    default: Option<Value>,
    infer_short: bool,
}

impl Descriptor {
    /// Creates a descriptor with names only.
    ///
    /// Names are stored as written: `-v`, `--verbose`, or a bare positional
    /// name in `long`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingName`] when neither name is given.
    pub fn new(pattern: &str, short: Option<String>, long: Option<String>) -> Result<Self> {
        let short = short.filter(|name| !name.is_empty());
        let long = long.filter(|name| !name.is_empty());
        if short.is_none() && long.is_none() {
            return Err(Error::MissingName);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            short,
            long,
            required: None,
            action: None,
            arity: None,
            value_type: None,
            choices: None,
            default: None,
            infer_short: false,
        })
    }

    #[must_use]
    pub fn with_infer_short(mut self, infer_short: bool) -> Self {
        self.infer_short = infer_short;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: Option<bool>) -> Self {
        self.required = required;
        self
    }

    /// Sets the action. A count starts at `0` unless a default was already set.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        if action == Action::Count && self.default.is_none() {
            self.default = Some(Value::Int(0));
        }
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    #[must_use]
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Value) -> Self {
        self.choices = Some(choices);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Hands the requirement over to an enclosing exclusive group.
    pub(crate) fn clear_required(&mut self) {
        self.required = None;
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The short name, inferred from the long one (`--verbose` gives `-v`)
    /// when inference is enabled and no short name was written.
    #[must_use]
    pub fn short(&self) -> Option<String> {
        if self.short.is_none() && self.infer_short {
            let inferred = self
                .long
                .as_deref()
                .and_then(|long| long.strip_prefix("--"))
                .and_then(|name| name.chars().next());
            if let Some(first) = inferred {
                return Some(format!("-{first}"));
            }
        }
        self.short.clone()
    }

    #[must_use]
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The observable name tuple: short name (if any) then long name (if any).
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.short().into_iter().chain(self.long.clone()).collect()
    }

    /// True for arguments written without leading hyphens.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.as_deref().is_some_and(|name| !name.starts_with('-'))
    }

    /// Identifier under which the parsed value is reported.
    #[must_use]
    pub fn id(&self) -> String {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or_default()
            .trim_start_matches('-')
            .to_string()
    }

    #[must_use]
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    #[must_use]
    pub fn arity(&self) -> Option<Arity> {
        self.arity
    }

    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    #[must_use]
    pub fn choices(&self) -> Option<&Value> {
        self.choices.as_ref()
    }

    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn infer_short(&self) -> bool {
        self.infer_short
    }

    /// The attributes that were actually set, rendered for display.
    #[must_use]
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let mut properties = Vec::new();
        if let Some(required) = self.required {
            properties.push(("required", required.to_string()));
        }
        if let Some(arity) = self.arity {
            properties.push(("nargs", arity.to_string()));
        }
        if let Some(value_type) = self.value_type {
            properties.push(("type", value_type.to_string()));
        }
        if let Some(default) = &self.default {
            properties.push(("default", default.to_string()));
        }
        if let Some(choices) = &self.choices {
            properties.push(("choices", choices.to_string()));
        }
        if let Some(action) = self.action {
            properties.push(("action", action.name().to_string()));
        }
        properties
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.names() == other.names()
    }
}

impl Eq for Descriptor {}

impl Hash for Descriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.names().hash(state);
    }
}

impl Display for Descriptor {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.names().join(", "))?;

        let properties = self.properties();
        if !properties.is_empty() {
            write!(
                formatter,
                " ({})",
                properties
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .join(", ")
            )?;
        }

        Ok(())
    }
}
