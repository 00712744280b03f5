//! Values embedded in patterns and their resolution.
//!
//! Type names, choices and defaults are written as expressions inside a
//! pattern. An expression of the form `$N` refers to the N-th caller supplied
//! reference value; anything else is handed to an [`Evaluator`].
//!
//! # Trust boundary
//!
//! Evaluation is caller controlled. The default [`LiteralEvaluator`] only
//! understands literals and names that were registered on it explicitly, so it
//! cannot reach anything the caller did not hand over. A custom evaluator can
//! be arbitrarily powerful; only compile pattern text you trust with it.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::{Error, Result};

/// Converter a pattern can name with a type property (`:int`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Str,
    Bool,
}

impl ValueType {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "str" => Some(Self::Str),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    /// Insertion ordered, without duplicates.
    Set(Vec<Value>),
    Type(ValueType),
}

impl Value {
    /// Builds a set, dropping repeated elements but keeping first-seen order.
    #[must_use]
    pub fn set(items: Vec<Value>) -> Self {
        let mut unique: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Self::Set(unique)
    }

    /// The elements of a tuple, list or set.
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) | Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => formatter.write_str("None"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
            Self::Tuple(items) if items.len() == 1 => write!(formatter, "({},)", items[0]),
            Self::Tuple(items) => write!(formatter, "({})", items.iter().join(", ")),
            Self::List(items) => write!(formatter, "[{}]", items.iter().join(", ")),
            Self::Set(items) => write!(formatter, "{{{}}}", items.iter().join(", ")),
            Self::Type(value_type) => write!(formatter, "{value_type}"),
        }
    }
}

/// Turns expression text from a pattern into a [`Value`].
///
/// Implementations decide how much power pattern text has over the calling
/// environment. Only compile patterns from trusted sources with an evaluator
/// that can reach anything beyond plain literals.
pub trait Evaluator {
    /// Evaluates one expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression cannot be evaluated.
    fn evaluate(&self, expression: &str) -> Result<Value>;
}

/// Evaluator for literal expressions.
///
/// Understands integers, floats, quoted strings, `True`/`False`/`None`, the
/// type names `int`, `float`, `str` and `bool`, tuples, lists and sets, plus
/// identifiers registered with [`LiteralEvaluator::with_name`].
///
/// # Examples
///
/// ```
/// use argsketch_core::value::{Evaluator, LiteralEvaluator, Value};
///
/// let evaluator = LiteralEvaluator::new().with_name("port", Value::Int(8080));
/// assert_eq!(evaluator.evaluate("port").unwrap(), Value::Int(8080));
/// assert_eq!(
///     evaluator.evaluate("(1, 'two')").unwrap(),
///     Value::Tuple(vec![Value::Int(1), Value::Str("two".to_string())])
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct LiteralEvaluator {
    names: IndexMap<String, Value>,
}

impl LiteralEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a name that expressions may refer to.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>, value: Value) -> Self {
        self.names.insert(name.into(), value);
        self
    }
}

impl Evaluator for LiteralEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value> {
        LiteralParser::new(expression, &self.names).parse()
    }
}

/// Resolves a value reference (`$N`) against `references`, or evaluates the
/// text otherwise.
///
/// # Errors
///
/// Returns [`Error::ValueReference`] for an out of range reference, and
/// whatever the evaluator returns for any other text.
pub fn resolve(text: &str, references: &[Value], evaluator: &dyn Evaluator) -> Result<Value> {
    match value_reference(text) {
        Some(index) => references
            .get(index)
            .cloned()
            .ok_or(Error::ValueReference {
                index,
                available: references.len(),
            }),
        None => evaluator.evaluate(text),
    }
}

/// Evaluates a list of expressions, e.g. reference values given as text.
///
/// # Errors
///
/// Returns the first evaluation error.
pub fn evaluate_all<S: AsRef<str>>(
    expressions: &[S],
    evaluator: &dyn Evaluator,
) -> Result<Vec<Value>> {
    expressions
        .iter()
        .map(|expression| evaluator.evaluate(expression.as_ref()))
        .collect()
}

fn value_reference(text: &str) -> Option<usize> {
    let digits = text.strip_prefix('$')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // A reference too large for usize is out of range either way.
    Some(digits.parse().unwrap_or(usize::MAX))
}

struct LiteralParser<'a> {
    expression: &'a str,
    chars: Vec<char>,
    pos: usize,
    names: &'a IndexMap<String, Value>,
}

impl<'a> LiteralParser<'a> {
    fn new(expression: &'a str, names: &'a IndexMap<String, Value>) -> Self {
        Self {
            expression,
            chars: expression.chars().collect(),
            pos: 0,
            names,
        }
    }

    fn parse(mut self) -> Result<Value> {
        let (mut items, trailing_comma) = self.items(None)?;
        if items.is_empty() {
            return Err(self.error("empty expression"));
        }
        if items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Tuple(items))
    }

    fn error(&self, reason: &str) -> Error {
        Error::evaluation(self.expression, reason)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Comma separated items up to `close` (or the end of input when `None`).
    /// Also reports whether the last item was followed by a comma.
    fn items(&mut self, close: Option<char>) -> Result<(Vec<Value>, bool)> {
        let mut items = Vec::new();
        let mut trailing_comma = false;

        loop {
            self.skip_whitespace();
            if self.peek() == close {
                break;
            }
            items.push(self.item()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    trailing_comma = true;
                }
                c if c == close => {
                    trailing_comma = false;
                    break;
                }
                Some(c) => return Err(self.error(&format!("unexpected character {c:?}"))),
                None => return Err(self.error("unexpected end of expression")),
            }
        }

        if close.is_some() {
            self.pos += 1;
        }
        Ok((items, trailing_comma))
    }

    fn item(&mut self) -> Result<Value> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let (mut items, trailing_comma) = self.items(Some(')'))?;
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::Tuple(items))
                }
            }
            Some('[') => {
                self.pos += 1;
                Ok(Value::List(self.items(Some(']'))?.0))
            }
            Some('{') => {
                self.pos += 1;
                Ok(Value::set(self.items(Some('}'))?.0))
            }
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                self.string(quote)
            }
            Some(c) if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => Err(self.error(&format!("unexpected character {c:?}"))),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn string(&mut self, quote: char) -> Result<Value> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) if c == quote => return Ok(Value::Str(value)),
                Some(c) => value.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    if matches!(self.chars.get(self.pos + 1), Some('-' | '+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
            self.pos += 1;
        }

        let literal: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        if literal.is_empty() {
            return Err(self.error("expected a number"));
        }

        if is_float {
            let value: f64 = literal.parse().map_err(|e| self.error(&format!("{e}")))?;
            Ok(Value::Float(if negative { -value } else { value }))
        } else {
            let value: i64 = literal.parse().map_err(|e| self.error(&format!("{e}")))?;
            Ok(Value::Int(if negative { -value } else { value }))
        }
    }

    fn name(&mut self) -> Result<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        match name.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            _ => {
                if let Some(value) = self.names.get(&name) {
                    return Ok(value.clone());
                }
                ValueType::from_name(&name)
                    .map(Value::Type)
                    .ok_or(Error::UnknownName(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(expression: &str) -> Result<Value> {
        LiteralEvaluator::new().evaluate(expression)
    }

    fn str_value(value: &str) -> Value {
        Value::Str(value.to_string())
    }

    #[test]
    fn test_evaluate_scalars() {
        assert_eq!(evaluate("42").unwrap(), Value::Int(42));
        assert_eq!(evaluate("-7").unwrap(), Value::Int(-7));
        assert_eq!(evaluate("1_000").unwrap(), Value::Int(1000));
        assert_eq!(evaluate("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(evaluate("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(evaluate("True").unwrap(), Value::Bool(true));
        assert_eq!(evaluate("False").unwrap(), Value::Bool(false));
        assert_eq!(evaluate("None").unwrap(), Value::None);
    }

    #[test]
    fn test_evaluate_strings() {
        assert_eq!(evaluate("'hello'").unwrap(), str_value("hello"));
        assert_eq!(evaluate("\"a b\"").unwrap(), str_value("a b"));
        assert_eq!(evaluate(r"'it\'s'").unwrap(), str_value("it's"));
        assert_eq!(evaluate(r#""tab\there""#).unwrap(), str_value("tab\there"));
    }

    #[test]
    fn test_evaluate_type_names() {
        assert_eq!(evaluate("int").unwrap(), Value::Type(ValueType::Int));
        assert_eq!(evaluate("float").unwrap(), Value::Type(ValueType::Float));
        assert_eq!(evaluate("str").unwrap(), Value::Type(ValueType::Str));
        assert_eq!(evaluate("bool").unwrap(), Value::Type(ValueType::Bool));
    }

    #[test]
    fn test_evaluate_collections() {
        assert_eq!(
            evaluate("(1, 2, 3)").unwrap(),
            Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            evaluate("1, 2").unwrap(),
            Value::Tuple(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(evaluate("(1,)").unwrap(), Value::Tuple(vec![Value::Int(1)]));
        assert_eq!(evaluate("(1)").unwrap(), Value::Int(1));
        assert_eq!(evaluate("()").unwrap(), Value::Tuple(vec![]));
        assert_eq!(
            evaluate("['a', [1, 2.5]]").unwrap(),
            Value::List(vec![
                str_value("a"),
                Value::List(vec![Value::Int(1), Value::Float(2.5)])
            ])
        );
    }

    #[test]
    fn test_evaluate_set_drops_duplicates() {
        assert_eq!(
            evaluate("{'b', 'a', 'b'}").unwrap(),
            Value::Set(vec![str_value("b"), str_value("a")])
        );
    }

    #[test]
    fn test_evaluate_registered_names() {
        let evaluator = LiteralEvaluator::new()
            .with_name("colors", Value::List(vec![str_value("red")]))
            .with_name("int", str_value("shadowed"));
        assert_eq!(
            evaluator.evaluate("colors").unwrap(),
            Value::List(vec![str_value("red")])
        );
        assert_eq!(evaluator.evaluate("int").unwrap(), str_value("shadowed"));
    }

    #[test]
    fn test_evaluate_unknown_name() {
        assert!(matches!(
            evaluate("open").unwrap_err(),
            Error::UnknownName(name) if name == "open"
        ));
    }

    #[test]
    fn test_evaluate_errors() {
        assert!(matches!(evaluate("").unwrap_err(), Error::Evaluation { .. }));
        assert!(matches!(evaluate("'abc").unwrap_err(), Error::Evaluation { .. }));
        assert!(matches!(evaluate("1 2").unwrap_err(), Error::Evaluation { .. }));
        assert!(matches!(evaluate("(1, 2").unwrap_err(), Error::Evaluation { .. }));
        assert!(matches!(evaluate("@").unwrap_err(), Error::Evaluation { .. }));
        assert!(matches!(evaluate("-").unwrap_err(), Error::Evaluation { .. }));
    }

    #[test]
    fn test_resolve_reference() {
        let references = vec![Value::Int(10), str_value("x")];
        let evaluator = LiteralEvaluator::new();
        assert_eq!(resolve("$0", &references, &evaluator).unwrap(), Value::Int(10));
        assert_eq!(resolve("$1", &references, &evaluator).unwrap(), str_value("x"));
    }

    #[test]
    fn test_resolve_reference_out_of_range() {
        let result = resolve("$2", &[Value::Int(1)], &LiteralEvaluator::new());
        assert!(matches!(
            result.unwrap_err(),
            Error::ValueReference {
                index: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_resolve_falls_back_to_evaluator() {
        let evaluator = LiteralEvaluator::new();
        assert_eq!(resolve("5", &[], &evaluator).unwrap(), Value::Int(5));
        // `$` without digits is not a reference
        assert!(resolve("$x", &[], &evaluator).is_err());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(str_value("a").to_string(), "a");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            Value::Tuple(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "(1, 2)"
        );
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(Value::Set(vec![Value::Int(1)]).to_string(), "{1}");
        assert_eq!(Value::Type(ValueType::Float).to_string(), "float");
    }
}
