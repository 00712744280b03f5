//! Emission of compiled entries into a [`clap::Command`] and reading parsed
//! values back out of it.

use std::collections::HashSet;
use std::ffi::OsString;
use std::num::{ParseFloatError, ParseIntError};

use clap::builder::{BoolValueParser, PossibleValuesParser, TypedValueParser, ValueParser};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

use crate::compile::Compiled;
use crate::descriptor::{Action, Arity, Descriptor};
use crate::error::{Error, Result};
use crate::group::Entry;
use crate::value::{Value, ValueType};

/// Parsed values by argument id, in declaration order.
pub type Namespace = IndexMap<String, Value>;

fn parse_int(text: &str) -> std::result::Result<i64, ParseIntError> {
    text.parse()
}

fn parse_float(text: &str) -> std::result::Result<f64, ParseFloatError> {
    text.parse()
}

/// Numbers compare by value, so `1` and `1.0` are the same choice.
fn is_choice(value: &Value, choices: &[Value]) -> bool {
    choices.iter().any(|choice| match (choice, value) {
        (Value::Int(int), Value::Float(float)) | (Value::Float(float), Value::Int(int)) => {
            *int as f64 == *float
        }
        _ => choice == value,
    })
}

/// Converts with `parser` first, then checks the converted value.
fn restricted<P>(parser: P, choices: &[Value], wrap: fn(P::Value) -> Value) -> ValueParser
where
    P: TypedValueParser,
{
    let choices = choices.to_vec();
    ValueParser::new(parser.try_map(move |value| {
        if is_choice(&wrap(value.clone()), &choices) {
            Ok(value)
        } else {
            Err(format!("expected one of {}", choices.iter().join(", ")))
        }
    }))
}

fn value_parser(value_type: ValueType, choices: Option<&Value>) -> ValueParser {
    match (value_type, choices.and_then(Value::items)) {
        (ValueType::Int, None) => ValueParser::new(parse_int),
        (ValueType::Int, Some(choices)) => restricted(parse_int, choices, Value::Int),
        (ValueType::Float, None) => ValueParser::new(parse_float),
        (ValueType::Float, Some(choices)) => restricted(parse_float, choices, Value::Float),
        (ValueType::Bool, None) => ValueParser::bool(),
        (ValueType::Bool, Some(choices)) => {
            restricted(BoolValueParser::new(), choices, Value::Bool)
        }
        (ValueType::Str, None) => ValueParser::string(),
        (ValueType::Str, Some(choices)) => {
            let names: Vec<String> = choices.iter().map(ToString::to_string).collect();
            ValueParser::new(PossibleValuesParser::new(names))
        }
    }
}

fn with_arity(arg: Arg, arity: Arity, pattern: &str) -> Result<Arg> {
    Ok(match arity {
        Arity::Exact(0) => return Err(Error::unsupported(pattern, "an arity of 0 takes no values")),
        Arity::Exact(count) => arg.num_args(count),
        Arity::Optional => arg.num_args(0..=1),
        Arity::OneOrMore => arg.num_args(1..),
        Arity::ZeroOrMore => arg.num_args(0..),
    })
}

/// Only string defaults of typed arguments are handed to clap, which converts
/// them like any other value. Every other default is reported as resolved.
fn forwards_default(descriptor: &Descriptor) -> bool {
    matches!(descriptor.default(), Some(Value::Str(_))) && descriptor.value_type().is_some()
}

fn with_default(arg: Arg, descriptor: &Descriptor) -> Arg {
    match descriptor.default() {
        Some(Value::Str(default)) if forwards_default(descriptor) => {
            arg.default_value(default.clone())
        }
        _ => arg,
    }
}

fn flag_action(arg: Arg, descriptor: &Descriptor, action: Action) -> Result<Arg> {
    let pattern = descriptor.pattern();
    if descriptor.is_positional() {
        return Err(Error::unsupported(pattern, "flag actions need an option name"));
    }
    if descriptor.value_type().is_some()
        || descriptor.arity().is_some()
        || descriptor.choices().is_some()
    {
        return Err(Error::unsupported(
            pattern,
            "flag actions take no type, arity or choices",
        ));
    }

    if action == Action::Count
        && !matches!(descriptor.default(), None | Some(Value::None | Value::Int(_)))
    {
        return Err(Error::unsupported(pattern, "a count can only start from an integer"));
    }

    Ok(arg.action(match action {
        Action::StoreTrue => ArgAction::SetTrue,
        Action::Count => ArgAction::Count,
    }))
}

fn value_action(arg: Arg, descriptor: &Descriptor) -> Result<Arg> {
    let mut arg = arg.action(ArgAction::Set).value_parser(value_parser(
        descriptor.value_type().unwrap_or(ValueType::Str),
        descriptor.choices(),
    ));
    if let Some(arity) = descriptor.arity() {
        arg = with_arity(arg, arity, descriptor.pattern())?;
    }
    Ok(with_default(arg, descriptor))
}

/// Positionals are required unless they may take no value or have a default.
fn positional_is_optional(descriptor: &Descriptor) -> bool {
    matches!(
        descriptor.arity(),
        Some(Arity::Optional | Arity::ZeroOrMore)
    ) || descriptor.default().is_some()
}

fn read<T>(matches: &ArgMatches, id: &str, multiple: bool, wrap: fn(T) -> Value) -> Result<Value>
where
    T: Clone + Send + Sync + 'static,
{
    let matches_error = |e: clap::parser::MatchesError| Error::Matches {
        id: id.to_string(),
        reason: e.to_string(),
    };

    if multiple {
        let values = matches.try_get_many::<T>(id).map_err(matches_error)?;
        Ok(values.map_or(Value::None, |values| {
            Value::List(values.cloned().map(wrap).collect())
        }))
    } else {
        let value = matches.try_get_one::<T>(id).map_err(matches_error)?;
        Ok(value.cloned().map_or(Value::None, wrap))
    }
}

impl Compiled {
    fn check_conflicts(&self) -> Result<()> {
        let mut names: HashSet<String> = HashSet::new();
        let mut ids: HashSet<String> = HashSet::new();
        if self.help_flag {
            names.extend(["-h".to_string(), "--help".to_string()]);
            ids.insert("help".to_string());
        }

        for descriptor in self.descriptors() {
            for name in descriptor.names() {
                if !names.insert(name.clone()) {
                    return Err(Error::ConflictingName(name));
                }
            }
            let id = descriptor.id();
            if !ids.insert(id.clone()) {
                return Err(Error::ConflictingName(id));
            }
        }

        Ok(())
    }

    /// Positionals are matched by index, so an optional one may not precede a
    /// required one and only the last may take a variable number of values.
    fn check_positionals(&self) -> Result<()> {
        let positionals: Vec<&Descriptor> = self
            .descriptors()
            .filter(|descriptor| descriptor.is_positional())
            .collect();

        let mut seen_optional = false;
        for (index, descriptor) in positionals.iter().enumerate() {
            let optional = positional_is_optional(descriptor);
            if seen_optional && !optional {
                return Err(Error::unsupported(
                    descriptor.pattern(),
                    "a required positional argument cannot follow an optional one",
                ));
            }
            seen_optional |= optional;

            let variable = matches!(
                descriptor.arity(),
                Some(Arity::OneOrMore | Arity::ZeroOrMore)
            );
            if variable && index + 1 < positionals.len() {
                return Err(Error::unsupported(
                    descriptor.pattern(),
                    "only the last positional argument may take a variable number of values",
                ));
            }
        }

        Ok(())
    }

    fn arg(&self, descriptor: &Descriptor, grouped: bool) -> Result<Arg> {
        let pattern = descriptor.pattern();
        let mut arg = Arg::new(descriptor.id());

        if let Some(short) = descriptor.short() {
            let mut chars = short.trim_start_matches('-').chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => arg = arg.short(c),
                _ => {
                    return Err(Error::unsupported(
                        pattern,
                        "short names must be a single character",
                    ))
                }
            }
        }

        if !descriptor.is_positional() {
            if let Some(long) = descriptor.long() {
                arg = arg.long(long.trim_start_matches('-').to_string());
            }
        }

        arg = match descriptor.action() {
            Some(action) => flag_action(arg, descriptor, action)?,
            None => value_action(arg, descriptor)?,
        };

        if descriptor.is_positional() {
            let optional = positional_is_optional(descriptor);
            if grouped && !optional {
                return Err(Error::unsupported(
                    pattern,
                    "positional arguments in an exclusive group must be optional",
                ));
            }
            arg = arg.required(!optional);
        } else if descriptor.required() == Some(true) {
            arg = arg.required(true);
        }

        if let Some(help) = self.help_for(descriptor) {
            arg = arg.help(help.to_string());
        }

        Ok(arg)
    }

    /// Builds the clap command for the compiled entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingName`] when two arguments share a name and
    /// [`Error::Unsupported`] for arguments or positional layouts clap cannot
    /// express.
    pub fn command(&self) -> Result<Command> {
        self.check_conflicts()?;
        self.check_positionals()?;

        let mut command = Command::new(self.name.clone()).disable_help_flag(!self.help_flag);

        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                Entry::Argument(descriptor) => {
                    command = command.arg(self.arg(descriptor, false)?);
                }
                Entry::Group(group) => {
                    let mut ids = Vec::with_capacity(group.members().len());
                    for member in group.members() {
                        command = command.arg(self.arg(member, true)?);
                        ids.push(member.id());
                    }
                    command = command.group(
                        // `_` never occurs in argument ids
                        ArgGroup::new(format!("exclusive_{index}"))
                            .args(ids)
                            .multiple(false)
                            .required(group.required()),
                    );
                }
            }
        }

        debug!("Built command `{}` from {} entries", self.name, self.entries.len());
        Ok(command)
    }

    /// Parses pre-tokenized arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] when clap rejects the arguments, including
    /// requests for help, and any error from [`Compiled::command`].
    pub fn parse<I, T>(&self, args: I) -> Result<Namespace>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let command = self.command()?;
        let argv = std::iter::once(OsString::from(&self.name))
            .chain(args.into_iter().map(Into::into));
        let matches = command.try_get_matches_from(argv)?;
        self.namespace(&matches)
    }

    /// Parses a single command line, split the way a POSIX shell would.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellSplit`] for unbalanced quotes, otherwise the same
    /// errors as [`Compiled::parse`].
    pub fn parse_str(&self, line: &str) -> Result<Namespace> {
        let args = shlex::split(line).ok_or_else(|| Error::ShellSplit(line.to_string()))?;
        self.parse(args)
    }

    fn namespace(&self, matches: &ArgMatches) -> Result<Namespace> {
        let mut namespace = Namespace::new();

        for descriptor in self.descriptors() {
            let id = descriptor.id();
            let multiple = descriptor.arity().is_some_and(Arity::is_multiple);

            let given = matches.value_source(&id) == Some(ValueSource::CommandLine);
            if let Some(default) = descriptor.default().filter(|_| !given) {
                if !forwards_default(descriptor) {
                    namespace.insert(id, default.clone());
                    continue;
                }
            }

            let value = match descriptor.action() {
                Some(Action::StoreTrue) => read::<bool>(matches, &id, false, Value::Bool)?,
                Some(Action::Count) => {
                    let count = read::<u8>(matches, &id, false, |count| {
                        Value::Int(i64::from(count))
                    })?;
                    // Occurrences add to the default
                    match (count, descriptor.default()) {
                        (Value::Int(count), Some(Value::Int(start))) => Value::Int(start + count),
                        (count, _) => count,
                    }
                }
                None => match descriptor.value_type().unwrap_or(ValueType::Str) {
                    ValueType::Int => read::<i64>(matches, &id, multiple, Value::Int)?,
                    ValueType::Float => read::<f64>(matches, &id, multiple, Value::Float)?,
                    ValueType::Str => read::<String>(matches, &id, multiple, Value::Str)?,
                    ValueType::Bool => read::<bool>(matches, &id, multiple, Value::Bool)?,
                },
            };

            namespace.insert(id, value);
        }

        Ok(namespace)
    }
}
