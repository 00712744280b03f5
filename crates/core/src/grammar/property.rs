use crate::descriptor::{Arity, Descriptor};
use crate::error::{Error, Result};
use crate::grammar::Context;
use crate::lexer::Balance;
use crate::value::{resolve, Value};

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Byte index of the next `:` or `=` that is not inside brackets or quotes.
fn next_delimiter(text: &str) -> Result<Option<usize>> {
    let mut balance = Balance::default();
    for (index, c) in text.char_indices() {
        if (c == ':' || c == '=') && balance.is_balanced() {
            return Ok(Some(index));
        }
        balance.push(c)?;
    }
    Ok(None)
}

fn set_once<'a>(
    slot: &mut Option<&'a str>,
    kind: &'static str,
    text: &'a str,
    pattern: &str,
) -> Result<()> {
    if slot.is_some() {
        return Err(Error::DuplicateProperty(kind, pattern.to_string()));
    }
    *slot = Some(text);
    Ok(())
}

/// Parses the properties and the default following the modifiers.
///
/// Properties are separated by `:`. Each one is classified by its shape: an
/// identifier is the type, a count or one of `?`, `+`, `*` is the arity, and
/// anything else is the choices expression. A `=` ends the properties and the
/// remaining text is the default expression.
///
/// # Errors
///
/// Returns a syntax error for a rest not starting with `:` or `=`, for an
/// empty, repeated or fourth property, and propagates resolution errors for
/// the type, choices and default expressions.
pub fn parse_properties(
    descriptor: Descriptor,
    rest: &str,
    context: &Context<'_>,
) -> Result<Descriptor> {
    if rest.is_empty() {
        return Ok(descriptor);
    }

    if let Some(found) = rest.chars().next().filter(|c| *c != ':' && *c != '=') {
        return Err(Error::unexpected_character("':' or '='", found));
    }

    let pattern = descriptor.pattern().to_string();
    let mut value_type = None;
    let mut arity = None;
    let mut choices = None;
    let mut default = None;

    let mut rest = rest;
    while let Some(delimiter) = rest.chars().next() {
        let body = &rest[delimiter.len_utf8()..];
        if delimiter == '=' {
            default = Some(body);
            break;
        }

        if value_type.is_some() && arity.is_some() && choices.is_some() {
            return Err(Error::TooManyProperties(pattern));
        }

        let (property, tail) = match next_delimiter(body)? {
            Some(index) => body.split_at(index),
            None => (body, ""),
        };

        if property.is_empty() {
            return Err(Error::EmptyProperty(pattern));
        }

        if is_identifier(property) {
            set_once(&mut value_type, "type", property, &pattern)?;
        } else if let Some(parsed) = Arity::parse(property)? {
            if arity.is_some() {
                return Err(Error::DuplicateProperty("arity", pattern));
            }
            arity = Some(parsed);
        } else {
            set_once(&mut choices, "choices", property, &pattern)?;
        }

        rest = tail;
    }

    let mut descriptor = descriptor;

    if let Some(text) = value_type {
        match resolve(text, context.references, context.evaluator)? {
            Value::Type(value_type) => descriptor = descriptor.with_type(value_type),
            _ => return Err(Error::NotAType(text.to_string())),
        }
    }

    if let Some(arity) = arity {
        descriptor = descriptor.with_arity(arity);
    }

    if let Some(text) = choices {
        let resolved = resolve(text, context.references, context.evaluator)?;
        if resolved.items().is_none() {
            return Err(Error::NotACollection(text.to_string()));
        }
        descriptor = descriptor.with_choices(resolved);
    }

    if let Some(text) = default.filter(|text| !text.is_empty()) {
        descriptor = descriptor.with_default(resolve(text, context.references, context.evaluator)?);
    }

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::modifier::parse_modifiers;
    use crate::grammar::name::parse_name;
    use crate::value::{LiteralEvaluator, ValueType};

    fn properties_with(token: &str, references: &[Value]) -> Result<Descriptor> {
        let evaluator = LiteralEvaluator::new();
        let context = Context {
            references,
            evaluator: &evaluator,
            infer_names: false,
        };
        let (descriptor, rest) = parse_name(token, false)?;
        let (descriptor, rest) = parse_modifiers(descriptor, rest)?;
        parse_properties(descriptor, rest, &context)
    }

    fn properties(token: &str) -> Result<Descriptor> {
        properties_with(token, &[])
    }

    #[test]
    fn test_type_and_default() {
        let descriptor = properties("--count:int=0").unwrap();
        assert_eq!(descriptor.value_type(), Some(ValueType::Int));
        assert_eq!(descriptor.default(), Some(&Value::Int(0)));
        assert_eq!(descriptor.arity(), None);
        assert_eq!(descriptor.choices(), None);
    }

    #[test]
    fn test_default_only() {
        let descriptor = properties("--name='World'").unwrap();
        assert_eq!(descriptor.default(), Some(&Value::Str("World".to_string())));
        assert_eq!(descriptor.value_type(), None);
    }

    #[test]
    fn test_empty_default_is_unset() {
        let descriptor = properties("--name:str=").unwrap();
        assert_eq!(descriptor.default(), None);
    }

    #[test]
    fn test_all_three_properties_in_any_order() {
        for token in ["x:int:+:(1, 2, 3)", "x:(1, 2, 3):int:+", "x:+:(1, 2, 3):int"] {
            let descriptor = properties(token).unwrap();
            assert_eq!(descriptor.value_type(), Some(ValueType::Int), "{token}");
            assert_eq!(descriptor.arity(), Some(Arity::OneOrMore), "{token}");
            assert_eq!(
                descriptor.choices(),
                Some(&Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)])),
                "{token}"
            );
        }
    }

    #[test]
    fn test_arity_count() {
        let descriptor = properties("point:float:2").unwrap();
        assert_eq!(descriptor.arity(), Some(Arity::Exact(2)));
        assert_eq!(descriptor.value_type(), Some(ValueType::Float));
    }

    #[test]
    fn test_choices_with_delimiters_inside_brackets() {
        let descriptor = properties("--sep:{':', '='}=':'").unwrap();
        assert_eq!(
            descriptor.choices(),
            Some(&Value::Set(vec![
                Value::Str(":".to_string()),
                Value::Str("=".to_string())
            ]))
        );
        assert_eq!(descriptor.default(), Some(&Value::Str(":".to_string())));
    }

    #[test]
    fn test_required_count_with_default() {
        let descriptor = properties("-v!++=3").unwrap();
        assert_eq!(descriptor.required(), Some(true));
        assert_eq!(descriptor.default(), Some(&Value::Int(3)));
    }

    #[test]
    fn test_value_references() {
        let references = vec![
            Value::List(vec![Value::Str("a".to_string()), Value::Str("b".to_string())]),
            Value::Str("a".to_string()),
        ];
        let descriptor = properties_with("--mode:$0=$1", &references).unwrap();
        assert_eq!(descriptor.choices(), Some(&references[0]));
        assert_eq!(descriptor.default(), Some(&references[1]));

        assert!(matches!(
            properties_with("--mode=$2", &references).unwrap_err(),
            Error::ValueReference { index: 2, .. }
        ));
    }

    #[test]
    fn test_too_many_properties() {
        assert!(matches!(
            properties("x:int:+:(1, 2):str").unwrap_err(),
            Error::TooManyProperties(_)
        ));
    }

    #[test]
    fn test_duplicate_property() {
        assert!(matches!(
            properties("x:int:str").unwrap_err(),
            Error::DuplicateProperty("type", _)
        ));
        assert!(matches!(
            properties("x:+:2").unwrap_err(),
            Error::DuplicateProperty("arity", _)
        ));
    }

    #[test]
    fn test_empty_property() {
        assert!(matches!(
            properties("x::int").unwrap_err(),
            Error::EmptyProperty(_)
        ));
        assert!(matches!(properties("x:").unwrap_err(), Error::EmptyProperty(_)));
    }

    #[test]
    fn test_unexpected_character_after_modifiers() {
        assert!(matches!(
            properties("--x!!").unwrap_err(),
            Error::UnexpectedCharacter { found: '!', .. }
        ));
        assert!(matches!(
            properties("--x+").unwrap_err(),
            Error::UnexpectedCharacter { found: '+', .. }
        ));
    }

    #[test]
    fn test_type_must_be_a_converter() {
        assert!(matches!(
            properties("x:True").unwrap_err(),
            Error::NotAType(_)
        ));
        assert!(matches!(
            properties("x:path").unwrap_err(),
            Error::UnknownName(_)
        ));
    }

    #[test]
    fn test_choices_must_be_a_collection() {
        assert!(matches!(
            properties("x:'abc'").unwrap_err(),
            Error::NotACollection(_)
        ));
    }
}
