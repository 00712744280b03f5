use crate::descriptor::{Action, Descriptor};
use crate::error::{Error, Result};

/// Parses the `!` (required) and `++` (count) modifiers following the names.
///
/// A rest that is empty or exactly `!` makes an option a boolean toggle. For a
/// positional argument an empty rest leaves it untouched and `!` is an error.
///
/// Otherwise a leading `!`, then `++`, then a trailing `!` are consumed from
/// the first three characters. Only one of the two `!` may be present, so the
/// trailing form is only accepted right after `++`.
///
/// # Errors
///
/// Returns [`Error::RequiredPositional`] for a `!` on a positional and
/// [`Error::UnexpectedCharacter`] when the rest starts with anything other than
/// `:`, `+`, `=` or `!`.
pub fn parse_modifiers(descriptor: Descriptor, rest: &str) -> Result<(Descriptor, &str)> {
    if rest.is_empty() || rest == "!" {
        let required = rest == "!";
        if descriptor.is_positional() {
            if required {
                return Err(Error::RequiredPositional(descriptor.pattern().to_string()));
            }
            return Ok((descriptor, ""));
        }

        let descriptor = descriptor
            .with_action(Action::StoreTrue)
            .with_required(required.then_some(true));
        return Ok((descriptor, ""));
    }

    if let Some(found) = rest.chars().next().filter(|c| !":+=!".contains(*c)) {
        return Err(Error::unexpected_character("':', '++', '!', or '='", found));
    }

    let mut rest = rest;
    let mut required = false;
    let mut count = false;

    if let Some(after) = rest.strip_prefix('!') {
        required = true;
        rest = after;
    }
    if let Some(after) = rest.strip_prefix("++") {
        count = true;
        rest = after;
    }
    if count && !required {
        if let Some(after) = rest.strip_prefix('!') {
            required = true;
            rest = after;
        }
    }

    if required && descriptor.is_positional() {
        return Err(Error::RequiredPositional(descriptor.pattern().to_string()));
    }

    let mut descriptor = descriptor.with_required(required.then_some(true));
    if count {
        descriptor = descriptor.with_action(Action::Count);
    }

    Ok((descriptor, rest))
}
