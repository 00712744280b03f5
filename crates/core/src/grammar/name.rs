use crate::descriptor::Descriptor;
use crate::error::{Error, Result};

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Length of the leading run of name characters (letters, digits, hyphens).
fn name_len(text: &str) -> usize {
    text.find(|c| !is_name_char(c)).unwrap_or(text.len())
}

fn non_empty(name: &str, prefix: &str) -> Option<String> {
    let bare = name.trim_start_matches('-');
    (!bare.is_empty()).then(|| format!("{prefix}{bare}"))
}

/// Parses the leading names of a token.
///
/// - `name` is a positional argument,
/// - `-s` is a short option, optionally followed by `|long` (the long name's
///   hyphens may be omitted: `-v|verbose` and `-v|--verbose` are the same),
/// - `--long` is a long option.
///
/// Returns the descriptor and the unconsumed rest of the token.
///
/// # Errors
///
/// Returns [`Error::EmptyOptionName`] when no name is present and
/// [`Error::LeadingHyphens`] for three or more leading hyphens.
pub fn parse_name(token: &str, infer_short: bool) -> Result<(Descriptor, &str)> {
    let hyphens = token.len() - token.trim_start_matches('-').len();

    if hyphens == token.len() {
        return Err(Error::EmptyOptionName(token.to_string()));
    }

    let (short, long, rest) = match hyphens {
        0 => {
            let (name, rest) = token.split_at(name_len(token));
            (None, non_empty(name, ""), rest)
        }
        1 => {
            let (short, rest) = token.split_at(name_len(token));
            let short = non_empty(short, "-");
            match rest.strip_prefix('|') {
                Some(after) => {
                    let (long, rest) = after.split_at(name_len(after));
                    (short, non_empty(long, "--"), rest)
                }
                None => (short, None, rest),
            }
        }
        2 => {
            let (long, rest) = token.split_at(name_len(token));
            (None, non_empty(long, "--"), rest)
        }
        _ => return Err(Error::LeadingHyphens(token.to_string())),
    };

    if short.is_none() && long.is_none() {
        return Err(Error::EmptyOptionName(token.to_string()));
    }

    let descriptor = Descriptor::new(token, short, long)?.with_infer_short(infer_short);
    Ok((descriptor, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(token: &str) -> (Vec<String>, String) {
        let (descriptor, rest) = parse_name(token, false).unwrap();
        (descriptor.names(), rest.to_string())
    }

    #[test]
    fn test_positional_name() {
        assert_eq!(names("file"), (vec!["file".to_string()], String::new()));
        assert_eq!(names("dry-run:int"), (vec!["dry-run".to_string()], ":int".to_string()));
    }

    #[test]
    fn test_short_name() {
        assert_eq!(names("-v!"), (vec!["-v".to_string()], "!".to_string()));
    }

    #[test]
    fn test_short_and_long_name() {
        let expected = vec!["-v".to_string(), "--verbose".to_string()];
        assert_eq!(names("-v|verbose!"), (expected.clone(), "!".to_string()));
        assert_eq!(names("-v|--verbose"), (expected, String::new()));
    }

    #[test]
    fn test_long_name() {
        assert_eq!(
            names("--count:int=0"),
            (vec!["--count".to_string()], ":int=0".to_string())
        );
    }

    #[test]
    fn test_names_round_trip() {
        for (short, long) in [
            (Some("-x"), None),
            (None, Some("--exclude")),
            (Some("-x"), Some("--exclude")),
            (None, Some("target")),
        ] {
            let token = match (short, long) {
                (Some(short), Some(long)) => format!("{short}|{long}"),
                (Some(short), None) => short.to_string(),
                (None, Some(long)) => long.to_string(),
                (None, None) => unreachable!(),
            };
            let (descriptor, rest) = parse_name(&token, false).unwrap();
            assert!(rest.is_empty());
            assert_eq!(descriptor.short().as_deref(), short);
            assert_eq!(descriptor.long(), long);
        }
    }

    #[test]
    fn test_infer_short_flag_is_carried() {
        let (descriptor, _) = parse_name("--verbose", true).unwrap();
        assert!(descriptor.infer_short());
        assert_eq!(descriptor.names(), vec!["-v", "--verbose"]);
    }

    #[test]
    fn test_empty_option_name() {
        for token in ["-", "--", "---", "--:int", "-|", ":int", "=3"] {
            assert!(
                matches!(parse_name(token, false), Err(Error::EmptyOptionName(_))),
                "{token}"
            );
        }
    }

    #[test]
    fn test_too_many_hyphens() {
        assert!(matches!(
            parse_name("---verbose", false),
            Err(Error::LeadingHyphens(_))
        ));
    }

    #[test]
    fn test_pattern_is_retained() {
        let (descriptor, _) = parse_name("-v|verbose!", false).unwrap();
        assert_eq!(descriptor.pattern(), "-v|verbose!");
    }
}
