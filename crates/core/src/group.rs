//! Resolution of the `^` operator into exclusive groups.
//!
//! `a ^ b` makes `a` and `b` mutually exclusive. Chained operators share their
//! endpoints, so `a ^ b ^ c` is one group of three, while `a ^ b c ^ d` gives
//! two separate groups.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::grammar::Token;

/// Arguments of which at most one (exactly one when required) may be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    members: Vec<Descriptor>,
    required: bool,
}

impl Group {
    /// Builds a group, moving any member requirement onto the group itself.
    fn new(mut members: Vec<Descriptor>) -> Self {
        let required = members
            .iter()
            .any(|member| member.required() == Some(true));
        if required {
            members.iter_mut().for_each(Descriptor::clear_required);
        }
        Self { members, required }
    }

    #[must_use]
    pub fn members(&self) -> &[Descriptor] {
        &self.members
    }

    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }
}

impl Display for Group {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}{}",
            self.members.iter().map(|member| format!("[{member}]")).join(" ^ "),
            if self.required { " (required)" } else { "" }
        )
    }
}

/// One element of the compiled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Argument(Descriptor),
    Group(Group),
}

impl Display for Entry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argument(descriptor) => write!(formatter, "{descriptor}"),
            Self::Group(group) => write!(formatter, "{group}"),
        }
    }
}

/// Checks that every `^` sits between two arguments.
///
/// # Errors
///
/// Returns [`Error::ExclusivePlacement`] when the stream starts or ends with
/// `^`, or when two `^` follow each other.
pub fn validate_placement(tokens: &[Token]) -> Result<()> {
    let misplaced = matches!(tokens.first(), Some(Token::Exclusive))
        || matches!(tokens.last(), Some(Token::Exclusive))
        || tokens
            .iter()
            .tuple_windows()
            .any(|(first, second)| *first == Token::Exclusive && *second == Token::Exclusive);

    if misplaced {
        return Err(Error::ExclusivePlacement);
    }
    Ok(())
}

/// Turns a token stream into groups and standalone arguments.
///
/// Groups come first, in the order of their first member, followed by the
/// ungrouped arguments in their original order.
///
/// # Errors
///
/// Returns [`Error::ExclusivePlacement`] for a misplaced `^`.
pub fn resolve_groups(tokens: Vec<Token>) -> Result<Vec<Entry>> {
    validate_placement(&tokens)?;

    // Each run is a maximal chain of arguments joined by `^`.
    let mut runs: Vec<Vec<Descriptor>> = Vec::new();
    let mut joined = false;
    for token in tokens {
        match token {
            Token::Exclusive => joined = true,
            Token::Argument(descriptor) => {
                match runs.last_mut() {
                    Some(run) if joined => run.push(descriptor),
                    _ => runs.push(vec![descriptor]),
                }
                joined = false;
            }
        }
    }

    let (groups, standalone): (Vec<_>, Vec<_>) = runs.into_iter().partition(|run| run.len() > 1);

    let entries: Vec<Entry> = groups
        .into_iter()
        .map(|members| Entry::Group(Group::new(members)))
        .chain(standalone.into_iter().flatten().map(Entry::Argument))
        .collect();

    debug!(
        "Resolved {} entries: {}",
        entries.len(),
        entries.iter().join("; ")
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argument(name: &str) -> Token {
        Token::Argument(Descriptor::new(name, Some(format!("-{name}")), None).unwrap())
    }

    fn required(name: &str) -> Token {
        Token::Argument(
            Descriptor::new(name, Some(format!("-{name}")), None)
                .unwrap()
                .with_required(Some(true)),
        )
    }

    fn names(entry: &Entry) -> Vec<String> {
        match entry {
            Entry::Argument(descriptor) => descriptor.names(),
            Entry::Group(group) => group
                .members()
                .iter()
                .flat_map(Descriptor::names)
                .collect(),
        }
    }

    #[test]
    fn test_no_operators() {
        let entries = resolve_groups(vec![argument("a"), argument("b")]).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], Entry::Argument(_)));
        assert_eq!(names(&entries[1]), vec!["-b"]);
    }

    #[test]
    fn test_chain_makes_one_group() {
        let entries = resolve_groups(vec![
            argument("a"),
            Token::Exclusive,
            argument("b"),
            Token::Exclusive,
            argument("c"),
            Token::Exclusive,
            argument("d"),
        ])
        .unwrap();

        assert_eq!(entries.len(), 1);
        let Entry::Group(group) = &entries[0] else {
            panic!("expected a group");
        };
        assert_eq!(group.members().len(), 4);
        assert_eq!(names(&entries[0]), vec!["-a", "-b", "-c", "-d"]);
    }

    #[test]
    fn test_separate_groups() {
        let entries = resolve_groups(vec![
            argument("a"),
            Token::Exclusive,
            argument("b"),
            argument("c"),
            Token::Exclusive,
            argument("d"),
        ])
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(names(&entries[0]), vec!["-a", "-b"]);
        assert_eq!(names(&entries[1]), vec!["-c", "-d"]);
    }

    #[test]
    fn test_groups_come_before_standalone_arguments() {
        let entries = resolve_groups(vec![
            argument("x"),
            argument("a"),
            Token::Exclusive,
            argument("b"),
            argument("y"),
        ])
        .unwrap();

        let order: Vec<Vec<String>> = entries.iter().map(names).collect();
        assert_eq!(
            order,
            vec![
                vec!["-a".to_string(), "-b".to_string()],
                vec!["-x".to_string()],
                vec!["-y".to_string()],
            ]
        );
    }

    #[test]
    fn test_required_moves_to_group() {
        let entries =
            resolve_groups(vec![required("a"), Token::Exclusive, required("b")]).unwrap();

        let Entry::Group(group) = &entries[0] else {
            panic!("expected a group");
        };
        assert!(group.required());
        assert!(group
            .members()
            .iter()
            .all(|member| member.required().is_none()));
    }

    #[test]
    fn test_optional_group() {
        let entries =
            resolve_groups(vec![argument("a"), Token::Exclusive, argument("b")]).unwrap();
        let Entry::Group(group) = &entries[0] else {
            panic!("expected a group");
        };
        assert!(!group.required());
    }

    #[test]
    fn test_invalid_placement() {
        let cases = vec![
            vec![Token::Exclusive, argument("a")],
            vec![argument("a"), Token::Exclusive],
            vec![argument("a"), Token::Exclusive, Token::Exclusive, argument("b")],
            vec![Token::Exclusive],
        ];
        for tokens in cases {
            assert!(matches!(
                resolve_groups(tokens),
                Err(Error::ExclusivePlacement)
            ));
        }
    }

    #[test]
    fn test_group_display() {
        let entries =
            resolve_groups(vec![required("a"), Token::Exclusive, argument("b")]).unwrap();
        assert_eq!(entries[0].to_string(), "[-a] ^ [-b] (required)");
    }
}
