//! Lexical splitting of a raw pattern into argument tokens.
//!
//! A pattern is split on whitespace, but fragments are glued back together
//! (with a single space) while the accumulated text has an open bracket or an
//! open quoted span. This keeps default-value expressions such as
//! `--point=(1, 2)` in a single token.

use std::mem;

use log::debug;

use crate::error::{Error, Result};

/// Bracket nesting and quoting state over a stream of characters.
///
/// Quotes do not nest: the first quote character opens a span that only the
/// same character closes, and brackets inside the span are ignored.
#[derive(Debug, Default)]
pub(crate) struct Balance {
    stack: Vec<char>,
    quote: Option<char>,
}

impl Balance {
    pub(crate) fn push(&mut self, c: char) -> Result<()> {
        if let Some(quote) = self.quote {
            if c == quote {
                self.quote = None;
            }
            return Ok(());
        }

        match c {
            '"' | '\'' => self.quote = Some(c),
            '(' | '[' | '{' => self.stack.push(c),
            ')' | ']' | '}' => {
                let open = self.stack.pop().ok_or(Error::UnmatchedBracket(c))?;
                if opening_for(c) != open {
                    return Err(Error::MismatchedBrackets { open, close: c });
                }
            }
            _ => {}
        }

        Ok(())
    }

    pub(crate) fn push_str(&mut self, text: &str) -> Result<()> {
        text.chars().try_for_each(|c| self.push(c))
    }

    /// True when no bracket or quote is open.
    pub(crate) fn is_balanced(&self) -> bool {
        self.stack.is_empty() && self.quote.is_none()
    }
}

fn opening_for(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// Splits a pattern into raw argument tokens.
///
/// Every returned token is bracket- and quote-balanced.
///
/// # Errors
///
/// Returns a syntax error when brackets are mismatched (`(]`), when a closing
/// bracket has no opening one, or when a bracket or quote is still open at the
/// end of the pattern.
///
/// # Examples
///
/// ```
/// use argsketch_core::lexer::split_args;
///
/// let tokens = split_args("x:int --point=(1, 2) -v!").unwrap();
/// assert_eq!(tokens, vec!["x:int", "--point=(1, 2)", "-v!"]);
/// ```
pub fn split_args(pattern: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut pending = String::new();
    let mut balance = Balance::default();

    for fragment in pattern.split_whitespace() {
        if !pending.is_empty() {
            pending.push(' ');
        }
        pending.push_str(fragment);
        balance.push_str(fragment)?;

        if balance.is_balanced() {
            tokens.push(mem::take(&mut pending));
        }
    }

    if !pending.is_empty() {
        return Err(Error::UnclosedSpan(pending));
    }

    debug!("Split pattern `{}` into tokens: {:?}", pattern, tokens);
    Ok(tokens)
}
