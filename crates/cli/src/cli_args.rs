//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure and provides
//! validation for CLI arguments using the `clap` crate.

use crate::input::{determine, Input, Provider};
use argsketch_core::error::Result;
use clap::Parser;

/// Command-line arguments for the argsketch CLI tool.
///
/// A pattern is compiled either from `--pattern` or from a pattern definition
/// file, and then used to parse the command line given after it.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use argsketch_cli::cli_args::Args;
///
/// let args = Args::parse_from(["argsketch", "-p", "x:int", "--", "3"]);
/// assert_eq!(args.pattern.as_deref(), Some("x:int"));
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// An inline pattern, e.g. `-v|verbose! --count:int=0`.
    #[arg(long, short = 'p', conflicts_with = "pattern_file", allow_hyphen_values = true)]
    pub pattern: Option<String>,

    /// Path to a pattern definition YAML file.
    ///
    /// If neither this nor `--pattern` is given, defaults to
    /// `~/.argsketch/patterns.yml`.
    #[arg(long, short = 'f')]
    pub pattern_file: Option<String>,

    /// A literal expression that `$0`, `$1`, ... in the pattern refer to.
    ///
    /// Multiple values can be provided with repeated `-V` flags, in order.
    /// Replaces the values of a pattern file.
    #[arg(
        long = "value",
        short = 'V',
        action = clap::ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub values: Vec<String>,

    /// Do not infer short names from long option names.
    #[arg(long, action)]
    pub no_infer_names: bool,

    /// Command name used in usage and error output.
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Print the compiled arguments without parsing anything.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// A single command line to parse, split like a POSIX shell would.
    ///
    /// Cannot be mixed with trailing arguments.
    #[arg(long, short = 'c', allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Arguments to parse with the compiled pattern.
    ///
    /// Use `--` before the first argument if it starts with a hyphen.
    ///
    /// # Examples
    /// ```bash
    /// argsketch -p 'x:int --verbose' -- 3 --verbose
    /// ```
    #[arg(trailing_var_arg = true)]
    pub arguments: Vec<String>,
}

impl Provider for Args {
    /// Determines which command line to parse.
    ///
    /// # Errors
    ///
    /// Returns an error if both `--command` and trailing arguments are given.
    fn get_input(&self) -> Result<Input> {
        determine(self.command.as_deref(), &self.arguments)
    }
}
