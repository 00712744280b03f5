//! Argsketch CLI Library
//!
//! This crate provides the command-line interface for argsketch. It compiles a
//! pattern given inline or loaded from a pattern definition file, and parses a
//! command line with it.
//!
//! # Key Features
//!
//! - **Inline Patterns**: Compile a pattern passed with `-p/--pattern`
//! - **Pattern Files**: Load patterns, value references and help text from YAML
//! - **Dry Runs**: Show the compiled arguments without parsing anything
//! - **Two Input Forms**: A single shell-like string or pre-split arguments
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and validation
//! - [`input`]: Determining which command line to parse
//! - [`compilation`]: Compiling the selected pattern and rendering results
//!
//! # Examples
//!
//! The CLI binary (`argsketch`) can be used in several ways:
//!
//! ```bash
//! # Show what a pattern compiles to
//! argsketch -p '-v|verbose! --count:int=0 -a ^ -b' --dry-run
//!
//! # Parse trailing arguments
//! argsketch -p 'name --times:int=1' World --times 3
//!
//! # Parse a single command line string
//! argsketch -p 'name --times:int=1' -c "'Hello World' -t 2"
//!
//! # Use a pattern file with value references
//! argsketch -f deploy.yml -V "('dev', 'prod')" -- web --env prod
//! ```

pub mod cli_args;
pub mod compilation;
pub mod input;
