//! Argsketch Core Library
//!
//! This crate compiles compact, single-line argument patterns into argument
//! declarations for [`clap`]. Instead of spelling out every argument with the
//! builder API, a caller writes one short pattern:
//!
//! ```text
//! -v|verbose! --count:int=0 -a ^ -b
//! ```
//!
//! # Key Features
//!
//! - **Tokenizing**: Splits patterns while keeping bracketed and quoted spans whole
//! - **Token Grammar**: Names, `!`/`++` modifiers, type/arity/choices properties and defaults
//! - **Value Resolution**: `$N` value references and a pluggable literal evaluator
//! - **Exclusive Groups**: Chains of `^` become mutually exclusive groups
//! - **Emission**: Builds a `clap::Command` and reads parsed values back
//! - **Pattern Files**: Loads pattern definitions from YAML
//!
//! # Examples
//!
//! ```
//! use argsketch_core::compile::Compiler;
//! use argsketch_core::value::Value;
//!
//! let compiled = Compiler::new().compile("name --times:int=1 -l|loud")?;
//! let namespace = compiled.parse_str("World --times 3")?;
//!
//! assert_eq!(namespace["name"], Value::Str("World".to_string()));
//! assert_eq!(namespace["times"], Value::Int(3));
//! assert_eq!(namespace["loud"], Value::Bool(false));
//! # Ok::<(), argsketch_core::error::Error>(())
//! ```
//!
//! # Trust
//!
//! Expressions inside patterns are evaluated by an [`value::Evaluator`]. The
//! default one only understands literals, but patterns should still come from
//! trusted sources.

pub mod compile;
pub mod config;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod file_handling;
pub mod grammar;
pub mod group;
pub mod lexer;
pub mod pattern_definitions;
pub mod value;
