//! Compiling the pattern selected on the command line.
//!
//! An inline `--pattern` is compiled directly. Otherwise the pattern
//! definition file is loaded and the command-line settings override the
//! settings it declares.

use argsketch_core::compile::{Compiled, Compiler};
use argsketch_core::emit::Namespace;
use argsketch_core::error::Result;
use argsketch_core::pattern_definitions::PatternDefinition;
use argsketch_core::value::{evaluate_all, LiteralEvaluator};
use argsketch_core::{config, file_handling};
use itertools::Itertools;
use log::debug;

use crate::cli_args::Args;

/// Applies the command-line overrides to a loaded definition.
#[must_use]
pub fn apply_overrides(mut definition: PatternDefinition, args: &Args) -> PatternDefinition {
    if !args.values.is_empty() {
        definition.values = Some(args.values.clone());
    }
    if args.no_infer_names {
        definition.infer_names = Some(false);
    }
    if let Some(name) = &args.name {
        definition.name = Some(name.clone());
    }
    definition
}

fn compile_inline(pattern: &str, args: &Args) -> Result<Compiled> {
    let evaluator = LiteralEvaluator::new();
    let values = evaluate_all(&args.values, &evaluator)?;

    let mut compiler = Compiler::new()
        .with_values(values)
        .with_infer_names(!args.no_infer_names)
        .with_evaluator(evaluator);
    if let Some(name) = &args.name {
        compiler = compiler.with_name(name.clone());
    }

    compiler.compile(pattern)
}

/// Compiles the pattern given inline or in the pattern definition file.
///
/// # Errors
///
/// Returns an error if the pattern file cannot be loaded or the pattern
/// does not compile.
pub fn compile(args: &Args) -> Result<Compiled> {
    if let Some(pattern) = &args.pattern {
        debug!("Compiling inline pattern `{}`", pattern);
        return compile_inline(pattern, args);
    }

    let pattern_path = config::get_pattern_path(args.pattern_file.as_deref());
    debug!("Pattern file path: `{}`", pattern_path);

    let definition = file_handling::get_pattern_definition(&pattern_path)?;
    apply_overrides(definition, args).compile()
}

/// Renders parsed values as `id = value` lines.
#[must_use]
pub fn format_namespace(namespace: &Namespace) -> String {
    namespace
        .iter()
        .map(|(id, value)| format!("{id} = {value}"))
        .join("\n")
}
