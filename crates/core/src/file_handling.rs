//! File handling for argsketch pattern definitions.
//!
//! This module reads pattern definition YAML files and validates that they
//! actually declare patterns.

use std::fs::File;

use log::debug;

use crate::error::{Error, Result};
use crate::pattern_definitions::PatternDefinition;

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Loads a pattern definition from a YAML file.
///
/// # Arguments
///
/// * `pattern_path` - Path to the YAML pattern file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened
/// - The file contains invalid YAML or doesn't match the expected structure
/// - The file declares no patterns
pub fn get_pattern_definition(pattern_path: &str) -> Result<PatternDefinition> {
    let reader = get_reader("pattern definition", pattern_path)?;

    let definition: PatternDefinition = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "pattern definition".to_string(),
            pattern_path.to_string(),
            e,
        )
    })?;

    if definition.patterns.is_empty() {
        return Err(Error::empty_pattern_definition(pattern_path.to_string()));
    }

    debug!("Loaded {} from `{}`", definition, pattern_path);
    Ok(definition)
}
