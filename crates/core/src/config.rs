//! Pattern file path utilities for argsketch.
//!
//! This module resolves the pattern definition file path and expands shell
//! variables like `~` in it.

/// Default path for the pattern definition file
const DEFAULT_PATTERN_PATH: &str = "~/.argsketch/patterns.yml";

/// Resolves the pattern definition file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// pattern file path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `pattern_path_arg` - Optional custom pattern file path
///
/// # Returns
///
/// The resolved path to the pattern file
///
/// # Examples
///
/// ```
/// use argsketch_core::config::get_pattern_path;
///
/// // Use default path
/// let default_path = get_pattern_path(None);
///
/// // Use custom path
/// let custom_path = get_pattern_path(Some("/path/to/patterns.yml"));
/// assert_eq!(custom_path, "/path/to/patterns.yml");
/// ```
#[must_use]
pub fn get_pattern_path(pattern_path_arg: Option<&str>) -> String {
    let pattern_path = pattern_path_arg.unwrap_or(DEFAULT_PATTERN_PATH);

    shellexpand::tilde(pattern_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_pattern_path_with_custom_path() {
        let result = get_pattern_path(Some("/custom/path/patterns.yml"));
        assert_eq!(result, "/custom/path/patterns.yml");
    }

    #[test]
    fn test_get_pattern_path_with_none() {
        let result = get_pattern_path(None);
        // Should expand the tilde in the default path
        assert!(result.ends_with(".argsketch/patterns.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_pattern_path_with_tilde() {
        let result = get_pattern_path(Some("~/my-patterns.yml"));
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("my-patterns.yml"));
    }
}
