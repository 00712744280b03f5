use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing argument name")]
    MissingName,

    #[error("Empty option name in `{}`", .0)]
    EmptyOptionName(String),

    #[error("Invalid number of leading hyphens in `{}`", .0)]
    LeadingHyphens(String),

    #[error("Expected one of {}, found {:?} instead", .expected, .found)]
    UnexpectedCharacter { expected: String, found: char },

    #[error("Unmatching brackets: {:?} {:?}", .open, .close)]
    MismatchedBrackets { open: char, close: char },

    #[error("Closing bracket {:?} has no opening bracket", .0)]
    UnmatchedBracket(char),

    #[error("Unterminated bracket or quote in `{}`", .0)]
    UnclosedSpan(String),

    #[error("Too many properties in `{}`", .0)]
    TooManyProperties(String),

    #[error("Duplicate {} property in `{}`", .0, .1)]
    DuplicateProperty(&'static str, String),

    #[error("Empty property in `{}`", .0)]
    EmptyProperty(String),

    #[error("Invalid arity `{}`", .0)]
    InvalidArity(String),

    #[error("Invalid '^' placement")]
    ExclusivePlacement,

    #[error("Cannot make a positional argument required: `{}`", .0)]
    RequiredPositional(String),

    #[error("Value reference ${} is out of range ({} values available)", .index, .available)]
    ValueReference { index: usize, available: usize },

    #[error("Error evaluating `{}`: {}", .expression, .reason)]
    Evaluation { expression: String, reason: String },

    #[error("Unknown name `{}`", .0)]
    UnknownName(String),

    #[error("Type property `{}` does not name a converter", .0)]
    NotAType(String),

    #[error("Choices `{}` must be a tuple, list or set", .0)]
    NotACollection(String),

    #[error("Cannot create a parser with no arguments")]
    NoArguments,

    #[error("Conflicting argument name: `{}`", .0)]
    ConflictingName(String),

    #[error("Unsupported argument `{}`: {}", .pattern, .reason)]
    Unsupported { pattern: String, reason: String },

    #[error("{}", .0)]
    Arguments(#[from] clap::Error),

    #[error("Cannot split command line `{}`: unbalanced quotes", .0)]
    ShellSplit(String),

    #[error("A command line string and trailing arguments cannot be mixed")]
    MixedInput,

    #[error("Error reading parsed value `{}`: {}", .id, .reason)]
    Matches { id: String, reason: String },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No patterns were found in the pattern definition YAML. Is `{}` empty?", .path)]
    EmptyPatternDefinition { path: String },
}

impl Error {
    pub fn unexpected_character(expected: &str, found: char) -> Self {
        Self::UnexpectedCharacter {
            expected: expected.to_string(),
            found,
        }
    }

    pub fn evaluation(expression: &str, reason: impl std::fmt::Display) -> Self {
        Self::Evaluation {
            expression: expression.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported(pattern: &str, reason: &str) -> Self {
        Self::Unsupported {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn empty_pattern_definition(path: String) -> Self {
        Self::EmptyPatternDefinition { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether the error comes from the pattern grammar itself, as opposed to
    /// value resolution or the downstream engine.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::LeadingHyphens(_)
                | Self::UnexpectedCharacter { .. }
                | Self::MismatchedBrackets { .. }
                | Self::UnmatchedBracket(_)
                | Self::UnclosedSpan(_)
                | Self::TooManyProperties(_)
                | Self::DuplicateProperty(..)
                | Self::EmptyProperty(_)
                | Self::InvalidArity(_)
                | Self::ExclusivePlacement
                | Self::RequiredPositional(_)
        )
    }
}
