//! Error types for the dictionary grammar

use thiserror::Error;

use crate::grammar::PatternId;

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;

/// Grammar errors
///
/// A line that does not match a pattern is not an error; matchers return
/// `None` for that.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Malformed pattern definition for {pattern}: {source}")]
    MalformedPattern {
        pattern: PatternId,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Invalid field type: {0}")]
    InvalidFieldType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
