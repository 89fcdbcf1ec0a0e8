//! Error types shared by the installer engine.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SbiError {
    /// A type-hint line that is not a valid `keyword=technology` mapping.
    #[error("invalid type hint on line {line} ({content:?}): {reason}")]
    Config {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("unknown installer type '{0}'")]
    UnknownTechnology(String),

    #[error("Please select files and options to install")]
    EmptySelection,

    #[error("invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T, E = SbiError> = std::result::Result<T, E>;
