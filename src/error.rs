//! Error types for auditq.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for auditq operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The log path does not reference a regular file
    #[error("not a regular file: {0:?}")]
    NotAFile(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A field constraint failed to compile
    #[error("invalid pattern for field `{field}`: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// Constraint on a field name that cannot occur in an audit record
    #[error("invalid field name: {0:?}")]
    InvalidField(String),

    /// `older` / `newer` bound that is not a decimal timestamp
    #[error("invalid time bound for `{field}`: {value:?}")]
    InvalidBound { field: String, value: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for auditq operations.
pub type Result<T> = std::result::Result<T, Error>;
