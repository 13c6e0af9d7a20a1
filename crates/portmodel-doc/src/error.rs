//! Document error types.

use std::path::PathBuf;

/// Errors raised while reading a measurement document.
///
/// Every variant is fatal to a run: a document that cannot be read
/// completely is never half-processed.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// I/O error.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML syntax error.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required attribute is absent.
    #[error("<{element}> at line {line} is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: String,
        line: u32,
    },

    /// An attribute that must be a non-negative integer is not.
    #[error("<{element}> at line {line}: attribute '{attribute}' is not an integer: '{value}'")]
    InvalidInteger {
        element: String,
        attribute: String,
        value: String,
        line: u32,
    },

    /// An analyzer-tool version string is malformed.
    #[error("invalid tool version '{0}'")]
    InvalidVersion(String),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
