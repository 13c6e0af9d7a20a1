//! Error types for port-layout operations.

use std::path::PathBuf;

/// Errors that can occur while loading or validating port layouts.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error reading/writing layout files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Layout file not found.
    #[error("layout file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Validation error in a layout definition.
    #[error("invalid layout '{name}': {detail}")]
    Validation {
        /// Architecture the layout describes.
        name: String,
        /// Description of the validation failure.
        detail: String,
    },
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, TargetError>;
