//! Model-building errors.

use thiserror::Error;

/// Errors raised while turning measurement records into model entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An operand could not be mapped to a parameter class.
    ///
    /// Non-fatal: the builder reports it and applies its operand policy.
    #[error("unrecognized operand: {detail}")]
    UnrecognizedOperand { detail: String },

    /// A port counter or divider attribute is not a non-negative integer.
    #[error("invalid counter {key}=\"{value}\"")]
    InvalidCounter { key: String, value: String },

    /// A record of a specific instruction is malformed.
    #[error("{mnemonic} on {arch}")]
    Record {
        mnemonic: String,
        arch: String,
        #[source]
        source: Box<ModelError>,
    },
}

impl ModelError {
    pub(crate) fn operand(detail: impl Into<String>) -> Self {
        ModelError::UnrecognizedOperand {
            detail: detail.into(),
        }
    }

    pub(crate) fn in_record(self, mnemonic: &str, arch: &str) -> Self {
        ModelError::Record {
            mnemonic: mnemonic.to_string(),
            arch: arch.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
