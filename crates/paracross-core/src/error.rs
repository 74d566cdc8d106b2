//! Error types for the paracross core primitives.

use thiserror::Error;

/// Errors raised while building, encoding, or decoding core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl CoreError {
    pub(crate) fn decoding(e: impl std::fmt::Display) -> Self {
        CoreError::DecodingError(e.to_string())
    }

    pub(crate) fn encoding(e: impl std::fmt::Display) -> Self {
        CoreError::EncodingError(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
