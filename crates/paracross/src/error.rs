//! Error types for paracross execution.

use paracross_core::{Address, CoreError, Hash};
use paracross_store::StoreError;
use thiserror::Error;

/// Rejections and failures of a single paracross transaction.
///
/// Every variant is local to the transaction that produced it: nothing is
/// written when an error is returned.
#[derive(Debug, Error)]
pub enum ParacrossError {
    /// The signer is not in the title's validator set.
    #[error("signer {0} is not a validator of this title")]
    InvalidSigner(Address),

    /// The transaction signature does not verify.
    #[error("invalid transaction signature")]
    InvalidSignature,

    /// The candidate does not extend the finalized state.
    #[error("height discontinuity: expected {expected}, got {got}")]
    HeightDiscontinuity { expected: u64, got: u64 },

    /// The claimed primary-chain block does not match the primary chain.
    #[error("anchor mismatch: main block {hash} at height {height}")]
    AnchorMismatch { hash: Hash, height: u64 },

    /// Malformed payload.
    #[error("decode error: {0}")]
    Decode(#[source] CoreError),

    /// A well-formed action arrived at the wrong entry point.
    #[error("unexpected {got} action, expected {expected}")]
    UnexpectedAction {
        expected: &'static str,
        got: &'static str,
    },

    /// Cross-title asset transfers are switched off.
    #[error("cross-title transfers are disabled")]
    TransferDisabled,

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for ParacrossError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                ParacrossError::InvalidSignature
            }
            other => ParacrossError::Decode(other),
        }
    }
}

/// Result type for paracross operations.
pub type Result<T> = std::result::Result<T, ParacrossError>;
