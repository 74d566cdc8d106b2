//! Execution configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for paracross execution.
///
/// Passed to [`crate::Paracross`] at construction and read once per
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParacrossConfig {
    /// Whether cross-title asset transfers are accepted and released.
    pub transfer_enabled: bool,
    /// Primary-chain height from which vote records store hash digests
    /// instead of full hash lists.
    pub vote_digest_fork_height: u64,
}

impl Default for ParacrossConfig {
    fn default() -> Self {
        Self {
            transfer_enabled: true,
            vote_digest_fork_height: u64::MAX,
        }
    }
}

impl ParacrossConfig {
    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
