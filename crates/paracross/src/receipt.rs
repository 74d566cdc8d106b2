//! Execution receipts returned to the host.

use paracross_core::{Address, AssetTransfer, FinalizedTitleState, Hash, PendingHeightRecord, Title};
use paracross_store::KeyValue;
use serde::{Deserialize, Serialize};

/// A structured log entry produced while executing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptLog {
    /// A commit was recorded for a height still collecting submissions.
    Commit {
        title: Title,
        height: u64,
        address: Address,
        /// Distinct validators recorded so far.
        validator_count: usize,
    },
    /// The height reached quorum.
    CommitDone {
        state: FinalizedTitleState,
        validator_count: usize,
        /// Size of the largest agreeing group.
        support: usize,
        /// Cross-title transfers released by the finalized block.
        released_cross_txs: Vec<Hash>,
    },
    /// A commit for a height that already reached quorum.
    CommitRecord {
        address: Address,
        /// Frozen record, extended with `address` if it was not a voter.
        snapshot: PendingHeightRecord,
    },
    /// A validator vote was indexed.
    MinerVote {
        title: Title,
        height: u64,
        validator: Address,
    },
    /// A cross-title asset transfer was accepted.
    AssetTransfer { from: Address, transfer: AssetTransfer },
}

impl ReceiptLog {
    pub fn name(&self) -> &'static str {
        match self {
            ReceiptLog::Commit { .. } => "commit",
            ReceiptLog::CommitDone { .. } => "commit_done",
            ReceiptLog::CommitRecord { .. } => "commit_record",
            ReceiptLog::MinerVote { .. } => "miner_vote",
            ReceiptLog::AssetTransfer { .. } => "asset_transfer",
        }
    }

    /// Validator count carried by commit-related logs.
    pub fn validator_count(&self) -> Option<usize> {
        match self {
            ReceiptLog::Commit {
                validator_count, ..
            }
            | ReceiptLog::CommitDone {
                validator_count, ..
            } => Some(*validator_count),
            ReceiptLog::CommitRecord { snapshot, .. } => Some(snapshot.validator_count()),
            _ => None,
        }
    }
}

/// Writes and logs of one successful transaction.
///
/// The host applies `kv` as a single atomic batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecReceipt {
    pub kv: Vec<KeyValue>,
    pub logs: Vec<ReceiptLog>,
}

impl ExecReceipt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_kv(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.kv.push(KeyValue::new(key, value));
    }

    pub fn push_log(&mut self, log: ReceiptLog) {
        self.logs.push(log);
    }

    /// The last log entry, if any.
    pub fn last_log(&self) -> Option<&ReceiptLog> {
        self.logs.last()
    }
}
