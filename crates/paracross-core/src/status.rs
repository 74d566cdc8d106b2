//! Commit candidates, quorum records, and vote records.

use serde::{Deserialize, Serialize};

use crate::bitmap::TxBitmap;
use crate::canonical;
use crate::crypto::{Address, Hash};
use crate::digest::digest;
use crate::error::{CoreError, Result};
use crate::types::Title;

/// A validator's claim about one parachain block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitCandidate {
    pub title: Title,
    pub height: u64,
    /// Primary-chain block the parachain block was derived from.
    pub main_block_hash: Hash,
    pub main_block_height: u64,
    pub pre_block_hash: Hash,
    pub block_hash: Hash,
    pub pre_state_hash: Hash,
    pub state_hash: Hash,
    pub tx_count: u32,
    pub tx_result: TxBitmap,
    pub tx_hashes: Vec<Hash>,
    pub cross_tx_result: TxBitmap,
    pub cross_tx_hashes: Vec<Hash>,
}

impl CommitCandidate {
    /// Quorum identity: two candidates agree iff their fingerprints match.
    pub fn fingerprint(&self) -> Hash {
        canonical::candidate_fingerprint(self)
    }

    /// Cross-title transfer hashes whose result bit is set.
    pub fn released_cross_txs(&self) -> Vec<Hash> {
        self.cross_tx_hashes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.cross_tx_result.get(*i))
            .map(|(_, h)| *h)
            .collect()
    }
}

/// The vote payload a validator broadcasts for its local view of a height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub title: Title,
    pub height: u64,
    pub main_block_hash: Hash,
    pub main_block_height: u64,
    pub pre_block_hash: Hash,
    pub tx_hashes: Vec<Hash>,
    pub cross_tx_hashes: Vec<Hash>,
}

/// The last block of a title that reached quorum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedTitleState {
    pub title: Title,
    pub height: u64,
    pub block_hash: Hash,
    pub state_hash: Hash,
    pub main_block_hash: Hash,
    pub main_block_height: u64,
}

impl FinalizedTitleState {
    pub fn from_candidate(candidate: &CommitCandidate) -> Self {
        Self {
            title: candidate.title.clone(),
            height: candidate.height,
            block_hash: candidate.block_hash,
            state_hash: candidate.state_hash,
            main_block_hash: candidate.main_block_hash,
            main_block_height: candidate.main_block_height,
        }
    }
}

/// Quorum collection status of one height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightStatus {
    Committing,
    /// Terminal: the snapshot is frozen.
    Done,
}

/// One validator's submission at a height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    pub address: Address,
    pub candidate: CommitCandidate,
}

/// Submissions collected for one (title, height).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHeightRecord {
    pub title: Title,
    pub height: u64,
    pub status: HeightStatus,
    /// Submissions in first-seen order.
    pub entries: Vec<CommitEntry>,
}

impl PendingHeightRecord {
    pub fn new(title: Title, height: u64) -> Self {
        Self {
            title,
            height,
            status: HeightStatus::Committing,
            entries: Vec::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == HeightStatus::Done
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.iter().any(|e| &e.address == address)
    }

    /// Number of distinct validators that submitted.
    pub fn validator_count(&self) -> usize {
        self.entries.len()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> + '_ {
        self.entries.iter().map(|e| &e.address)
    }

    /// Record `candidate` for `address`, replacing an earlier submission in
    /// place. Returns `true` when the address is new.
    pub fn upsert(&mut self, address: Address, candidate: CommitCandidate) -> bool {
        match self.entries.iter_mut().find(|e| e.address == address) {
            Some(entry) => {
                entry.candidate = candidate;
                false
            }
            None => {
                self.entries.push(CommitEntry { address, candidate });
                true
            }
        }
    }

    /// A copy of this record with a late voter appended for reporting.
    ///
    /// Known voters leave the snapshot unchanged.
    pub fn with_late_voter(&self, address: Address, candidate: CommitCandidate) -> Self {
        let mut snapshot = self.clone();
        if !snapshot.contains(&address) {
            snapshot.entries.push(CommitEntry { address, candidate });
        }
        snapshot
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cbor(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cbor(bytes)
    }
}

/// A hash sequence as stored in a vote record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashList {
    /// Every hash, in order.
    Full(Vec<Hash>),
    /// Only the digest of the sequence.
    Digest(Hash),
}

impl HashList {
    /// Encode `hashes` in the form selected by `use_digest`.
    pub fn encode(hashes: Vec<Hash>, use_digest: bool) -> Self {
        if use_digest {
            HashList::Digest(digest(&hashes))
        } else {
            HashList::Full(hashes)
        }
    }

    /// Digest of the sequence regardless of encoding.
    pub fn digest(&self) -> Hash {
        match self {
            HashList::Full(hashes) => digest(hashes),
            HashList::Digest(d) => *d,
        }
    }
}

/// One validator's local view of a height, derived from its vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerVoteRecord {
    pub title: Title,
    pub height: u64,
    pub validator: Address,
    pub main_block_hash: Hash,
    pub main_block_height: u64,
    pub tx_result: TxBitmap,
    pub cross_tx_result: TxBitmap,
    pub tx_hashes: HashList,
    pub cross_tx_hashes: HashList,
}

impl MinerVoteRecord {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cbor(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cbor(bytes)
    }
}

impl FinalizedTitleState {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_cbor(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        from_cbor(bytes)
    }
}

/// Serialize a record to CBOR.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(CoreError::encoding)?;
    Ok(buf)
}

/// Deserialize a record from CBOR.
pub fn from_cbor<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(CoreError::decoding)
}
