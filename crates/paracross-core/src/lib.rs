//! # Paracross Core
//!
//! Pure primitives for parachain finality: titles, commit candidates, quorum
//! records, vote records, transaction bitmaps, and hash digests.
//!
//! This crate contains no I/O and no storage. Everything here is
//! deterministic computation over signed data.
//!
//! ## Key Types
//!
//! - [`CommitCandidate`] - A validator's claim about one parachain block
//! - [`PendingHeightRecord`] - Submissions collected for one height
//! - [`FinalizedTitleState`] - The last block of a title that reached quorum
//! - [`MinerVoteRecord`] - One validator's local transaction-acceptance view
//! - [`ParacrossAction`] - The payload union carried by paracross transactions
//!
//! ## Canonicalization
//!
//! Fingerprints and signing bytes use deterministic CBOR. See [`canonical`].

pub mod bitmap;
pub mod canonical;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod keys;
pub mod status;
pub mod transaction;
pub mod types;

pub use bitmap::TxBitmap;
pub use crypto::{Address, Hash, Keypair, Signature};
pub use digest::{digest, EMPTY_DIGEST};
pub use error::CoreError;
pub use status::{
    CommitCandidate, CommitEntry, FinalizedTitleState, HashList, HeightStatus, MinerVoteRecord,
    NodeStatus, PendingHeightRecord,
};
pub use transaction::{
    AssetTransfer, BlockDetail, ExecStatus, MainBlock, ParacrossAction, SignedTransaction,
    Transaction, TxGroup,
};
pub use types::{is_paracross_executor, Title, PARACROSS_EXECUTOR};
