//! # Paracross
//!
//! Cross-chain block finality for parachains anchored to a primary chain.
//!
//! ## Overview
//!
//! A fixed validator set per title submits commit candidates for each
//! parachain height. Once a strict majority agrees on identical content,
//! anchored to a verified primary-chain block, the height is finalized.
//! Alongside, each validator's view of which title transactions succeeded
//! is indexed as a vote record.
//!
//! - **Commit state machine**: [`CommitMachine`]
//! - **Transaction filter**: [`filter_for_title`], [`select_for_title`]
//! - **Vote aggregation**: [`VoteAggregator`]
//! - **Host entry points**: [`Paracross`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paracross::{MemoryChain, Paracross, ParacrossConfig, StoreRegistry};
//! use paracross::store::SqliteStore;
//!
//! let store = Arc::new(SqliteStore::open("paracross.db").unwrap());
//! let local = SqliteStore::open("paracross-index.db").unwrap();
//! let registry = StoreRegistry::new(store.clone());
//! let paracross = Paracross::new(
//!     store,
//!     local,
//!     registry,
//!     MemoryChain::new(),
//!     ParacrossConfig::default(),
//! );
//! # let _ = paracross;
//! ```
//!
//! ## Re-exports
//!
//! - `paracross::core` - Titles, candidates, records, digests
//! - `paracross::store` - Storage abstraction and SQLite

pub mod anchor;
pub mod commit;
pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod receipt;
pub mod registry;
pub mod vote;

pub use paracross_core as core;
pub use paracross_store as store;

pub use anchor::{verify_anchor, BlockHeader, MainChain, MemoryChain};
pub use commit::{tally, CommitMachine, Tally};
pub use config::ParacrossConfig;
pub use error::{ParacrossError, Result};
pub use executor::{ExecContext, Paracross};
pub use filter::{filter_for_title, is_cross_transfer, select_for_title, ParaTx};
pub use receipt::{ExecReceipt, ReceiptLog};
pub use registry::{StoreRegistry, ValidatorRegistry, ValidatorSet};
pub use vote::VoteAggregator;
