//! # Paracross Store
//!
//! Storage abstraction for paracross finality. Consensus records, vote
//! records, and governance entries are persisted behind the [`KvStore`]
//! trait.
//!
//! ## Key Types
//!
//! - [`KvStore`] - Synchronous byte-keyed storage with atomic batches
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`KeyValue`] - A single write
//!
//! ## Usage
//!
//! ```rust,no_run
//! use paracross_store::{KeyValue, KvStore, SqliteStore};
//!
//! let store = SqliteStore::open("paracross.db").unwrap();
//! store.apply(&[KeyValue::new(*b"key", *b"value")]).unwrap();
//! ```

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValue, KvStore, StoreExt};
