//! KvStore trait: the abstract interface for paracross persistence.
//!
//! Consensus records, vote records, and governance entries all live in a
//! flat byte-keyed namespace. Implementations include SQLite (persistent)
//! and in-memory (tests and tooling).

use serde::de::DeserializeOwned;

use paracross_core::status::from_cbor;

use crate::error::Result;

/// A single key/value write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Synchronous key/value storage.
///
/// # Design Notes
///
/// - **Atomic batches**: `apply` writes every pair or none of them.
/// - **Ordered scans**: `scan_prefix` returns pairs in ascending key order.
pub trait KvStore: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Point Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the value stored under `key`.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Write a single value, replacing any previous one.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Batch Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a batch of writes atomically, in order.
    ///
    /// A later pair for the same key wins.
    fn apply(&self, batch: &[KeyValue]) -> Result<()>;

    /// Every pair whose key starts with `prefix`, ordered by key.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>>;
}

/// Extension trait for typed access to CBOR-encoded records.
pub trait StoreExt: KvStore {
    /// Read and decode the record under `key`.
    fn get_decoded<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(from_cbor(&bytes)?)),
            None => Ok(None),
        }
    }
}

impl<S: KvStore + ?Sized> StoreExt for S {}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn apply(&self, batch: &[KeyValue]) -> Result<()> {
        (**self).apply(batch)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        (**self).scan_prefix(prefix)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn apply(&self, batch: &[KeyValue]) -> Result<()> {
        (**self).apply(batch)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        (**self).scan_prefix(prefix)
    }
}
