//! In-memory implementation of the KvStore trait.
//!
//! Same semantics as SQLite, no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::{KeyValue, KvStore};

/// In-memory store. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read().map_err(StoreError::poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().map_err(StoreError::poisoned)?;
        inner.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn apply(&self, batch: &[KeyValue]) -> Result<()> {
        // One write guard for the whole batch.
        let mut inner = self.inner.write().map_err(StoreError::poisoned)?;
        for kv in batch {
            inner.insert(kv.key.clone(), kv.value.clone());
        }
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        let inner = self.inner.read().map_err(StoreError::poisoned)?;
        Ok(inner
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect())
    }
}
