//! Anchor verification against the primary chain.

use std::collections::{BTreeMap, HashMap};

use paracross_core::{Hash, MainBlock};

use crate::error::{ParacrossError, Result};

/// Header fields of a primary-chain block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub height: u64,
    pub hash: Hash,
    pub parent_hash: Hash,
}

impl From<&MainBlock> for BlockHeader {
    fn from(block: &MainBlock) -> Self {
        Self {
            height: block.height,
            hash: block.hash,
            parent_hash: block.parent_hash,
        }
    }
}

/// Query access to the primary chain.
pub trait MainChain: Send + Sync {
    fn block_by_hash(&self, hash: &Hash) -> Result<Option<BlockHeader>>;

    /// Hash of the canonical block at `height`.
    fn block_hash_at_height(&self, height: u64) -> Result<Option<Hash>>;
}

impl<C: MainChain + ?Sized> MainChain for &C {
    fn block_by_hash(&self, hash: &Hash) -> Result<Option<BlockHeader>> {
        (**self).block_by_hash(hash)
    }

    fn block_hash_at_height(&self, height: u64) -> Result<Option<Hash>> {
        (**self).block_hash_at_height(height)
    }
}

/// Confirm that `hash` is the canonical primary-chain block at `height`.
///
/// The block must exist with the claimed height, and the chain's block at
/// that height must be this one.
pub fn verify_anchor<C: MainChain + ?Sized>(chain: &C, hash: &Hash, height: u64) -> Result<()> {
    let mismatch = || ParacrossError::AnchorMismatch {
        hash: *hash,
        height,
    };

    let header = chain.block_by_hash(hash)?.ok_or_else(mismatch)?;
    if header.height != height {
        return Err(mismatch());
    }
    match chain.block_hash_at_height(height)? {
        Some(canonical) if canonical == *hash => Ok(()),
        _ => Err(mismatch()),
    }
}

/// An in-memory primary chain.
///
/// Side blocks may be inserted with [`MemoryChain::insert_side_block`]; they
/// resolve by hash but never become canonical.
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    by_hash: HashMap<Hash, BlockHeader>,
    canonical: BTreeMap<u64, Hash>,
}

impl MemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block to the canonical chain, replacing any block at its height.
    pub fn push(&mut self, block: &MainBlock) {
        let header = BlockHeader::from(block);
        self.canonical.insert(header.height, header.hash);
        self.by_hash.insert(header.hash, header);
    }

    /// Record a block that is known by hash but not canonical.
    pub fn insert_side_block(&mut self, block: &MainBlock) {
        let header = BlockHeader::from(block);
        self.by_hash.insert(header.hash, header);
    }

    /// Height of the highest canonical block.
    pub fn tip_height(&self) -> Option<u64> {
        self.canonical.keys().next_back().copied()
    }
}

impl MainChain for MemoryChain {
    fn block_by_hash(&self, hash: &Hash) -> Result<Option<BlockHeader>> {
        Ok(self.by_hash.get(hash).copied())
    }

    fn block_hash_at_height(&self, height: u64) -> Result<Option<Hash>> {
        Ok(self.canonical.get(&height).copied())
    }
}
