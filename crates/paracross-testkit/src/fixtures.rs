//! Test fixtures and helpers.
//!
//! A four-validator title over an in-memory store, with a primary chain
//! whose tip serves as the commit anchor.

use std::sync::Arc;

use paracross::{MemoryChain, Paracross, ParacrossConfig, StoreRegistry};
use paracross_core::{
    Address, AssetTransfer, BlockDetail, CommitCandidate, ExecStatus, Hash, Keypair, MainBlock,
    NodeStatus, ParacrossAction, SignedTransaction, Title, Transaction, TxBitmap,
};
use paracross_store::MemoryStore;

/// Title used by every fixture.
pub const TEST_TITLE: &str = "user.p.test.";

/// Height of the primary-chain block candidates anchor to.
pub const ANCHOR_HEIGHT: u64 = 10;

/// Paracross instance wired to fixture collaborators.
pub type TestParacross =
    Paracross<Arc<MemoryStore>, Arc<MemoryStore>, StoreRegistry<Arc<MemoryStore>>, MemoryChain>;

/// A title with registered validators, consensus and index stores, and a
/// primary chain.
pub struct TestFixture {
    pub title: Title,
    pub validators: Vec<Keypair>,
    /// Consensus state and governance entries.
    pub store: Arc<MemoryStore>,
    /// Local vote index.
    pub local: Arc<MemoryStore>,
    pub chain: MemoryChain,
    /// Canonical primary-chain blocks `0..=ANCHOR_HEIGHT`.
    pub blocks: Vec<MainBlock>,
}

impl TestFixture {
    /// Four deterministic validators (A, B, C, D).
    pub fn new() -> Self {
        Self::with_validators(validator_keys(4))
    }

    /// Validators with random keys.
    pub fn with_random_validators(count: usize) -> Self {
        let keys = (0..count)
            .map(|_| Keypair::from_seed(&rand::random::<[u8; 32]>()))
            .collect();
        Self::with_validators(keys)
    }

    pub fn with_validators(validators: Vec<Keypair>) -> Self {
        let title = Title::new(TEST_TITLE).expect("fixture title is valid");
        let store = Arc::new(MemoryStore::new());

        let addresses: Vec<Address> = validators.iter().map(Keypair::address).collect();
        StoreRegistry::new(store.clone())
            .set_validators(&title, &addresses)
            .expect("memory store accepts writes");

        let mut chain = MemoryChain::new();
        let mut blocks = Vec::new();
        let mut parent = Hash::ZERO;
        for height in 0..=ANCHOR_HEIGHT {
            let block = MainBlock::new(height, parent, Vec::new());
            parent = block.hash;
            chain.push(&block);
            blocks.push(block);
        }

        Self {
            title,
            validators,
            store,
            local: Arc::new(MemoryStore::new()),
            chain,
            blocks,
        }
    }

    /// Paracross with transfers enabled and the digest fork off.
    pub fn paracross(&self) -> TestParacross {
        self.paracross_with(ParacrossConfig::default())
    }

    pub fn paracross_with(&self, config: ParacrossConfig) -> TestParacross {
        Paracross::new(
            self.store.clone(),
            self.local.clone(),
            StoreRegistry::new(self.store.clone()),
            self.chain.clone(),
            config,
        )
    }

    pub fn validator(&self, index: usize) -> &Keypair {
        &self.validators[index]
    }

    /// The block candidates anchor to.
    pub fn anchor(&self) -> &MainBlock {
        &self.blocks[ANCHOR_HEIGHT as usize]
    }

    /// Deterministic parachain block hash for `height`.
    pub fn block_hash(&self, height: u64) -> Hash {
        Hash::hash(format!("{}block-{}", self.title, height).as_bytes())
    }

    /// A candidate for `height` extending `pre_block_hash`, anchored to
    /// [`Self::anchor`].
    pub fn candidate(&self, height: u64, pre_block_hash: Hash) -> CommitCandidate {
        CommitCandidate {
            title: self.title.clone(),
            height,
            main_block_hash: self.anchor().hash,
            main_block_height: ANCHOR_HEIGHT,
            pre_block_hash,
            block_hash: self.block_hash(height),
            pre_state_hash: Hash::hash(format!("state-{}", height.saturating_sub(1)).as_bytes()),
            state_hash: Hash::hash(format!("state-{height}").as_bytes()),
            tx_count: 0,
            tx_result: TxBitmap::zeroed(0),
            tx_hashes: Vec::new(),
            cross_tx_result: TxBitmap::zeroed(0),
            cross_tx_hashes: Vec::new(),
        }
    }

    /// Candidate for `height` that extends this fixture's chain of block hashes.
    pub fn chained_candidate(&self, height: u64) -> CommitCandidate {
        let pre = if height == 0 {
            Hash::ZERO
        } else {
            self.block_hash(height - 1)
        };
        self.candidate(height, pre)
    }

    pub fn commit_tx(&self, validator: usize, candidate: &CommitCandidate) -> SignedTransaction {
        action_tx(
            &ParacrossAction::Commit(candidate.clone()),
            0,
            self.validator(validator),
        )
    }

    /// Vote payload for `height` with no claimed hashes.
    pub fn node_status(&self, height: u64) -> NodeStatus {
        NodeStatus {
            title: self.title.clone(),
            height,
            main_block_hash: self.anchor().hash,
            main_block_height: ANCHOR_HEIGHT,
            pre_block_hash: Hash::ZERO,
            tx_hashes: Vec::new(),
            cross_tx_hashes: Vec::new(),
        }
    }

    pub fn vote_tx(&self, validator: usize, status: &NodeStatus) -> SignedTransaction {
        action_tx(
            &ParacrossAction::MinerVote(status.clone()),
            0,
            self.validator(validator),
        )
    }

    /// A block on top of the anchor carrying `txs`.
    pub fn block_detail(&self, txs: Vec<SignedTransaction>, receipts: Vec<ExecStatus>) -> BlockDetail {
        let block = MainBlock::new(ANCHOR_HEIGHT + 1, self.anchor().hash, txs);
        BlockDetail::new(block, receipts)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic validator keys; validator `i` uses seed `[i + 1; 32]`.
pub fn validator_keys(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| Keypair::from_seed(&[i as u8 + 1; 32]))
        .collect()
}

/// A signed transaction carrying a paracross action.
pub fn action_tx(action: &ParacrossAction, nonce: u64, keypair: &Keypair) -> SignedTransaction {
    Transaction::paracross(action)
        .expect("actions always encode")
        .with_nonce(nonce)
        .sign(keypair)
}

/// A transaction for `executor` with an empty payload.
pub fn executor_tx(executor: &str, nonce: u64, keypair: &Keypair) -> SignedTransaction {
    Transaction::new(executor, Vec::new())
        .with_nonce(nonce)
        .sign(keypair)
}

/// A main-chain asset transfer into `destination`.
pub fn transfer_tx(destination: &str, nonce: u64, keypair: &Keypair) -> SignedTransaction {
    let action = ParacrossAction::AssetTransfer(AssetTransfer {
        destination: destination.to_string(),
        to: keypair.address(),
        amount: 1_000,
        symbol: "coins.bty".to_string(),
    });
    action_tx(&action, nonce, keypair)
}
