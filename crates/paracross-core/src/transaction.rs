//! Transactions, the paracross action union, and primary-chain blocks.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::crypto::{Address, Hash, Keypair, Signature};
use crate::error::{CoreError, Result};
use crate::status::{CommitCandidate, NodeStatus};
use crate::types::{Title, PARACROSS_EXECUTOR};

/// Header shared by the members of an atomic transaction group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxGroup {
    /// Identifier common to every member.
    pub id: Hash,
    /// Position of this member inside the group.
    pub index: u32,
    /// Total number of members.
    pub count: u32,
}

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Executor that handles the payload (`paracross`, `user.p.test.token`).
    pub executor: String,
    /// Executor-specific payload bytes.
    pub payload: Bytes,
    pub nonce: u64,
    pub group: Option<TxGroup>,
}

impl Transaction {
    pub fn new(executor: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            executor: executor.into(),
            payload: payload.into(),
            nonce: 0,
            group: None,
        }
    }

    /// A main-chain paracross transaction carrying `action`.
    pub fn paracross(action: &ParacrossAction) -> Result<Self> {
        Ok(Self::new(PARACROSS_EXECUTOR, action.to_bytes()?))
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_group(mut self, group: TxGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Domain-separated bytes covered by the signature.
    pub fn signing_bytes(&self) -> Vec<u8> {
        canonical::transaction_signing_bytes(self)
    }

    /// Content hash of the transaction (signature excluded).
    pub fn hash(&self) -> Hash {
        Hash::hash(&self.signing_bytes())
    }

    /// Decode the payload as a paracross action.
    pub fn action(&self) -> Result<ParacrossAction> {
        ParacrossAction::from_bytes(&self.payload)
    }

    /// Sign with a validator key.
    pub fn sign(self, keypair: &Keypair) -> SignedTransaction {
        let signature = keypair.sign(&self.signing_bytes());
        SignedTransaction {
            tx: self,
            signer: keypair.address(),
            signature,
        }
    }
}

/// A transaction with its signer and Ed25519 signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signer: Address,
    pub signature: Signature,
}

impl SignedTransaction {
    pub fn hash(&self) -> Hash {
        self.tx.hash()
    }

    pub fn executor(&self) -> &str {
        &self.tx.executor
    }

    /// Verify the signature and return the signing address.
    pub fn recover_signer(&self) -> Result<Address> {
        self.signer
            .verify(&self.tx.signing_bytes(), &self.signature)
            .map(|()| self.signer)
    }
}

/// A cross-title asset movement routed through the paracross executor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransfer {
    /// Executor on the receiving side (`user.p.test.token`).
    pub destination: String,
    pub to: Address,
    pub amount: u64,
    pub symbol: String,
}

impl AssetTransfer {
    /// Whether the transfer lands inside `title`.
    pub fn targets(&self, title: &Title) -> bool {
        title.owns_executor(&self.destination)
    }
}

/// Tagged union of everything a paracross transaction can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParacrossAction {
    Commit(CommitCandidate),
    MinerVote(NodeStatus),
    AssetTransfer(AssetTransfer),
}

impl ParacrossAction {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(CoreError::encoding)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(CoreError::decoding)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParacrossAction::Commit(_) => "commit",
            ParacrossAction::MinerVote(_) => "miner_vote",
            ParacrossAction::AssetTransfer(_) => "asset_transfer",
        }
    }
}

/// Final execution outcome of a transaction inside a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecStatus {
    /// Executed and applied.
    Ok,
    /// Executed, only the fee was charged.
    Failed,
    /// Packed into the block without a final outcome.
    Packed,
}

impl ExecStatus {
    pub fn is_ok(self) -> bool {
        self == ExecStatus::Ok
    }
}

/// A primary-chain block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainBlock {
    pub height: u64,
    pub hash: Hash,
    pub parent_hash: Hash,
    pub txs: Vec<SignedTransaction>,
}

impl MainBlock {
    /// Build a block and derive its hash from height, parent, and transactions.
    pub fn new(height: u64, parent_hash: Hash, txs: Vec<SignedTransaction>) -> Self {
        let tx_hashes: Vec<Hash> = txs.iter().map(SignedTransaction::hash).collect();
        let hash = canonical::block_hash(height, &parent_hash, &tx_hashes);
        Self {
            height,
            hash,
            parent_hash,
            txs,
        }
    }
}

/// A block together with the execution status of each of its transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDetail {
    pub block: MainBlock,
    /// `receipts[i]` is the status of `block.txs[i]`.
    pub receipts: Vec<ExecStatus>,
}

impl BlockDetail {
    pub fn new(block: MainBlock, receipts: Vec<ExecStatus>) -> Self {
        Self { block, receipts }
    }

    /// Transactions paired with their status, in block order.
    ///
    /// A transaction without a matching receipt is reported as `Packed`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &SignedTransaction, ExecStatus)> + '_ {
        self.block.txs.iter().enumerate().map(move |(i, tx)| {
            let status = self.receipts.get(i).copied().unwrap_or(ExecStatus::Packed);
            (i, tx, status)
        })
    }
}
