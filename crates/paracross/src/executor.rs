//! The paracross executor: entry points the host calls per transaction.

use paracross_core::keys::title_key;
use paracross_core::{
    Address, AssetTransfer, BlockDetail, CommitCandidate, FinalizedTitleState, MinerVoteRecord,
    NodeStatus, ParacrossAction, PendingHeightRecord, SignedTransaction, Title,
};
use paracross_store::{KeyValue, KvStore, StoreExt};

use crate::anchor::MainChain;
use crate::commit::CommitMachine;
use crate::config::ParacrossConfig;
use crate::error::{ParacrossError, Result};
use crate::filter::select_for_title;
use crate::receipt::{ExecReceipt, ReceiptLog};
use crate::registry::{ValidatorRegistry, ValidatorSet};
use crate::vote::{self, VoteAggregator};

/// Block-level context of the transaction being executed.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext<'a> {
    /// The primary-chain block carrying the transaction, with receipts.
    pub block: &'a BlockDetail,
}

/// Paracross execution over a consensus store, a local vote index, a
/// validator registry, and a view of the primary chain.
///
/// Every entry point reads storage and returns its writes; nothing is
/// persisted until the host applies them. Consensus writes go through
/// [`Paracross::apply`]; vote index writes through [`Paracross::apply_local`]
/// and never reach the consensus store.
pub struct Paracross<S, L, R, C> {
    store: S,
    local: L,
    registry: R,
    chain: C,
    config: ParacrossConfig,
}

impl<S, L, R, C> Paracross<S, L, R, C>
where
    S: KvStore,
    L: KvStore,
    R: ValidatorRegistry,
    C: MainChain,
{
    pub fn new(store: S, local: L, registry: R, chain: C, config: ParacrossConfig) -> Self {
        Self {
            store,
            local,
            registry,
            chain,
            config,
        }
    }

    /// The consensus store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The local vote index.
    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn config(&self) -> &ParacrossConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute any paracross transaction.
    ///
    /// A miner vote only produces its log here; the index write comes from
    /// [`Paracross::record_vote`].
    pub fn exec(&self, tx: &SignedTransaction, ctx: &ExecContext<'_>) -> Result<ExecReceipt> {
        match decode(tx)? {
            ParacrossAction::Commit(candidate) => self.commit(tx, candidate),
            ParacrossAction::MinerVote(status) => {
                let (validator, _) = self.authorize(tx, &status.title)?;
                tracing::debug!(
                    title = %status.title,
                    height = status.height,
                    validator = %validator,
                    main_height = ctx.block.block.height,
                    "vote accepted"
                );
                let mut receipt = ExecReceipt::new();
                receipt.push_log(ReceiptLog::MinerVote {
                    title: status.title,
                    height: status.height,
                    validator,
                });
                Ok(receipt)
            }
            ParacrossAction::AssetTransfer(transfer) => self.asset_transfer(tx, transfer),
        }
    }

    /// Process a commit transaction.
    pub fn process_commit(&self, tx: &SignedTransaction) -> Result<ExecReceipt> {
        match decode(tx)? {
            ParacrossAction::Commit(candidate) => self.commit(tx, candidate),
            other => Err(ParacrossError::UnexpectedAction {
                expected: "commit",
                got: other.name(),
            }),
        }
    }

    /// Build the vote index writes for a miner-vote transaction carried by
    /// `detail`.
    pub fn record_vote(
        &self,
        tx: &SignedTransaction,
        detail: &BlockDetail,
    ) -> Result<Vec<KeyValue>> {
        match decode(tx)? {
            ParacrossAction::MinerVote(status) => {
                let record = self.vote(tx, &status, detail)?;
                Ok(vec![VoteAggregator::to_kv(&record)?])
            }
            other => Err(ParacrossError::UnexpectedAction {
                expected: "miner_vote",
                got: other.name(),
            }),
        }
    }

    /// Apply a receipt's writes to the consensus store as one atomic batch.
    pub fn apply(&self, receipt: &ExecReceipt) -> Result<()> {
        self.store.apply(&receipt.kv)?;
        Ok(())
    }

    /// Apply vote index writes from [`Paracross::record_vote`].
    pub fn apply_local(&self, batch: &[KeyValue]) -> Result<()> {
        self.local.apply(batch)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn finalized_state(&self, title: &Title) -> Result<Option<FinalizedTitleState>> {
        Ok(self.store.get_decoded(&title_key(title))?)
    }

    pub fn height_record(&self, title: &Title, height: u64) -> Result<Option<PendingHeightRecord>> {
        self.machine().height_record(title, height)
    }

    pub fn vote_record(
        &self,
        title: &Title,
        height: u64,
        validator: &Address,
    ) -> Result<Option<MinerVoteRecord>> {
        vote::vote_record(&self.local, title, height, validator)
    }

    /// Vote records of every validator for a title at a height.
    pub fn vote_records(&self, title: &Title, height: u64) -> Result<Vec<MinerVoteRecord>> {
        vote::vote_records(&self.local, title, height)
    }

    pub fn validator_set(&self, title: &Title) -> Result<ValidatorSet> {
        self.registry.validator_set(title)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn machine(&self) -> CommitMachine<'_, S, C> {
        CommitMachine::new(&self.store, &self.chain, &self.config)
    }

    /// Recover the signer and require membership in the title's validators.
    fn authorize(&self, tx: &SignedTransaction, title: &Title) -> Result<(Address, ValidatorSet)> {
        let signer = tx
            .recover_signer()
            .map_err(|_| ParacrossError::InvalidSignature)?;
        let validators = self.registry.validator_set(title)?;
        if !validators.contains(&signer) {
            tracing::warn!(%title, signer = %signer, "signer is not a validator");
            return Err(ParacrossError::InvalidSigner(signer));
        }
        Ok((signer, validators))
    }

    fn commit(&self, tx: &SignedTransaction, candidate: CommitCandidate) -> Result<ExecReceipt> {
        let (validator, validators) = self.authorize(tx, &candidate.title)?;
        self.machine().commit(validator, &validators, candidate)
    }

    fn vote(
        &self,
        tx: &SignedTransaction,
        status: &NodeStatus,
        detail: &BlockDetail,
    ) -> Result<MinerVoteRecord> {
        let (validator, _) = self.authorize(tx, &status.title)?;
        let selected = select_for_title(&status.title, detail);
        let record = VoteAggregator::new(self.config.vote_digest_fork_height).build(
            validator,
            status,
            &selected,
            detail.block.height,
        );
        tracing::debug!(
            title = %status.title,
            height = status.height,
            validator = %validator,
            txs = selected.len(),
            "vote indexed"
        );
        Ok(record)
    }

    fn asset_transfer(
        &self,
        tx: &SignedTransaction,
        transfer: AssetTransfer,
    ) -> Result<ExecReceipt> {
        if !self.config.transfer_enabled {
            tracing::warn!(destination = %transfer.destination, "transfer while disabled");
            return Err(ParacrossError::TransferDisabled);
        }
        Title::from_executor(&transfer.destination)?;
        let from = tx
            .recover_signer()
            .map_err(|_| ParacrossError::InvalidSignature)?;

        let mut receipt = ExecReceipt::new();
        receipt.push_log(ReceiptLog::AssetTransfer { from, transfer });
        Ok(receipt)
    }
}

fn decode(tx: &SignedTransaction) -> Result<ParacrossAction> {
    tx.tx.action().map_err(ParacrossError::Decode)
}
