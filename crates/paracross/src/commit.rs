//! Commit quorum state machine.
//!
//! Every accepted commit lands in the pending record of its height. Once a
//! strict majority of the title's validators agree on identical candidate
//! content, the height becomes `Done` and the finalized title state moves
//! to the majority candidate. `Done` is terminal: later commits for that
//! height only produce an audit log.

use paracross_core::keys::{title_height_key, title_key};
use paracross_core::{
    Address, CommitCandidate, FinalizedTitleState, Hash, HeightStatus, PendingHeightRecord, Title,
};
use paracross_store::{KvStore, StoreExt};

use crate::anchor::{verify_anchor, MainChain};
use crate::config::ParacrossConfig;
use crate::error::{ParacrossError, Result};
use crate::receipt::{ExecReceipt, ReceiptLog};
use crate::registry::ValidatorSet;

/// Where a candidate sits relative to the finalized state.
enum Continuity {
    /// Extends the finalized state by one height.
    Next,
    /// Targets a height that already reached quorum.
    Late(PendingHeightRecord),
}

/// Largest group of agreeing submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub fingerprint: Hash,
    pub support: usize,
    /// Index into the record's entries of the group's first-seen member.
    pub first_entry: usize,
}

/// Group entries from current validators by candidate fingerprint.
///
/// Returns the largest group; ties go to the group seen first. Entries from
/// addresses outside `validators` are ignored.
pub fn tally(record: &PendingHeightRecord, validators: &ValidatorSet) -> Option<Tally> {
    let mut groups: Vec<Tally> = Vec::new();
    for (i, entry) in record.entries.iter().enumerate() {
        if !validators.contains(&entry.address) {
            continue;
        }
        let fingerprint = entry.candidate.fingerprint();
        match groups.iter_mut().find(|g| g.fingerprint == fingerprint) {
            Some(group) => group.support += 1,
            None => groups.push(Tally {
                fingerprint,
                support: 1,
                first_entry: i,
            }),
        }
    }

    let mut best: Option<Tally> = None;
    for group in groups {
        if best.as_ref().map_or(true, |b| group.support > b.support) {
            best = Some(group);
        }
    }
    best
}

/// Applies commit candidates for already-authenticated validators.
pub struct CommitMachine<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    chain: &'a C,
    config: &'a ParacrossConfig,
}

impl<'a, S, C> CommitMachine<'a, S, C>
where
    S: KvStore + ?Sized,
    C: MainChain + ?Sized,
{
    pub fn new(store: &'a S, chain: &'a C, config: &'a ParacrossConfig) -> Self {
        Self {
            store,
            chain,
            config,
        }
    }

    /// Finalized state of `title`, if any height reached quorum.
    pub fn finalized_state(&self, title: &Title) -> Result<Option<FinalizedTitleState>> {
        Ok(self.store.get_decoded(&title_key(title))?)
    }

    /// Pending or done record of `title` at `height`.
    pub fn height_record(&self, title: &Title, height: u64) -> Result<Option<PendingHeightRecord>> {
        Ok(self.store.get_decoded(&title_height_key(title, height))?)
    }

    /// Process one commit from `validator`, a member of `validators`.
    ///
    /// Reads storage only; the returned receipt carries every write.
    pub fn commit(
        &self,
        validator: Address,
        validators: &ValidatorSet,
        candidate: CommitCandidate,
    ) -> Result<ExecReceipt> {
        let title = candidate.title.clone();
        let finalized = self.finalized_state(&title)?;
        let continuity = self.continuity(finalized.as_ref(), &candidate)?;

        verify_anchor(
            self.chain,
            &candidate.main_block_hash,
            candidate.main_block_height,
        )
        .map_err(|e| {
            tracing::warn!(
                %title,
                height = candidate.height,
                main_height = candidate.main_block_height,
                "commit anchor rejected"
            );
            e
        })?;

        match continuity {
            Continuity::Late(record) => Ok(self.late_commit(validator, &record, candidate)),
            Continuity::Next => self.pending_commit(validator, validators, candidate),
        }
    }

    fn continuity(
        &self,
        finalized: Option<&FinalizedTitleState>,
        candidate: &CommitCandidate,
    ) -> Result<Continuity> {
        let expected = finalized.map_or(0, |f| f.height + 1);
        let extends = match finalized {
            Some(f) => candidate.pre_block_hash == f.block_hash,
            None => true,
        };

        if candidate.height == expected && extends {
            return Ok(Continuity::Next);
        }

        if let Some(f) = finalized {
            if candidate.height <= f.height {
                if let Some(record) = self.height_record(&candidate.title, candidate.height)? {
                    if record.is_done() {
                        return Ok(Continuity::Late(record));
                    }
                }
            }
        }

        tracing::warn!(
            title = %candidate.title,
            expected,
            got = candidate.height,
            pre_block_hash = %candidate.pre_block_hash,
            "commit does not extend finalized state"
        );
        Err(ParacrossError::HeightDiscontinuity {
            expected,
            got: candidate.height,
        })
    }

    fn late_commit(
        &self,
        validator: Address,
        record: &PendingHeightRecord,
        candidate: CommitCandidate,
    ) -> ExecReceipt {
        let snapshot = record.with_late_voter(validator, candidate);
        tracing::debug!(
            title = %record.title,
            height = record.height,
            validator = %validator,
            validator_count = snapshot.validator_count(),
            "commit after quorum"
        );

        let mut receipt = ExecReceipt::new();
        receipt.push_log(ReceiptLog::CommitRecord {
            address: validator,
            snapshot,
        });
        receipt
    }

    fn pending_commit(
        &self,
        validator: Address,
        validators: &ValidatorSet,
        candidate: CommitCandidate,
    ) -> Result<ExecReceipt> {
        let title = candidate.title.clone();
        let height = candidate.height;
        let mut record = self
            .height_record(&title, height)?
            .unwrap_or_else(|| PendingHeightRecord::new(title.clone(), height));

        record.upsert(validator, candidate);
        let validator_count = record.validator_count();
        tracing::debug!(
            %title,
            height,
            validator = %validator,
            validator_count,
            "commit recorded"
        );

        let mut receipt = ExecReceipt::new();
        receipt.push_log(ReceiptLog::Commit {
            title: title.clone(),
            height,
            address: validator,
            validator_count,
        });

        let quorum = tally(&record, validators)
            .filter(|t| t.support >= validators.threshold());

        let Some(winner) = quorum else {
            receipt.push_kv(title_height_key(&title, height), record.to_bytes()?);
            return Ok(receipt);
        };

        let majority = record.entries[winner.first_entry].candidate.clone();
        let state = FinalizedTitleState::from_candidate(&majority);
        record.status = HeightStatus::Done;

        receipt.push_kv(title_height_key(&title, height), record.to_bytes()?);
        receipt.push_kv(title_key(&title), state.to_bytes()?);

        let released_cross_txs = if self.config.transfer_enabled {
            majority.released_cross_txs()
        } else {
            Vec::new()
        };

        tracing::info!(
            %title,
            height,
            block_hash = %state.block_hash,
            support = winner.support,
            threshold = validators.threshold(),
            "height finalized"
        );

        receipt.push_log(ReceiptLog::CommitDone {
            state,
            validator_count,
            support: winner.support,
            released_cross_txs,
        });
        Ok(receipt)
    }
}
