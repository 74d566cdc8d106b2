//! Per-validator vote records for cross-chain auditing.
//!
//! Not consensus-critical: the commit state machine never reads these.

use paracross_core::keys::{miner_vote_key, miner_vote_prefix};
use paracross_core::{
    digest, Address, Hash, HashList, MinerVoteRecord, NodeStatus, Title, TxBitmap,
};
use paracross_store::{KeyValue, KvStore, StoreExt};

use crate::error::{ParacrossError, Result};
use crate::filter::ParaTx;

/// Builds vote records from filtered block transactions.
#[derive(Debug, Clone, Copy)]
pub struct VoteAggregator {
    fork_height: u64,
}

impl VoteAggregator {
    /// `fork_height` is the primary-chain height from which hash lists are
    /// stored as digests.
    pub fn new(fork_height: u64) -> Self {
        Self { fork_height }
    }

    /// Build the record of `validator` for `status.height`.
    ///
    /// `txs` is the filtered transaction sequence and `main_height` the
    /// height of the primary-chain block carrying the vote.
    pub fn build(
        &self,
        validator: Address,
        status: &NodeStatus,
        txs: &[ParaTx<'_>],
        main_height: u64,
    ) -> MinerVoteRecord {
        let tx_result: TxBitmap = txs.iter().map(|p| p.status.is_ok()).collect();
        let cross: Vec<&ParaTx<'_>> = txs.iter().filter(|p| p.cross).collect();
        let cross_tx_result: TxBitmap = cross.iter().map(|p| p.status.is_ok()).collect();

        let tx_hashes: Vec<Hash> = txs.iter().map(|p| p.tx.hash()).collect();
        let cross_tx_hashes: Vec<Hash> = cross.iter().map(|p| p.tx.hash()).collect();

        if !status.tx_hashes.is_empty() && digest(&status.tx_hashes) != digest(&tx_hashes) {
            tracing::warn!(
                title = %status.title,
                height = status.height,
                validator = %validator,
                claimed = status.tx_hashes.len(),
                local = tx_hashes.len(),
                "vote tx hashes differ from local filter"
            );
        }

        let use_digest = main_height >= self.fork_height;
        MinerVoteRecord {
            title: status.title.clone(),
            height: status.height,
            validator,
            main_block_hash: status.main_block_hash,
            main_block_height: status.main_block_height,
            tx_result,
            cross_tx_result,
            tx_hashes: HashList::encode(tx_hashes, use_digest),
            cross_tx_hashes: HashList::encode(cross_tx_hashes, use_digest),
        }
    }

    /// The index write for `record`. Replaces any earlier record of the
    /// same validator at the same height.
    pub fn to_kv(record: &MinerVoteRecord) -> Result<KeyValue> {
        Ok(KeyValue::new(
            miner_vote_key(&record.title, record.height, &record.validator),
            record.to_bytes()?,
        ))
    }
}

/// Read one validator's vote record.
pub fn vote_record<S: KvStore + ?Sized>(
    store: &S,
    title: &Title,
    height: u64,
    validator: &Address,
) -> Result<Option<MinerVoteRecord>> {
    Ok(store.get_decoded(&miner_vote_key(title, height, validator))?)
}

/// Every vote record of a title at a height, ordered by validator key.
///
/// Records under the prefix that name another title or height are skipped.
pub fn vote_records<S: KvStore + ?Sized>(
    store: &S,
    title: &Title,
    height: u64,
) -> Result<Vec<MinerVoteRecord>> {
    let mut records = Vec::new();
    for kv in store.scan_prefix(&miner_vote_prefix(title, height))? {
        let record = MinerVoteRecord::from_bytes(&kv.value).map_err(ParacrossError::from)?;
        if &record.title != title || record.height != height {
            tracing::warn!(
                %title,
                height,
                key = %String::from_utf8_lossy(&kv.key),
                "foreign vote record under prefix"
            );
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paracross_core::{ExecStatus, Keypair, SignedTransaction, Transaction};
    use paracross_store::MemoryStore;

    fn txs(n: u64) -> Vec<SignedTransaction> {
        let kp = Keypair::from_seed(&[3; 32]);
        (0..n)
            .map(|i| {
                Transaction::new("user.p.test.token", Vec::new())
                    .with_nonce(i)
                    .sign(&kp)
            })
            .collect()
    }

    fn para<'a>(
        txs: &'a [SignedTransaction],
        statuses: &[ExecStatus],
        cross: &[bool],
    ) -> Vec<ParaTx<'a>> {
        txs.iter()
            .enumerate()
            .map(|(i, tx)| ParaTx {
                index: i,
                tx,
                status: statuses[i],
                cross: cross[i],
            })
            .collect()
    }

    fn status(tx_hashes: Vec<Hash>) -> NodeStatus {
        NodeStatus {
            title: Title::new("user.p.test.").unwrap(),
            height: 4,
            main_block_hash: Hash::hash(b"main"),
            main_block_height: 20,
            pre_block_hash: Hash::ZERO,
            tx_hashes,
            cross_tx_hashes: vec![],
        }
    }

    #[test]
    fn test_bitmaps_follow_status() {
        let list = txs(3);
        let filtered = para(
            &list,
            &[ExecStatus::Ok, ExecStatus::Failed, ExecStatus::Ok],
            &[false, true, true],
        );
        let record = VoteAggregator::new(u64::MAX).build(
            Address::from_bytes([1; 32]),
            &status(vec![]),
            &filtered,
            20,
        );
        assert_eq!(record.tx_result.as_bytes(), &[0b101]);
        assert_eq!(record.cross_tx_result.len(), 2);
        assert_eq!(record.cross_tx_result.as_bytes(), &[0b10]);
        assert_eq!(
            record.tx_hashes,
            HashList::Full(list.iter().map(|t| t.hash()).collect())
        );
    }

    #[test]
    fn test_digest_from_fork_height() {
        let list = txs(2);
        let filtered = para(&list, &[ExecStatus::Ok; 2], &[false; 2]);
        let aggregator = VoteAggregator::new(20);
        let hashes: Vec<Hash> = list.iter().map(|t| t.hash()).collect();

        let before = aggregator.build(Address::from_bytes([1; 32]), &status(vec![]), &filtered, 19);
        let at = aggregator.build(Address::from_bytes([1; 32]), &status(vec![]), &filtered, 20);

        assert!(matches!(before.tx_hashes, HashList::Full(_)));
        assert_eq!(at.tx_hashes, HashList::Digest(digest(&hashes)));
        assert_eq!(at.cross_tx_hashes, HashList::Digest(digest(&[])));
    }

    #[test]
    fn test_records_scan_by_height() {
        let store = MemoryStore::new();
        let aggregator = VoteAggregator::new(u64::MAX);
        let title = Title::new("user.p.test.").unwrap();

        for n in 1..=3u8 {
            let record = aggregator.build(Address::from_bytes([n; 32]), &status(vec![]), &[], 20);
            store.apply(&[VoteAggregator::to_kv(&record).unwrap()]).unwrap();
        }

        assert_eq!(vote_records(&store, &title, 4).unwrap().len(), 3);
        assert!(vote_records(&store, &title, 40).unwrap().is_empty());
        assert!(vote_record(&store, &title, 4, &Address::from_bytes([2; 32]))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_records_skip_foreign_entries_under_prefix() {
        let store = MemoryStore::new();
        let aggregator = VoteAggregator::new(u64::MAX);
        let title = Title::new("user.p.test.").unwrap();

        let own = aggregator.build(Address::from_bytes([1; 32]), &status(vec![]), &[], 20);
        store.apply(&[VoteAggregator::to_kv(&own).unwrap()]).unwrap();

        let mut foreign_status = status(vec![]);
        foreign_status.title = Title::new("user.p.other.").unwrap();
        let foreign = aggregator.build(Address::from_bytes([2; 32]), &foreign_status, &[], 20);
        let mut key = miner_vote_prefix(&title, 4);
        key.extend_from_slice(b"ff");
        store.set(&key, &foreign.to_bytes().unwrap()).unwrap();

        let mut stale = own.clone();
        stale.height = 40;
        key.extend_from_slice(b"ff");
        store.set(&key, &stale.to_bytes().unwrap()).unwrap();

        let records = vote_records(&store, &title, 4).unwrap();
        assert_eq!(records, vec![own]);
    }
}
