//! Selects the transactions of a primary-chain block that concern a title.
//!
//! Pure and order-preserving: every validator filtering the same block gets
//! the same sequence, so the result bitmaps built from it are comparable.

use paracross_core::{
    is_paracross_executor, BlockDetail, ExecStatus, ParacrossAction, SignedTransaction, Title,
};

/// A selected transaction with its block position and outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParaTx<'a> {
    /// Index inside the block.
    pub index: usize,
    pub tx: &'a SignedTransaction,
    pub status: ExecStatus,
    /// Whether this is a cross-title asset transfer into the title.
    pub cross: bool,
}

/// Whether `tx` is a paracross asset transfer landing in `title`.
pub fn is_cross_transfer(title: &Title, tx: &SignedTransaction) -> bool {
    if !is_paracross_executor(tx.executor()) {
        return false;
    }
    match tx.tx.action() {
        Ok(ParacrossAction::AssetTransfer(transfer)) => transfer.targets(title),
        _ => false,
    }
}

/// Select the transactions of `detail` relevant to `title`.
///
/// Packed transactions never match. An atomic group contributes exactly its
/// matching members in block order, so group membership needs no separate
/// pass: each transaction is decided on its own.
pub fn select_for_title<'a>(title: &Title, detail: &'a BlockDetail) -> Vec<ParaTx<'a>> {
    detail
        .entries()
        .filter_map(|(index, tx, status)| matching(title, index, tx, status))
        .collect()
}

/// [`select_for_title`] reduced to owned transactions.
pub fn filter_for_title(title: &Title, detail: &BlockDetail) -> Vec<SignedTransaction> {
    select_for_title(title, detail)
        .into_iter()
        .map(|p| p.tx.clone())
        .collect()
}

fn matching<'a>(
    title: &Title,
    index: usize,
    tx: &'a SignedTransaction,
    status: ExecStatus,
) -> Option<ParaTx<'a>> {
    if status == ExecStatus::Packed {
        return None;
    }
    let cross = is_cross_transfer(title, tx);
    if cross || title.owns_executor(tx.executor()) {
        Some(ParaTx {
            index,
            tx,
            status,
            cross,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paracross_core::{
        Address, AssetTransfer, Hash, Keypair, MainBlock, Transaction, TxGroup,
    };

    fn kp() -> Keypair {
        Keypair::from_seed(&[5; 32])
    }

    fn tx(executor: &str, nonce: u64) -> SignedTransaction {
        Transaction::new(executor, Vec::new())
            .with_nonce(nonce)
            .sign(&kp())
    }

    fn transfer(dest: &str, nonce: u64) -> SignedTransaction {
        let action = ParacrossAction::AssetTransfer(AssetTransfer {
            destination: dest.into(),
            to: Address::from_bytes([1; 32]),
            amount: 1,
            symbol: "bty".into(),
        });
        Transaction::paracross(&action)
            .unwrap()
            .with_nonce(nonce)
            .sign(&kp())
    }

    fn detail(txs: Vec<SignedTransaction>, receipts: Vec<ExecStatus>) -> BlockDetail {
        BlockDetail::new(MainBlock::new(1, Hash::ZERO, txs), receipts)
    }

    fn title() -> Title {
        Title::new("user.p.test.").unwrap()
    }

    #[test]
    fn test_selects_owned_and_cross() {
        let d = detail(
            vec![
                tx("coins", 0),
                tx("user.p.test.token", 1),
                transfer("user.p.test.token", 2),
                transfer("user.p.other.token", 3),
                tx("user.p.other.token", 4),
            ],
            vec![ExecStatus::Ok; 5],
        );
        let selected = select_for_title(&title(), &d);
        let indices: Vec<usize> = selected.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(!selected[0].cross);
        assert!(selected[1].cross);
    }

    #[test]
    fn test_packed_excluded_failed_kept() {
        let d = detail(
            vec![tx("user.p.test.token", 0), tx("user.p.test.token", 1)],
            vec![ExecStatus::Packed, ExecStatus::Failed],
        );
        let selected = select_for_title(&title(), &d);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].index, 1);
        assert_eq!(selected[0].status, ExecStatus::Failed);
    }

    #[test]
    fn test_group_non_matching_member_excluded() {
        let group = |index| TxGroup {
            id: Hash::hash(b"group"),
            index,
            count: 3,
        };
        let members = vec![
            Transaction::new("user.p.test.token", Vec::new())
                .with_group(group(0))
                .sign(&kp()),
            Transaction::new("coins", Vec::new())
                .with_group(group(1))
                .sign(&kp()),
            Transaction::new("user.p.test.trade", Vec::new())
                .with_group(group(2))
                .sign(&kp()),
        ];
        let d = detail(members, vec![ExecStatus::Ok; 3]);
        let indices: Vec<usize> = select_for_title(&title(), &d)
            .iter()
            .map(|p| p.index)
            .collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_vote_transaction_not_selected() {
        let d = detail(vec![tx("paracross", 0)], vec![ExecStatus::Ok]);
        assert!(filter_for_title(&title(), &d).is_empty());
    }

    #[test]
    fn test_filter_is_stable() {
        let d = detail(
            vec![tx("user.p.test.token", 0), transfer("user.p.test.", 1)],
            vec![ExecStatus::Ok, ExecStatus::Failed],
        );
        assert_eq!(filter_for_title(&title(), &d), filter_for_title(&title(), &d));
    }
}
