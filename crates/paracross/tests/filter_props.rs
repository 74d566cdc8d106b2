//! Property tests for transaction selection.

use proptest::prelude::*;

use paracross::{filter_for_title, is_cross_transfer, select_for_title};
use paracross_core::{ExecStatus, Title};
use paracross_testkit::{block_from_params, BlockParams, TEST_TITLE};

fn title() -> Title {
    Title::new(TEST_TITLE).unwrap()
}

proptest! {
    #[test]
    fn prop_selection_is_deterministic(params in any::<BlockParams>()) {
        let detail = block_from_params(&params);
        let title = title();
        prop_assert_eq!(
            filter_for_title(&title, &detail),
            filter_for_title(&title, &detail)
        );
    }

    #[test]
    fn prop_selection_preserves_block_order(params in any::<BlockParams>()) {
        let detail = block_from_params(&params);
        let selected = select_for_title(&title(), &detail);
        for pair in selected.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
        }
    }

    #[test]
    fn prop_selection_matches_rule(params in any::<BlockParams>()) {
        let detail = block_from_params(&params);
        let title = title();
        let selected: Vec<usize> = select_for_title(&title, &detail)
            .iter()
            .map(|p| p.index)
            .collect();

        for (index, tx, status) in detail.entries() {
            let relevant = status != ExecStatus::Packed
                && (title.owns_executor(tx.executor()) || is_cross_transfer(&title, tx));
            prop_assert_eq!(selected.contains(&index), relevant, "tx {}", index);
        }
    }

    #[test]
    fn prop_cross_flag_marks_transfers(params in any::<BlockParams>()) {
        let detail = block_from_params(&params);
        let title = title();
        for p in select_for_title(&title, &detail) {
            prop_assert_eq!(p.cross, is_cross_transfer(&title, p.tx));
            prop_assert_eq!(p.status, detail.receipts[p.index]);
        }
    }
}

#[test]
fn test_empty_block_selects_nothing() {
    let detail = block_from_params(&BlockParams { txs: Vec::new() });
    assert!(select_for_title(&title(), &detail).is_empty());
}
