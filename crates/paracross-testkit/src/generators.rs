//! Proptest generators for property-based testing.

use proptest::prelude::*;

use paracross_core::{
    Address, BlockDetail, ExecStatus, Hash, Keypair, MainBlock, SignedTransaction, TxGroup,
};

use crate::fixtures::{executor_tx, transfer_tx};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random hash.
pub fn hash() -> impl Strategy<Value = Hash> {
    any::<[u8; 32]>().prop_map(Hash::from_bytes)
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate an ordered hash list.
pub fn hash_list(max_len: usize) -> impl Strategy<Value = Vec<Hash>> {
    prop::collection::vec(hash(), 0..=max_len)
}

/// Generate an execution status.
pub fn exec_status() -> impl Strategy<Value = ExecStatus> {
    prop_oneof![
        4 => Just(ExecStatus::Ok),
        2 => Just(ExecStatus::Failed),
        1 => Just(ExecStatus::Packed),
    ]
}

/// What a generated block transaction looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxShape {
    /// Executor inside the test title.
    Owned,
    /// Executor inside another title.
    Foreign,
    /// Main-chain executor unrelated to any title.
    MainChain,
    /// Asset transfer into the test title.
    TransferIn,
    /// Asset transfer into another title.
    TransferOut,
}

impl TxShape {
    fn build(self, nonce: u64, keypair: &Keypair) -> SignedTransaction {
        match self {
            TxShape::Owned => executor_tx("user.p.test.token", nonce, keypair),
            TxShape::Foreign => executor_tx("user.p.other.token", nonce, keypair),
            TxShape::MainChain => executor_tx("coins", nonce, keypair),
            TxShape::TransferIn => transfer_tx("user.p.test.token", nonce, keypair),
            TxShape::TransferOut => transfer_tx("user.p.other.token", nonce, keypair),
        }
    }
}

pub fn tx_shape() -> impl Strategy<Value = TxShape> {
    prop_oneof![
        Just(TxShape::Owned),
        Just(TxShape::Foreign),
        Just(TxShape::MainChain),
        Just(TxShape::TransferIn),
        Just(TxShape::TransferOut),
    ]
}

/// Parameters for a generated block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    /// Shape, status, and group flag of each transaction. Consecutive
    /// flagged transactions form one atomic group.
    pub txs: Vec<(TxShape, ExecStatus, bool)>,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec((tx_shape(), exec_status(), any::<bool>()), 0..24)
            .prop_map(|txs| BlockParams { txs })
            .boxed()
    }
}

/// Build a block from generated parameters.
pub fn block_from_params(params: &BlockParams) -> BlockDetail {
    let keypair = Keypair::from_seed(&[0x77; 32]);

    // (group id, index in group, group size) per transaction
    let mut groups: Vec<Option<(u64, u32, u32)>> = Vec::with_capacity(params.txs.len());
    let mut run_start = 0;
    for (i, (_, _, grouped)) in params.txs.iter().enumerate() {
        if !grouped {
            groups.push(None);
            run_start = i + 1;
            continue;
        }
        groups.push(Some((run_start as u64, (i - run_start) as u32, 0)));
        let size = (i - run_start + 1) as u32;
        for slot in groups[run_start..=i].iter_mut().flatten() {
            slot.2 = size;
        }
    }

    let mut txs = Vec::with_capacity(params.txs.len());
    let mut receipts = Vec::with_capacity(params.txs.len());
    for (i, ((shape, status, _), group)) in params.txs.iter().zip(&groups).enumerate() {
        let SignedTransaction { tx: mut inner, .. } = shape.build(i as u64, &keypair);
        inner.group = group.map(|(id, index, count)| TxGroup {
            id: Hash::hash(&id.to_be_bytes()),
            index,
            count,
        });
        txs.push(inner.sign(&keypair));
        receipts.push(*status);
    }

    BlockDetail::new(MainBlock::new(11, Hash::ZERO, txs), receipts)
}
