mod session_tests;
mod store_tests;

use super::{ChainSyncEngine, MemoryChainStore, SyncConfig};
use containers::{Block, BlockBody, Bytes32, SignedBlock, Slot};
use forks::higher_slot_scoring;
use std::sync::Arc;

pub(super) fn create_test_block(slot: u64, parent_root: Bytes32) -> SignedBlock {
    let block = Block {
        slot: Slot(slot),
        parent_root,
        state_root: Bytes32::default(),
        body: BlockBody::default(),
    };

    SignedBlock::new(block, Vec::new())
}

/// `length` blocks descending from `parent`, one per slot.
pub(super) fn create_chain(parent: &SignedBlock, length: usize) -> Vec<SignedBlock> {
    let mut blocks: Vec<SignedBlock> = Vec::with_capacity(length);
    for _ in 0..length {
        let tip = blocks.last().unwrap_or(parent);
        let block = create_test_block(tip.slot().0 + 1, tip.root());
        blocks.push(block);
    }
    blocks
}

pub(super) fn create_engine(config: SyncConfig) -> (Arc<ChainSyncEngine<MemoryChainStore>>, SignedBlock) {
    let genesis = create_test_block(0, Bytes32::zero());
    let store = Arc::new(MemoryChainStore::new(genesis.clone(), higher_slot_scoring));
    (Arc::new(ChainSyncEngine::new(store, config)), genesis)
}
