use super::{create_chain, create_test_block};
use crate::sync::{ChainStore, MemoryChainStore, StoreError};
use containers::{Bytes32, Slot};
use forks::higher_slot_scoring;
use pretty_assertions::assert_eq;

fn store_with_genesis() -> (MemoryChainStore, containers::SignedBlock) {
    let genesis = create_test_block(0, Bytes32::zero());
    (
        MemoryChainStore::new(genesis.clone(), higher_slot_scoring),
        genesis,
    )
}

#[tokio::test]
async fn test_missing_block_is_not_found() {
    let (store, _) = store_with_genesis();
    let root = Bytes32::repeat_byte(4);

    assert_eq!(
        store.get_block_by_root(&root).await,
        Err(StoreError::BlockNotFound(root))
    );
}

#[tokio::test]
async fn test_persist_requires_parent() {
    let (store, _) = store_with_genesis();
    let orphan = create_test_block(2, Bytes32::repeat_byte(4));

    assert!(matches!(
        store.persist_block(orphan).await,
        Err(StoreError::InvalidBlock { .. })
    ));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_extending_head_reports_new_canonical() {
    let (store, genesis) = store_with_genesis();
    let chain = create_chain(&genesis, 2);

    let reorg = store.persist_block(chain[0].clone()).await.expect("imports");
    assert_eq!(reorg.new_canonical, vec![chain[0].clone()]);
    assert!(reorg.old_canonical.is_empty());

    store.persist_block(chain[1].clone()).await.expect("imports");
    assert_eq!(store.get_canonical_head().await, Ok(chain[1].clone()));

    // importing twice changes nothing
    let again = store.persist_block(chain[1].clone()).await.expect("idempotent");
    assert!(again.new_canonical.is_empty());
}

#[tokio::test]
async fn test_higher_fork_reorgs() {
    let (store, genesis) = store_with_genesis();
    let main = create_chain(&genesis, 2);
    for block in &main {
        store.persist_block(block.clone()).await.expect("imports");
    }

    // lower fork block is stored but does not move the head
    let mut fork_1 = create_test_block(1, genesis.root());
    fork_1.message.state_root = Bytes32::repeat_byte(7);
    let reorg = store.persist_block(fork_1.clone()).await.expect("imports");
    assert!(reorg.new_canonical.is_empty());
    assert_eq!(store.head_root(), main[1].root());

    let fork_3 = create_test_block(3, fork_1.root());
    let reorg = store.persist_block(fork_3.clone()).await.expect("imports");
    assert_eq!(reorg.new_canonical, vec![fork_1.clone(), fork_3.clone()]);
    assert_eq!(reorg.old_canonical, main.clone());

    assert_eq!(store.get_canonical_block_by_slot(Slot(1)).await, Ok(fork_1));
    assert_eq!(
        store.get_canonical_block_by_slot(Slot(2)).await,
        Err(StoreError::SlotNotFound(Slot(2)))
    );
    assert_eq!(store.get_canonical_block_by_slot(Slot(0)).await, Ok(genesis));
}
