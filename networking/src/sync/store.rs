use async_trait::async_trait;
use containers::{Bytes32, SignedBlock, Slot};
use forks::ForkChoiceScoring;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Expected during sync: the block simply has not arrived yet.
    #[error("block {0} not found")]
    BlockNotFound(Bytes32),
    #[error("no canonical block at slot {0:?}")]
    SlotNotFound(Slot),
    #[error("block {root} rejected: {reason}")]
    InvalidBlock { root: Bytes32, reason: String },
}

/// Blocks that entered and left the canonical chain in one import, each list
/// in ascending slot order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reorg {
    pub new_canonical: Vec<SignedBlock>,
    pub old_canonical: Vec<SignedBlock>,
}

/// Chain storage as seen by the sync engine.
///
/// Calls may block on I/O; the engine never holds its own lock across them.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Imports `block`, whose parent must already be stored.
    async fn persist_block(&self, block: SignedBlock) -> Result<Reorg, StoreError>;

    async fn get_block_by_root(&self, root: &Bytes32) -> Result<SignedBlock, StoreError>;

    async fn get_canonical_head(&self) -> Result<SignedBlock, StoreError>;

    async fn get_canonical_block_by_slot(&self, slot: Slot) -> Result<SignedBlock, StoreError>;
}

#[derive(Debug)]
struct StoreInner {
    blocks: HashMap<Bytes32, SignedBlock>,
    canonical: BTreeMap<Slot, Bytes32>,
    head: Bytes32,
}

/// In-memory store whose canonical head is the highest-scoring block.
///
/// A new block only takes over the head when it scores strictly higher, so
/// the first block seen wins ties.
pub struct MemoryChainStore {
    inner: RwLock<StoreInner>,
    scoring: ForkChoiceScoring,
}

impl MemoryChainStore {
    pub fn new(genesis: SignedBlock, scoring: ForkChoiceScoring) -> Self {
        let root = genesis.root();
        let slot = genesis.slot();

        Self {
            inner: RwLock::new(StoreInner {
                blocks: HashMap::from([(root, genesis)]),
                canonical: BTreeMap::from([(slot, root)]),
                head: root,
            }),
            scoring,
        }
    }

    pub fn contains(&self, root: &Bytes32) -> bool {
        self.inner.read().blocks.contains_key(root)
    }

    pub fn len(&self) -> usize {
        self.inner.read().blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().blocks.is_empty()
    }

    pub fn head_root(&self) -> Bytes32 {
        self.inner.read().head
    }
}

impl StoreInner {
    fn is_canonical(&self, block: &SignedBlock, root: &Bytes32) -> bool {
        self.canonical.get(&block.slot()) == Some(root)
    }

    /// Makes `new_head` canonical, returning what moved in and out.
    fn reorg_to(&mut self, new_head: Bytes32) -> Reorg {
        // walk back from the new head to the first canonical ancestor
        let mut new_canonical = Vec::new();
        let mut cursor = new_head;
        let ancestor_slot = loop {
            let Some(block) = self.blocks.get(&cursor) else {
                break None;
            };
            if self.is_canonical(block, &cursor) {
                break Some(block.slot());
            }
            new_canonical.push(block.clone());
            cursor = block.parent_root();
        };

        let stale_slots: Vec<Slot> = match ancestor_slot {
            Some(slot) => self
                .canonical
                .range(slot..)
                .skip(1)
                .map(|(slot, _)| *slot)
                .collect(),
            None => self.canonical.keys().copied().collect(),
        };

        let old_canonical = stale_slots
            .into_iter()
            .filter_map(|slot| self.canonical.remove(&slot))
            .filter_map(|root| self.blocks.get(&root).cloned())
            .collect();

        new_canonical.reverse();
        for block in &new_canonical {
            self.canonical.insert(block.slot(), block.root());
        }
        self.head = new_head;

        Reorg {
            new_canonical,
            old_canonical,
        }
    }
}

#[async_trait]
impl ChainStore for MemoryChainStore {
    async fn persist_block(&self, block: SignedBlock) -> Result<Reorg, StoreError> {
        let root = block.root();
        let mut inner = self.inner.write();

        if inner.blocks.contains_key(&root) {
            return Ok(Reorg::default());
        }

        let Some(parent) = inner.blocks.get(&block.parent_root()) else {
            return Err(StoreError::InvalidBlock {
                root,
                reason: format!("parent {} is not stored", block.parent_root()),
            });
        };

        if block.slot() <= parent.slot() {
            return Err(StoreError::InvalidBlock {
                root,
                reason: format!(
                    "slot {} does not follow parent slot {}",
                    block.slot().0,
                    parent.slot().0
                ),
            });
        }

        let head_score = inner
            .blocks
            .get(&inner.head)
            .map(self.scoring)
            .unwrap_or_default();
        let score = (self.scoring)(&block);
        inner.blocks.insert(root, block);

        if score <= head_score {
            return Ok(Reorg::default());
        }

        let reorg = inner.reorg_to(root);
        debug!(
            head = %root,
            entered = reorg.new_canonical.len(),
            left = reorg.old_canonical.len(),
            "canonical head moved"
        );

        Ok(reorg)
    }

    async fn get_block_by_root(&self, root: &Bytes32) -> Result<SignedBlock, StoreError> {
        self.inner
            .read()
            .blocks
            .get(root)
            .cloned()
            .ok_or(StoreError::BlockNotFound(*root))
    }

    async fn get_canonical_head(&self) -> Result<SignedBlock, StoreError> {
        let inner = self.inner.read();
        inner
            .blocks
            .get(&inner.head)
            .cloned()
            .ok_or(StoreError::BlockNotFound(inner.head))
    }

    async fn get_canonical_block_by_slot(&self, slot: Slot) -> Result<SignedBlock, StoreError> {
        let inner = self.inner.read();
        inner
            .canonical
            .get(&slot)
            .and_then(|root| inner.blocks.get(root))
            .cloned()
            .ok_or(StoreError::SlotNotFound(slot))
    }
}
