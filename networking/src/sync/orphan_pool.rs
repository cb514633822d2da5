/// Pool of blocks whose parent has not been imported yet.
///
/// Blocks are indexed by their own root and by their parent root, so the
/// whole set of waiting children can be released the moment a parent lands.
use containers::{Bytes32, SignedBlock};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct OrphanBlockPool {
    /// Orphans by root
    blocks: HashMap<Bytes32, SignedBlock>,

    /// parent_root -> roots of pooled children
    children: HashMap<Bytes32, HashSet<Bytes32>>,
}

impl OrphanBlockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `block` unless a block with the same root is already pooled.
    ///
    /// Returns whether the pool changed.
    pub fn add(&mut self, block: SignedBlock) -> bool {
        let root = block.root();
        if self.blocks.contains_key(&root) {
            return false;
        }

        self.children
            .entry(block.parent_root())
            .or_default()
            .insert(root);
        self.blocks.insert(root, block);

        true
    }

    pub fn get(&self, root: &Bytes32) -> Option<&SignedBlock> {
        self.blocks.get(root)
    }

    pub fn contains(&self, root: &Bytes32) -> bool {
        self.blocks.contains_key(root)
    }

    /// Removes and returns every pooled block whose parent is `parent_root`.
    ///
    /// Grandchildren stay pooled; callers release them by popping again once
    /// each child is imported.
    pub fn pop_children(&mut self, parent_root: &Bytes32) -> Vec<SignedBlock> {
        let Some(roots) = self.children.remove(parent_root) else {
            return Vec::new();
        };

        let mut children: Vec<SignedBlock> = roots
            .into_iter()
            .filter_map(|root| self.blocks.remove(&root))
            .collect();
        children.sort_by_key(|block| block.slot());
        children
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
