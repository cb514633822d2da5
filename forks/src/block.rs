use containers::{Attestation, Block, BlockBody, Bytes32, SignedBlock, Slot};

/// Overrides for a block built on top of a parent.
#[derive(Clone, Debug, Default)]
pub struct BlockParams {
    /// Defaults to the slot after the parent.
    pub slot: Option<Slot>,
    pub state_root: Bytes32,
    pub randao_reveal: Vec<u8>,
    pub attestations: Vec<Attestation>,
}

pub type BlockConstructor = fn(&SignedBlock, BlockParams) -> Block;

/// Child of `parent` linked by the parent's signing root.
pub fn create_block_from_parent(parent: &SignedBlock, params: BlockParams) -> Block {
    Block {
        slot: params.slot.unwrap_or_else(|| parent.slot().next()),
        parent_root: parent.root(),
        state_root: params.state_root,
        body: BlockBody {
            randao_reveal: params.randao_reveal,
            attestations: params.attestations,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_links_to_parent() {
        let parent = SignedBlock::new(
            Block {
                slot: Slot(7),
                ..Block::default()
            },
            vec![],
        );

        let child = create_block_from_parent(&parent, BlockParams::default());
        assert_eq!(child.slot, Slot(8));
        assert_eq!(child.parent_root, parent.root());

        let skipped = create_block_from_parent(
            &parent,
            BlockParams {
                slot: Some(Slot(12)),
                ..BlockParams::default()
            },
        );
        assert_eq!(skipped.slot, Slot(12));
    }
}
