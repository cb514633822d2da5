use containers::SignedBlock;

/// Fork-choice weight of a block; the highest-scoring known block is the
/// canonical head.
pub type ForkChoiceScoring = fn(&SignedBlock) -> u64;

/// Prefers the block with the highest slot.
pub fn higher_slot_scoring(block: &SignedBlock) -> u64 {
    block.slot().0
}
