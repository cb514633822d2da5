/// Per-block sync state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockStatus {
    /// Not yet handled.
    #[default]
    Unknown,

    /// Persisted by the chain store.
    Imported,

    /// Parked in the orphan pool until its parent is imported.
    ///
    /// An orphan is re-examined when its parent lands, so it may still end up
    /// imported or rejected.
    Orphaned,

    /// Dropped: already seen, unsolicited, malformed, or refused by the store.
    Rejected,
}

impl BlockStatus {
    /// Whether a block in this state may move to `target`.
    pub fn can_transition_to(&self, target: BlockStatus) -> bool {
        match self {
            BlockStatus::Unknown => matches!(
                target,
                BlockStatus::Imported | BlockStatus::Orphaned | BlockStatus::Rejected
            ),
            BlockStatus::Orphaned => {
                matches!(target, BlockStatus::Imported | BlockStatus::Rejected)
            }
            BlockStatus::Imported | BlockStatus::Rejected => false,
        }
    }
}
