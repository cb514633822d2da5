use containers::{Bytes32, Slot};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Correlates a block request with its response. Unique across every
/// session in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrRoot {
    Slot(Slot),
    Root(Bytes32),
}

/// Messages exchanged between peers. Block payloads are codec-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeaconMessage {
    NewBlock {
        encoded_block: Vec<u8>,
    },
    GetBeaconBlocks {
        request_id: RequestId,
        block_slot_or_root: SlotOrRoot,
    },
    BeaconBlocks {
        request_id: RequestId,
        encoded_blocks: Vec<Vec<u8>>,
    },
}

impl fmt::Display for BeaconMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeaconMessage::NewBlock { encoded_block } => {
                write!(f, "NewBlock(bytes={})", encoded_block.len())
            }
            BeaconMessage::GetBeaconBlocks {
                request_id,
                block_slot_or_root,
            } => write!(f, "GetBeaconBlocks(id={request_id}, {block_slot_or_root:?})"),
            BeaconMessage::BeaconBlocks {
                request_id,
                encoded_blocks,
            } => write!(
                f,
                "BeaconBlocks(id={request_id}, blocks={})",
                encoded_blocks.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_request_ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| RequestId::next()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("thread completes") {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
