use containers::{Epoch, Shard, Slot};
use thiserror::Error;

/// Duty-assignment failures. All of them mean the caller asked about
/// something the state cannot answer; none are retried internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(
        "epoch {epoch:?} is outside previous {previous:?}, current {current:?} and next {next:?}"
    )]
    EpochOutOfRange {
        epoch: Epoch,
        previous: Epoch,
        current: Epoch,
        next: Epoch,
    },
    #[error("no non-empty committee at slot {slot:?}")]
    EmptyCommittee { slot: Slot },
    #[error("bitfield of {bitfield_length} bytes is invalid for a committee of {committee_size}")]
    InvalidBitfield {
        bitfield_length: usize,
        committee_size: usize,
    },
    #[error("shard {shard:?} has no committee at slot {slot:?}")]
    ShardNotCrosslinked { slot: Slot, shard: Shard },
    #[error("seed input for epoch {epoch:?} is outside the window of current epoch {current:?}")]
    SeedUnavailable { epoch: Epoch, current: Epoch },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
