//! Duty assignment: which validators attest for which shard at a slot, and
//! who proposes.
//!
//! Every function takes the chain constants explicitly and is a pure function
//! of its inputs, so independent nodes derive identical duties.

pub mod committee_count;
pub mod crosslink;
pub mod error;
pub mod participants;
pub mod proposer;
pub mod seed;
pub mod shuffling;

pub use committee_count::{
    epoch_committee_count, get_current_epoch_committee_count, get_next_epoch_committee_count,
    get_previous_epoch_committee_count,
};
pub use crosslink::{
    get_crosslink_committee_for_attestation, get_crosslink_committees_at_slot, shuffling_context,
    CrosslinkCommittee, ShufflingContext,
};
pub use error::{Error, Result};
pub use participants::{
    get_attestation_participants, get_indexed_attestation, get_members_from_bitfield,
};
pub use proposer::get_beacon_proposer_index;
pub use seed::{generate_seed, get_active_index_root, get_randao_mix, initialize_shuffling_seeds};
pub use shuffling::{
    compute_shuffled_index, get_shuffling, shuffle, shuffle_into_committees, split,
};
