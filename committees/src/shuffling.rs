use crate::committee_count::epoch_committee_count;
use chain::ChainConfig;
use containers::{hash, Bytes32, Epoch, Validator, ValidatorIndex};

const BITS_PER_HASH: u64 = 256;

/// Per-round hashes for one list length, computed once and reused for
/// every position.
struct RoundHashes {
    pivot: u64,
    sources: Vec<Bytes32>,
}

fn round_hashes(seed: Bytes32, round_count: u8, index_count: u64) -> Vec<RoundHashes> {
    let windows = index_count.div_ceil(BITS_PER_HASH);

    (0..round_count)
        .map(|round| {
            let pivot_hash = hash(&[seed.as_bytes(), &[round]]);
            let mut pivot_bytes = [0u8; 8];
            pivot_bytes.copy_from_slice(&pivot_hash.as_bytes()[..8]);
            let pivot = u64::from_le_bytes(pivot_bytes) % index_count;

            let sources = (0..windows)
                .map(|window| {
                    // window numbers are truncated to four bytes
                    let window = (window as u32).to_le_bytes();
                    hash(&[seed.as_bytes(), &[round], &window])
                })
                .collect();

            RoundHashes { pivot, sources }
        })
        .collect()
}

fn shuffled_position(mut index: u64, index_count: u64, rounds: &[RoundHashes]) -> u64 {
    for round in rounds {
        let flip = (round.pivot + index_count - index) % index_count;
        let position = index.max(flip);
        let source = &round.sources[(position / BITS_PER_HASH) as usize];
        let byte = source.as_bytes()[((position % BITS_PER_HASH) / 8) as usize];

        if (byte >> (position % 8)) & 1 == 1 {
            index = flip;
        }
    }

    index
}

/// Swap-or-not position of `index` in a list of `index_count` items.
///
/// `index` must be lower than `index_count`.
pub fn compute_shuffled_index(
    index: u64,
    index_count: u64,
    seed: Bytes32,
    round_count: u8,
) -> u64 {
    debug_assert!(index < index_count);
    let rounds = round_hashes(seed, round_count, index_count);
    shuffled_position(index, index_count, &rounds)
}

/// Seeded permutation of `indices`.
///
/// Input order is irrelevant: the list is sorted before shuffling, so the
/// output depends only on which indices are present and on `seed`.
pub fn shuffle(indices: &[ValidatorIndex], seed: Bytes32, round_count: u8) -> Vec<ValidatorIndex> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();

    let index_count = sorted.len() as u64;
    if index_count == 0 {
        return sorted;
    }

    let rounds = round_hashes(seed, round_count, index_count);

    (0..index_count)
        .map(|position| sorted[shuffled_position(position, index_count, &rounds) as usize])
        .collect()
}

/// Cuts `list` into `pieces` contiguous slices whose lengths differ by at
/// most one, keeping element order.
pub fn split<T: Clone>(list: &[T], pieces: usize) -> Vec<Vec<T>> {
    let length = list.len();

    (0..pieces)
        .map(|piece| {
            let start = length * piece / pieces;
            let end = length * (piece + 1) / pieces;
            list[start..end].to_vec()
        })
        .collect()
}

/// All committees of `epoch`: active validators shuffled with `seed` and cut
/// into the epoch's committee count.
pub fn get_shuffling(
    seed: Bytes32,
    validators: &[Validator],
    epoch: Epoch,
    config: &ChainConfig,
) -> Vec<Vec<ValidatorIndex>> {
    let active_validator_count = validators
        .iter()
        .filter(|validator| validator.is_active(epoch))
        .count();

    let committees_per_epoch = epoch_committee_count(
        active_validator_count as u64,
        config.shard_count,
        config.slots_per_epoch,
        config.target_committee_size,
    );

    shuffle_into_committees(seed, validators, epoch, committees_per_epoch, config)
}

/// Validators active at `epoch`, shuffled with `seed` and cut into exactly
/// `committees_per_epoch` committees.
pub fn shuffle_into_committees(
    seed: Bytes32,
    validators: &[Validator],
    epoch: Epoch,
    committees_per_epoch: u64,
    config: &ChainConfig,
) -> Vec<Vec<ValidatorIndex>> {
    let active_validator_indices: Vec<ValidatorIndex> = validators
        .iter()
        .enumerate()
        .filter(|(_, validator)| validator.is_active(epoch))
        .map(|(index, _)| ValidatorIndex(index as u64))
        .collect();

    let shuffled = shuffle(&active_validator_indices, seed, config.shuffle_round_count);
    split(&shuffled, committees_per_epoch as usize)
}
