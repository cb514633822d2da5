use crate::{hash, Bytes32, Epoch, Shard, Slot, Validator, ValidatorIndex};
use chain::ChainConfig;
use ssz::Encode;
use ssz_derive::{Decode, Encode};

/// Chain state as far as duty assignment needs it.
///
/// The registry is never reordered: a validator's position is its index.
/// Shuffling fields describe the two epochs whose committees are fixed;
/// next-epoch committees are derived on demand.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct BeaconState {
    pub slot: Slot,

    // --- registry ---
    pub validator_registry: Vec<Validator>,
    pub validator_registry_update_epoch: Epoch,

    // --- randomness ---
    pub latest_randao_mixes: Vec<Bytes32>,
    pub latest_active_index_roots: Vec<Bytes32>,

    // --- shuffling ---
    pub previous_shuffling_start_shard: Shard,
    pub current_shuffling_start_shard: Shard,
    pub previous_shuffling_epoch: Epoch,
    pub current_shuffling_epoch: Epoch,
    pub previous_shuffling_seed: Bytes32,
    pub current_shuffling_seed: Bytes32,

    pub latest_block_root: Bytes32,
}

impl BeaconState {
    /// State at the genesis slot with `validator_count` validators active from
    /// the genesis epoch.
    ///
    /// Shuffling seeds are left zero; the committee layer derives them once
    /// the randomness vectors are in place.
    pub fn genesis(config: &ChainConfig, validator_count: usize) -> Self {
        let genesis_epoch = Epoch(config.genesis_epoch);
        let far_future_epoch = Epoch(config.far_future_epoch);

        let validator_registry: Vec<Validator> = (0..validator_count)
            .map(|_| Validator::new(genesis_epoch, far_future_epoch))
            .collect();

        let mut state = Self {
            slot: Slot(config.genesis_slot),
            validator_registry,
            validator_registry_update_epoch: genesis_epoch,
            latest_randao_mixes: vec![Bytes32::zero(); config.latest_randao_mixes_length as usize],
            latest_active_index_roots: Vec::new(),
            previous_shuffling_start_shard: Shard(0),
            current_shuffling_start_shard: Shard(0),
            previous_shuffling_epoch: genesis_epoch,
            current_shuffling_epoch: genesis_epoch,
            previous_shuffling_seed: Bytes32::zero(),
            current_shuffling_seed: Bytes32::zero(),
            latest_block_root: Bytes32::zero(),
        };

        let genesis_active_index_root = state.active_index_root(genesis_epoch);
        state.latest_active_index_roots = vec![
            genesis_active_index_root;
            config.latest_active_index_roots_length as usize
        ];

        state
    }

    pub fn current_epoch(&self, slots_per_epoch: u64) -> Epoch {
        self.slot.epoch(slots_per_epoch)
    }

    /// One epoch back, clamped at genesis.
    pub fn previous_epoch(&self, slots_per_epoch: u64, genesis_epoch: Epoch) -> Epoch {
        let current_epoch = self.current_epoch(slots_per_epoch);
        if current_epoch > genesis_epoch {
            Epoch(current_epoch.0 - 1)
        } else {
            genesis_epoch
        }
    }

    pub fn next_epoch(&self, slots_per_epoch: u64) -> Epoch {
        self.current_epoch(slots_per_epoch).next()
    }

    /// Registry positions of validators active at `epoch`, ascending.
    pub fn active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        self.validator_registry
            .iter()
            .enumerate()
            .filter(|(_, validator)| validator.is_active(epoch))
            .map(|(index, _)| ValidatorIndex(index as u64))
            .collect()
    }

    /// Hash of the SSZ list of validators active at `epoch`.
    pub fn active_index_root(&self, epoch: Epoch) -> Bytes32 {
        hash(&[self.active_validator_indices(epoch).as_ssz_bytes().as_slice()])
    }

    pub fn state_root(&self) -> Bytes32 {
        hash(&[self.as_ssz_bytes().as_slice()])
    }
}
