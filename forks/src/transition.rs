use chain::ChainConfig;
use committees::shuffling_context;
use containers::{hash, BeaconState, Epoch, SignedBlock, Slot};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot rewind state from slot {state_slot:?} to {target_slot:?}")]
    SlotInPast { state_slot: Slot, target_slot: Slot },
    #[error("block slot {block_slot:?} does not match state slot {state_slot:?}")]
    SlotMismatch { block_slot: Slot, state_slot: Slot },
    #[error("block does not build on the state's latest block")]
    ParentMismatch,
    #[error(transparent)]
    Committees(#[from] committees::Error),
}

pub type StateTransition = fn(&mut BeaconState, &SignedBlock, &ChainConfig) -> Result<(), TransitionError>;

/// Applies `block` to `state`: advance through empty slots, then process the
/// block itself.
///
/// Only linkage is checked. Signatures and attestation validity are left to
/// callers.
pub fn state_transition(
    state: &mut BeaconState,
    block: &SignedBlock,
    config: &ChainConfig,
) -> Result<(), TransitionError> {
    process_slots(state, block.slot(), config)?;
    process_block(state, block, config)
}

/// Advances `state` to `target_slot`, rotating shuffling data on every epoch
/// boundary crossed.
pub fn process_slots(
    state: &mut BeaconState,
    target_slot: Slot,
    config: &ChainConfig,
) -> Result<(), TransitionError> {
    if target_slot < state.slot {
        return Err(TransitionError::SlotInPast {
            state_slot: state.slot,
            target_slot,
        });
    }

    while state.slot < target_slot {
        let next_slot = state.slot.next();
        if next_slot.offset_in_epoch(config.slots_per_epoch) == 0 {
            process_epoch(state, config)?;
        }
        state.slot = next_slot;
    }

    Ok(())
}

/// Moves the next epoch's shuffling into place. The registry itself never
/// changes here, so the next epoch reseeds only on the periodic schedule.
fn process_epoch(state: &mut BeaconState, config: &ChainConfig) -> Result<(), TransitionError> {
    let current_epoch = state.current_epoch(config.slots_per_epoch);
    let next_epoch = current_epoch.next();
    let next = shuffling_context(state, next_epoch, config, false)?;

    state.previous_shuffling_epoch = state.current_shuffling_epoch;
    state.previous_shuffling_start_shard = state.current_shuffling_start_shard;
    state.previous_shuffling_seed = state.current_shuffling_seed;

    state.current_shuffling_epoch = next.epoch;
    state.current_shuffling_start_shard = next.start_shard;
    state.current_shuffling_seed = next.seed;

    let mixes_length = config.latest_randao_mixes_length;
    let current_mix = state.latest_randao_mixes[(current_epoch.0 % mixes_length) as usize];
    state.latest_randao_mixes[(next_epoch.0 % mixes_length) as usize] = current_mix;

    let index_root_epoch = Epoch(next_epoch.0 + config.activation_exit_delay);
    let roots_length = config.latest_active_index_roots_length;
    state.latest_active_index_roots[(index_root_epoch.0 % roots_length) as usize] =
        state.active_index_root(index_root_epoch);

    debug!(
        epoch = next_epoch.0,
        start_shard = next.start_shard.0,
        seed = %next.seed,
        "rotated shuffling"
    );

    Ok(())
}

/// Checks linkage and folds the block's randao reveal into the current mix.
pub fn process_block(
    state: &mut BeaconState,
    block: &SignedBlock,
    config: &ChainConfig,
) -> Result<(), TransitionError> {
    if block.slot() != state.slot {
        return Err(TransitionError::SlotMismatch {
            block_slot: block.slot(),
            state_slot: state.slot,
        });
    }

    if block.parent_root() != state.latest_block_root {
        return Err(TransitionError::ParentMismatch);
    }

    let current_epoch = state.current_epoch(config.slots_per_epoch);
    let mix_index = (current_epoch.0 % config.latest_randao_mixes_length) as usize;
    let mix = state.latest_randao_mixes[mix_index];
    state.latest_randao_mixes[mix_index] =
        hash(&[mix.as_bytes(), block.message.body.randao_reveal.as_slice()]);

    state.latest_block_root = block.root();

    Ok(())
}
