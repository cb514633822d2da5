use crate::error::{Error, Result};
use chain::ChainConfig;
use containers::{hash, BeaconState, Bytes32, Epoch};

/// Randao mix recorded for `epoch`.
///
/// Only the last `latest_randao_mixes_length` epochs up to the current one
/// are retained.
pub fn get_randao_mix(state: &BeaconState, epoch: Epoch, config: &ChainConfig) -> Result<Bytes32> {
    let current = state.current_epoch(config.slots_per_epoch);
    let length = config.latest_randao_mixes_length;

    if epoch.0 + length <= current.0 || epoch > current {
        return Err(Error::SeedUnavailable { epoch, current });
    }

    state
        .latest_randao_mixes
        .get((epoch.0 % length) as usize)
        .copied()
        .ok_or(Error::SeedUnavailable { epoch, current })
}

/// Root of the active index list recorded for `epoch`.
///
/// Roots are written `activation_exit_delay` epochs ahead, so the window is
/// shifted forward by that much.
pub fn get_active_index_root(
    state: &BeaconState,
    epoch: Epoch,
    config: &ChainConfig,
) -> Result<Bytes32> {
    let current = state.current_epoch(config.slots_per_epoch);
    let length = config.latest_active_index_roots_length;
    let delay = config.activation_exit_delay;

    if epoch.0 + length <= current.0 + delay || epoch.0 > current.0 + delay {
        return Err(Error::SeedUnavailable { epoch, current });
    }

    state
        .latest_active_index_roots
        .get((epoch.0 % length) as usize)
        .copied()
        .ok_or(Error::SeedUnavailable { epoch, current })
}

/// Shuffling seed for `epoch`:
/// `hash(randao_mix(epoch - min_seed_lookahead) ++ active_index_root(epoch) ++ epoch)`.
pub fn generate_seed(state: &BeaconState, epoch: Epoch, config: &ChainConfig) -> Result<Bytes32> {
    let mix_epoch = Epoch(epoch.0.saturating_sub(config.min_seed_lookahead));
    let randao_mix = get_randao_mix(state, mix_epoch, config)?;
    let active_index_root = get_active_index_root(state, epoch, config)?;

    Ok(hash(&[
        randao_mix.as_bytes(),
        active_index_root.as_bytes(),
        &epoch.to_bytes32(),
    ]))
}

/// Sets both shuffling seeds of a freshly built genesis state.
pub fn initialize_shuffling_seeds(state: &mut BeaconState, config: &ChainConfig) -> Result<()> {
    let seed = generate_seed(state, Epoch(config.genesis_epoch), config)?;
    state.previous_shuffling_seed = seed;
    state.current_shuffling_seed = seed;
    Ok(())
}
