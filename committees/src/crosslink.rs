use crate::committee_count::{
    get_current_epoch_committee_count, get_next_epoch_committee_count,
    get_previous_epoch_committee_count,
};
use crate::error::{Error, Result};
use crate::seed::generate_seed;
use crate::shuffling::shuffle_into_committees;
use chain::ChainConfig;
use containers::{AttestationData, BeaconState, Bytes32, Epoch, Shard, Slot, ValidatorIndex};
use tracing::trace;

/// Committee assigned to crosslink `shard` at one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrosslinkCommittee {
    pub committee: Vec<ValidatorIndex>,
    pub shard: Shard,
}

/// Inputs that fix an epoch's committees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShufflingContext {
    pub seed: Bytes32,
    pub epoch: Epoch,
    pub start_shard: Shard,
    pub committees_per_epoch: u64,
}

/// Selects the shuffling inputs for `epoch`, which must be the state's
/// previous, current or next epoch.
///
/// For the next epoch a registry change wins over the periodic reseed. Both
/// regenerate the seed, but only a registry change advances the start shard.
pub fn shuffling_context(
    state: &BeaconState,
    epoch: Epoch,
    config: &ChainConfig,
    registry_change: bool,
) -> Result<ShufflingContext> {
    let genesis_epoch = Epoch(config.genesis_epoch);
    let current_epoch = state.current_epoch(config.slots_per_epoch);
    let previous_epoch = state.previous_epoch(config.slots_per_epoch, genesis_epoch);
    let next_epoch = state.next_epoch(config.slots_per_epoch);

    if epoch == current_epoch {
        return Ok(ShufflingContext {
            seed: state.current_shuffling_seed,
            epoch: state.current_shuffling_epoch,
            start_shard: state.current_shuffling_start_shard,
            committees_per_epoch: get_current_epoch_committee_count(state, config),
        });
    }

    if epoch == previous_epoch {
        return Ok(ShufflingContext {
            seed: state.previous_shuffling_seed,
            epoch: state.previous_shuffling_epoch,
            start_shard: state.previous_shuffling_start_shard,
            committees_per_epoch: get_previous_epoch_committee_count(state, config),
        });
    }

    if epoch != next_epoch {
        return Err(Error::EpochOutOfRange {
            epoch,
            previous: previous_epoch,
            current: current_epoch,
            next: next_epoch,
        });
    }

    let committees_per_epoch = get_next_epoch_committee_count(state, config);
    let epochs_since_last_registry_update = current_epoch
        .0
        .saturating_sub(state.validator_registry_update_epoch.0);
    let should_reseed =
        epochs_since_last_registry_update > 1 && epochs_since_last_registry_update.is_power_of_two();

    let (seed, start_shard) = if registry_change {
        let current_committees_per_epoch = get_current_epoch_committee_count(state, config);
        let start_shard = (state.current_shuffling_start_shard.0 + current_committees_per_epoch)
            % config.shard_count;
        (generate_seed(state, next_epoch, config)?, Shard(start_shard))
    } else if should_reseed {
        (
            generate_seed(state, next_epoch, config)?,
            state.current_shuffling_start_shard,
        )
    } else {
        (
            state.current_shuffling_seed,
            state.current_shuffling_start_shard,
        )
    };

    trace!(
        epoch = next_epoch.0,
        registry_change,
        should_reseed,
        start_shard = start_shard.0,
        "next epoch shuffling context"
    );

    Ok(ShufflingContext {
        seed,
        epoch: next_epoch,
        start_shard,
        committees_per_epoch,
    })
}

/// Ordered `(committee, shard)` assignments for `slot`.
///
/// Across the slots of one epoch the returned committees partition that
/// epoch's shuffling exactly.
pub fn get_crosslink_committees_at_slot(
    state: &BeaconState,
    slot: Slot,
    config: &ChainConfig,
    registry_change: bool,
) -> Result<Vec<CrosslinkCommittee>> {
    let epoch = slot.epoch(config.slots_per_epoch);
    let context = shuffling_context(state, epoch, config, registry_change)?;

    // Cut by the context's count, so the slots of an epoch always cover the
    // whole shuffled list even when the count lags the shuffling epoch.
    let shuffling = shuffle_into_committees(
        context.seed,
        &state.validator_registry,
        context.epoch,
        context.committees_per_epoch,
        config,
    );

    let offset = slot.offset_in_epoch(config.slots_per_epoch);
    let committees_per_slot = context.committees_per_epoch / config.slots_per_epoch;
    let slot_start_shard =
        (context.start_shard.0 + committees_per_slot * offset) % config.shard_count;

    Ok(shuffling
        .into_iter()
        .skip((committees_per_slot * offset) as usize)
        .take(committees_per_slot as usize)
        .zip(0..)
        .map(|(committee, index)| CrosslinkCommittee {
            committee,
            shard: Shard((slot_start_shard + index) % config.shard_count),
        })
        .collect())
}

/// The committee attesting to `data.shard` at `data.slot`.
pub fn get_crosslink_committee_for_attestation(
    state: &BeaconState,
    data: &AttestationData,
    config: &ChainConfig,
) -> Result<Vec<ValidatorIndex>> {
    get_crosslink_committees_at_slot(state, data.slot, config, false)?
        .into_iter()
        .find(|crosslink| crosslink.shard == data.shard)
        .map(|crosslink| crosslink.committee)
        .ok_or(Error::ShardNotCrosslinked {
            slot: data.slot,
            shard: data.shard,
        })
}
