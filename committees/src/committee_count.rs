use chain::ChainConfig;
use containers::{BeaconState, Epoch};

/// Number of committees in an epoch with `active_validator_count` validators.
///
/// Always a positive multiple of `slots_per_epoch`, and never more than
/// `shard_count` provided `shard_count >= slots_per_epoch`.
pub fn epoch_committee_count(
    active_validator_count: u64,
    shard_count: u64,
    slots_per_epoch: u64,
    target_committee_size: u64,
) -> u64 {
    let by_shards = shard_count / slots_per_epoch;
    let by_validators = active_validator_count / slots_per_epoch / target_committee_size;

    by_shards.min(by_validators).max(1) * slots_per_epoch
}

fn committee_count_at(state: &BeaconState, epoch: Epoch, config: &ChainConfig) -> u64 {
    epoch_committee_count(
        state.active_validator_indices(epoch).len() as u64,
        config.shard_count,
        config.slots_per_epoch,
        config.target_committee_size,
    )
}

pub fn get_previous_epoch_committee_count(state: &BeaconState, config: &ChainConfig) -> u64 {
    committee_count_at(state, state.previous_shuffling_epoch, config)
}

pub fn get_current_epoch_committee_count(state: &BeaconState, config: &ChainConfig) -> u64 {
    committee_count_at(state, state.current_shuffling_epoch, config)
}

/// Counted against the epoch after the current shuffling epoch, which may lag
/// the state's own next epoch.
pub fn get_next_epoch_committee_count(state: &BeaconState, config: &ChainConfig) -> u64 {
    committee_count_at(state, state.current_shuffling_epoch.next(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain::XIAO_LONG_BAO_CONFIG;
    use rstest::rstest;

    #[rstest]
    #[case(8192, 1024, 64, 128, 64)]
    #[case(0, 1024, 64, 128, 64)]
    #[case(1_000_000, 1024, 64, 128, 1024)]
    #[case(16384, 1024, 64, 128, 128)]
    #[case(64, 8, 4, 2, 8)]
    #[case(7, 8, 4, 2, 4)]
    fn test_epoch_committee_count(
        #[case] active: u64,
        #[case] shard_count: u64,
        #[case] slots_per_epoch: u64,
        #[case] target_committee_size: u64,
        #[case] expected: u64,
    ) {
        assert_eq!(
            epoch_committee_count(active, shard_count, slots_per_epoch, target_committee_size),
            expected
        );
    }

    #[test]
    fn test_count_is_positive_multiple_bounded_by_shards() {
        for active in (0..20_000).step_by(97) {
            let count = epoch_committee_count(active, 1024, 64, 128);
            assert!(count > 0);
            assert_eq!(count % 64, 0);
            assert!(count <= 1024);
        }
    }

    #[test]
    fn test_next_count_uses_epoch_after_current_shuffling() {
        let config = XIAO_LONG_BAO_CONFIG;
        let mut state = BeaconState::genesis(&config, 64);
        // half the registry leaves after epoch 0
        for validator in state.validator_registry.iter_mut().skip(32) {
            validator.exit_epoch = Epoch(1);
        }

        assert_eq!(get_current_epoch_committee_count(&state, &config), 8);
        assert_eq!(get_previous_epoch_committee_count(&state, &config), 8);
        assert_eq!(get_next_epoch_committee_count(&state, &config), 8);

        for validator in state.validator_registry.iter_mut().skip(8) {
            validator.exit_epoch = Epoch(1);
        }
        assert_eq!(get_next_epoch_committee_count(&state, &config), 4);
    }
}
