use crate::crosslink::get_crosslink_committees_at_slot;
use crate::error::{Error, Result};
use chain::ChainConfig;
use containers::{BeaconState, Slot, ValidatorIndex};

/// Proposer for `slot`: a member of the slot's first committee, picked by
/// slot number.
pub fn get_beacon_proposer_index(
    state: &BeaconState,
    slot: Slot,
    config: &ChainConfig,
) -> Result<ValidatorIndex> {
    let crosslink_committees = get_crosslink_committees_at_slot(state, slot, config, false)?;

    let first_committee = crosslink_committees
        .first()
        .map(|crosslink| &crosslink.committee)
        .filter(|committee| !committee.is_empty())
        .ok_or(Error::EmptyCommittee { slot })?;

    Ok(first_committee[(slot.0 % first_committee.len() as u64) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initialize_shuffling_seeds;
    use chain::XIAO_LONG_BAO_CONFIG;

    #[test]
    fn test_proposer_is_member_of_first_committee() {
        let config = XIAO_LONG_BAO_CONFIG;
        let mut state = BeaconState::genesis(&config, 64);
        initialize_shuffling_seeds(&mut state, &config).expect("genesis window");

        for slot in 0..config.slots_per_epoch {
            let slot = Slot(slot);
            let first = get_crosslink_committees_at_slot(&state, slot, &config, false)
                .expect("ok")
                .remove(0)
                .committee;
            let proposer = get_beacon_proposer_index(&state, slot, &config).expect("ok");
            assert_eq!(proposer, first[(slot.0 % first.len() as u64) as usize]);
        }
    }

    #[test]
    fn test_no_active_validators_is_empty_committee() {
        let config = XIAO_LONG_BAO_CONFIG;
        let state = BeaconState::genesis(&config, 0);

        assert_eq!(
            get_beacon_proposer_index(&state, Slot(2), &config),
            Err(Error::EmptyCommittee { slot: Slot(2) })
        );
    }

    #[test]
    fn test_out_of_range_slot_propagates() {
        let config = XIAO_LONG_BAO_CONFIG;
        let state = BeaconState::genesis(&config, 8);

        assert!(matches!(
            get_beacon_proposer_index(&state, Slot(40), &config),
            Err(Error::EpochOutOfRange { .. })
        ));
    }
}
