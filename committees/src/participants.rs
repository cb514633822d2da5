use crate::crosslink::get_crosslink_committee_for_attestation;
use crate::error::{Error, Result};
use chain::ChainConfig;
use containers::{Attestation, AttestationData, BeaconState, Bitfield, IndexedAttestation, ValidatorIndex};

/// Committee members whose bit is set, in committee order.
///
/// The bitfield must be exactly as long as the committee needs and carry no
/// set bits past the last member.
pub fn get_members_from_bitfield(
    committee: &[ValidatorIndex],
    bitfield: &Bitfield,
) -> Result<Vec<ValidatorIndex>> {
    if !bitfield.is_valid_for(committee.len()) {
        return Err(Error::InvalidBitfield {
            bitfield_length: bitfield.len_bytes(),
            committee_size: committee.len(),
        });
    }

    Ok(committee
        .iter()
        .enumerate()
        .filter(|(position, _)| bitfield.has_voted(*position))
        .map(|(_, index)| *index)
        .collect())
}

pub fn get_attestation_participants(
    state: &BeaconState,
    data: &AttestationData,
    bitfield: &Bitfield,
    config: &ChainConfig,
) -> Result<Vec<ValidatorIndex>> {
    let committee = get_crosslink_committee_for_attestation(state, data, config)?;
    get_members_from_bitfield(&committee, bitfield)
}

/// Resolves an attestation's participants and splits them by custody bit.
/// Both index lists come back sorted.
pub fn get_indexed_attestation(
    state: &BeaconState,
    attestation: &Attestation,
    config: &ChainConfig,
) -> Result<IndexedAttestation> {
    let committee = get_crosslink_committee_for_attestation(state, &attestation.data, config)?;
    let participants = get_members_from_bitfield(&committee, &attestation.aggregation_bits)?;
    let custody_bit_1_members = get_members_from_bitfield(&committee, &attestation.custody_bits)?;

    let (mut custody_bit_1_indices, mut custody_bit_0_indices): (Vec<_>, Vec<_>) = participants
        .into_iter()
        .partition(|index| custody_bit_1_members.contains(index));
    custody_bit_0_indices.sort_unstable();
    custody_bit_1_indices.sort_unstable();

    Ok(IndexedAttestation {
        custody_bit_0_indices,
        custody_bit_1_indices,
        data: attestation.data.clone(),
        signature: attestation.signature.clone(),
    })
}
