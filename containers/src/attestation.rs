use crate::types::impl_ssz_transparent;
use crate::{Bytes32, Epoch, Shard, Slot, ValidatorIndex};
use ssz_derive::{Decode, Encode};

/// Number of bytes needed to hold one bit per committee member.
pub const fn bitfield_length(committee_size: usize) -> usize {
    committee_size.div_ceil(8)
}

/// Byte-aligned participation bits, most significant bit first.
///
/// Bit `i` lives in `bytes[i / 8]` under the mask `0x80 >> (i % 8)`, so the
/// first committee member maps to the high bit of the first byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitfield(pub Vec<u8>);

impl_ssz_transparent!(Bitfield, Vec<u8>);

impl Bitfield {
    /// Empty bitfield sized for `committee_size` members.
    pub fn new(committee_size: usize) -> Self {
        Self(vec![0; bitfield_length(committee_size)])
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len_bytes(&self) -> usize {
        self.0.len()
    }

    /// Bits past the end of the buffer read as unset.
    pub fn has_voted(&self, index: usize) -> bool {
        self.0
            .get(index / 8)
            .is_some_and(|byte| byte & (0x80 >> (index % 8)) != 0)
    }

    /// Grows the buffer when `index` lies beyond it.
    pub fn set_voted(&mut self, index: usize) {
        let byte = index / 8;
        if byte >= self.0.len() {
            self.0.resize(byte + 1, 0);
        }
        self.0[byte] |= 0x80 >> (index % 8);
    }

    /// Length is exactly `ceil(committee_size / 8)` and no bit at or past
    /// `committee_size` is set.
    pub fn is_valid_for(&self, committee_size: usize) -> bool {
        if self.0.len() != bitfield_length(committee_size) {
            return false;
        }

        (committee_size..self.0.len() * 8).all(|index| !self.has_voted(index))
    }

    pub fn num_set_bits(&self) -> usize {
        self.0.iter().map(|byte| byte.count_ones() as usize).sum()
    }
}

/// What a committee attests to for one shard at one slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Encode, Decode)]
pub struct AttestationData {
    pub slot: Slot,
    pub shard: Shard,
    pub beacon_block_root: Bytes32,
    pub source_epoch: Epoch,
    pub target_epoch: Epoch,
}

/// Aggregate vote of a crosslink committee.
///
/// `aggregation_bits` and `custody_bits` are both aligned with the committee
/// resolved for `(data.slot, data.shard)`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct Attestation {
    pub aggregation_bits: Bitfield,
    pub data: AttestationData,
    pub custody_bits: Bitfield,
    pub signature: Vec<u8>,
}

/// Attestation with participants resolved to validator indices.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct IndexedAttestation {
    pub custody_bit_0_indices: Vec<ValidatorIndex>,
    pub custody_bit_1_indices: Vec<ValidatorIndex>,
    pub data: AttestationData,
    pub signature: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use ssz::{Decode, Encode};

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(8, 1)]
    #[case(9, 2)]
    #[case(128, 16)]
    fn test_bitfield_length(#[case] committee_size: usize, #[case] expected: usize) {
        assert_eq!(bitfield_length(committee_size), expected);
    }

    #[test]
    fn test_bits_are_most_significant_first() {
        let mut bits = Bitfield::new(10);
        bits.set_voted(0);
        bits.set_voted(9);
        assert_eq!(bits.as_bytes(), &[0x80, 0x40]);
        assert!(bits.has_voted(0));
        assert!(!bits.has_voted(1));
        assert!(bits.has_voted(9));
        assert_eq!(bits.num_set_bits(), 2);
    }

    #[test]
    fn test_padding_bits_invalidate() {
        // committee of 3: only the top three bits may be used
        assert!(Bitfield::from_bytes(vec![0b1110_0000]).is_valid_for(3));
        assert!(!Bitfield::from_bytes(vec![0b1111_0000]).is_valid_for(3));
        assert!(!Bitfield::from_bytes(vec![0b0000_0001]).is_valid_for(3));
    }

    #[test]
    fn test_wrong_length_invalidates() {
        assert!(!Bitfield::from_bytes(vec![0, 0]).is_valid_for(8));
        assert!(!Bitfield::from_bytes(vec![]).is_valid_for(1));
        assert!(Bitfield::from_bytes(vec![]).is_valid_for(0));
    }

    #[test]
    fn test_attestation_ssz() {
        let mut aggregation_bits = Bitfield::new(4);
        aggregation_bits.set_voted(2);
        let attestation = Attestation {
            aggregation_bits,
            data: AttestationData {
                slot: Slot(9),
                shard: Shard(3),
                beacon_block_root: Bytes32::repeat_byte(7),
                source_epoch: Epoch(1),
                target_epoch: Epoch(2),
            },
            custody_bits: Bitfield::new(4),
            signature: vec![1, 2, 3],
        };

        let decoded = Attestation::from_ssz_bytes(&attestation.as_ssz_bytes()).expect("decodes");
        assert_eq!(decoded, attestation);
    }
}
