use crate::types::impl_ssz_transparent;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Slot(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Epoch(pub u64);

impl_ssz_transparent!(Slot, u64);
impl_ssz_transparent!(Epoch, u64);

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Slot {
    /// Epoch containing this slot (`slot / slots_per_epoch`, floored).
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch(self.0 / slots_per_epoch)
    }

    /// Position of this slot within its epoch.
    pub fn offset_in_epoch(self, slots_per_epoch: u64) -> u64 {
        self.0 % slots_per_epoch
    }

    pub fn next(self) -> Slot {
        Slot(self.0 + 1)
    }
}

impl Epoch {
    pub fn start_slot(self, slots_per_epoch: u64) -> Slot {
        Slot(self.0 * slots_per_epoch)
    }

    pub fn next(self) -> Epoch {
        Epoch(self.0 + 1)
    }

    /// Little-endian encoding padded to 32 bytes, as mixed into seeds.
    pub fn to_bytes32(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&self.0.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_to_epoch_floors() {
        assert_eq!(Slot(0).epoch(64), Epoch(0));
        assert_eq!(Slot(63).epoch(64), Epoch(0));
        assert_eq!(Slot(64).epoch(64), Epoch(1));
        assert_eq!(Slot(130).epoch(64), Epoch(2));
    }

    #[test]
    fn test_offset_in_epoch() {
        assert_eq!(Slot(9).offset_in_epoch(4), 1);
        assert_eq!(Slot(8).offset_in_epoch(4), 0);
    }

    #[test]
    fn test_epoch_start_slot() {
        assert_eq!(Epoch(3).start_slot(4), Slot(12));
        assert_eq!(Epoch(3).start_slot(4).epoch(4), Epoch(3));
    }

    #[test]
    fn test_epoch_bytes_are_little_endian() {
        let bytes = Epoch(0x0102).to_bytes32();
        assert_eq!(&bytes[..3], &[0x02, 0x01, 0x00]);
        assert!(bytes[8..].iter().all(|b| *b == 0));
    }
}
