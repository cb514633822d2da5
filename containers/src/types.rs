use ethereum_types::H256;
use hex::FromHex;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Delegates SSZ encoding of a single-field tuple struct to its inner value.
macro_rules! impl_ssz_transparent {
    ($type:ident, $inner:ty) => {
        impl ssz::Encode for $type {
            fn is_ssz_fixed_len() -> bool {
                <$inner as ssz::Encode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <$inner as ssz::Encode>::ssz_fixed_len()
            }

            fn ssz_bytes_len(&self) -> usize {
                <$inner as ssz::Encode>::ssz_bytes_len(&self.0)
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                <$inner as ssz::Encode>::ssz_append(&self.0, buf)
            }
        }

        impl ssz::Decode for $type {
            fn is_ssz_fixed_len() -> bool {
                <$inner as ssz::Decode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <$inner as ssz::Decode>::ssz_fixed_len()
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
                <$inner as ssz::Decode>::from_ssz_bytes(bytes).map($type)
            }
        }
    };
}

pub(crate) use impl_ssz_transparent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bytes32(pub H256);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ValidatorIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Shard(pub u64);

impl_ssz_transparent!(ValidatorIndex, u64);
impl_ssz_transparent!(Shard, u64);

impl Bytes32 {
    pub const fn zero() -> Self {
        Bytes32(H256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// 32-byte value with every byte set to `byte`. Handy for fixtures.
    pub fn repeat_byte(byte: u8) -> Self {
        Bytes32(H256::repeat_byte(byte))
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Bytes32(H256::from(bytes))
    }
}

impl ssz::Encode for Bytes32 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn ssz_bytes_len(&self) -> usize {
        32
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl ssz::Decode for Bytes32 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
        if bytes.len() != 32 {
            return Err(ssz::DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: 32,
            });
        }
        Ok(Bytes32(H256::from_slice(bytes)))
    }
}

impl FromStr for Bytes32 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes: [u8; 32] = <[u8; 32]>::from_hex(s)?;
        Ok(Bytes32(H256::from(bytes)))
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

/// SHA-256 over the concatenation of `parts`.
pub fn hash(parts: &[&[u8]]) -> Bytes32 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Bytes32(H256::from_slice(&hasher.finalize()))
}
