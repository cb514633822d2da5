use crate::{hash, Attestation, Bytes32, Slot};
use ssz::Encode;
use ssz_derive::{Decode, Encode};

#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct BlockBody {
    pub randao_reveal: Vec<u8>,
    pub attestations: Vec<Attestation>,
}

/// Unsigned block message. Its hash is the block's identity.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct Block {
    pub slot: Slot,
    pub parent_root: Bytes32,
    pub state_root: Bytes32,
    pub body: BlockBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct SignedBlock {
    pub message: Block,
    pub signature: Vec<u8>,
}

impl Block {
    /// SHA-256 of the SSZ encoding.
    pub fn signing_root(&self) -> Bytes32 {
        hash(&[self.as_ssz_bytes().as_slice()])
    }
}

impl SignedBlock {
    pub fn new(message: Block, signature: Vec<u8>) -> Self {
        Self { message, signature }
    }

    /// Root of the unsigned message; two copies of a block that differ only
    /// in signature share a root.
    pub fn root(&self) -> Bytes32 {
        self.message.signing_root()
    }

    pub fn parent_root(&self) -> Bytes32 {
        self.message.parent_root
    }

    pub fn slot(&self) -> Slot {
        self.message.slot
    }
}
