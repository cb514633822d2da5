pub mod attestation;
pub mod block;
pub mod slot;
pub mod state;
pub mod types;
pub mod validator;

pub use attestation::{bitfield_length, Attestation, AttestationData, Bitfield, IndexedAttestation};
pub use block::{Block, BlockBody, SignedBlock};
pub use slot::{Epoch, Slot};
pub use state::BeaconState;
pub use types::{hash, Bytes32, Shard, ValidatorIndex};
pub use validator::Validator;
pub use ssz;
