pub mod codec;
pub mod memory_transport;
pub mod messages;
pub mod sync;
pub mod types;

pub use codec::{BlockCodec, CodecError, SszSnappyCodec};
pub use memory_transport::{connected_pair, MemoryConnection};
pub use messages::{BeaconMessage, RequestId, SlotOrRoot};
pub use types::LossReason;
