/// Chain synchronization for the beacon client.
///
/// Blocks arrive from peers in any order. This module imports them as soon
/// as their parent is known and otherwise holds them until it is:
///
/// - **Orphan Pool**: blocks waiting for a parent, indexed by root and parent root
/// - **Chain Store**: storage collaborator the engine imports into
/// - **Peer Manager**: connected sessions and the peer each parent request goes to
/// - **Engine**: import-or-orphan logic and request/response correlation
/// - **Session**: one task per peer reading its messages with a read timeout
///
/// ## Block lifecycle
///
/// - **UNKNOWN** -> **IMPORTED**: parent already stored
/// - **UNKNOWN** -> **ORPHANED**: parent missing; parent requested from a peer
/// - **ORPHANED** -> **IMPORTED**: parent imported, pooled children released
/// - **UNKNOWN** -> **REJECTED**: seen before, unsolicited, or refused by the store
pub mod config;
pub mod engine;
pub mod orphan_pool;
pub mod peer_manager;
pub mod session;
pub mod states;
pub mod store;

pub use config::*;
pub use engine::{ChainSyncEngine, PendingRequest, SyncStats};
pub use orphan_pool::OrphanBlockPool;
pub use peer_manager::{PeerManager, SyncPeer};
pub use session::{run_session, SessionError};
pub use states::BlockStatus;
pub use store::{ChainStore, MemoryChainStore, Reorg, StoreError};

#[cfg(test)]
mod tests;
