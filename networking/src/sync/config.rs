/// Sync engine configuration.
use std::time::Duration;

/// Inbound silence after which a peer session is considered lost.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Blocks accepted in one response to a parent request. Fixed by the protocol.
pub const MAX_BLOCKS_PER_RESPONSE: usize = 1;

/// Maximum concurrent requests to a single peer.
pub const MAX_CONCURRENT_REQUESTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub read_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}
