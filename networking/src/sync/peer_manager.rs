use super::config::MAX_CONCURRENT_REQUESTS;
use crate::messages::BeaconMessage;
use libp2p_identity::PeerId;
/// Peer manager for sync operations.
///
/// Tracks connected sessions and picks the peer a parent request goes to.
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

/// Sync-specific peer state: where to send messages and how busy the peer is.
#[derive(Debug, Clone)]
pub struct SyncPeer {
    pub peer_id: PeerId,
    pub outbound: UnboundedSender<BeaconMessage>,
    pub requests_in_flight: usize,
}

impl SyncPeer {
    pub fn new(peer_id: PeerId, outbound: UnboundedSender<BeaconMessage>) -> Self {
        Self {
            peer_id,
            outbound,
            requests_in_flight: 0,
        }
    }

    /// The session's read half is still alive.
    pub fn is_connected(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Connected and below the per-peer request limit.
    pub fn is_available(&self) -> bool {
        self.is_connected() && self.requests_in_flight < MAX_CONCURRENT_REQUESTS
    }

    /// Queues `message` for the peer. Fails only once the session is gone.
    pub fn send(&self, message: BeaconMessage) -> bool {
        self.outbound.send(message).is_ok()
    }

    pub fn on_request_start(&mut self) {
        self.requests_in_flight += 1;
    }

    pub fn on_request_complete(&mut self) {
        self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
    }
}

#[derive(Debug, Default, Clone)]
pub struct PeerManager {
    peers: HashMap<PeerId, SyncPeer>,
}

impl PeerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session, replacing any earlier one for the same peer.
    pub fn add_peer(&mut self, peer_id: PeerId, outbound: UnboundedSender<BeaconMessage>) {
        self.peers.insert(peer_id, SyncPeer::new(peer_id, outbound));
    }

    pub fn remove_peer(&mut self, peer_id: &PeerId) -> Option<SyncPeer> {
        self.peers.remove(peer_id)
    }

    pub fn get_peer(&self, peer_id: &PeerId) -> Option<&SyncPeer> {
        self.peers.get(peer_id)
    }

    /// Peer for a parent request: `preferred` (usually the peer that sent the
    /// orphan) while it is available, otherwise the least busy available peer.
    pub fn select_peer_for_request(&mut self, preferred: Option<&PeerId>) -> Option<&mut SyncPeer> {
        let preferred = preferred
            .filter(|peer_id| self.peers.get(*peer_id).is_some_and(SyncPeer::is_available))
            .copied();

        let peer_id = preferred.or_else(|| {
            self.peers
                .values()
                .filter(|peer| peer.is_available())
                .min_by_key(|peer| peer.requests_in_flight)
                .map(|peer| peer.peer_id)
        })?;

        self.peers.get_mut(&peer_id)
    }

    pub fn on_request_complete(&mut self, peer_id: &PeerId) {
        if let Some(peer) = self.peers.get_mut(peer_id) {
            peer.on_request_complete();
        }
    }

    pub fn connected_peers(&self) -> impl Iterator<Item = &SyncPeer> {
        self.peers.values().filter(|peer| peer.is_connected())
    }
}
