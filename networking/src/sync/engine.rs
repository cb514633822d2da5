use super::{
    config::{SyncConfig, MAX_BLOCKS_PER_RESPONSE},
    orphan_pool::OrphanBlockPool,
    peer_manager::PeerManager,
    states::BlockStatus,
    store::{ChainStore, StoreError},
};
use crate::codec::{BlockCodec, SszSnappyCodec};
use crate::messages::{BeaconMessage, RequestId, SlotOrRoot};
use containers::{Bytes32, SignedBlock};
use libp2p_identity::PeerId;
use parking_lot::Mutex;
/// Chain sync engine.
///
/// Imports announced and requested blocks, parks blocks with unknown parents
/// in the orphan pool, and asks peers for the missing parents.
///
/// ## Locking
///
/// The orphan pool, the pending-request map and the peer table sit behind one
/// mutex. It is only ever held for in-memory bookkeeping, never across a call
/// into the chain store.
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{debug, info, trace, warn};

/// An outstanding parent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub root: Bytes32,
    pub peer_id: PeerId,
}

#[derive(Debug, Default)]
struct SyncShared {
    orphans: OrphanBlockPool,
    pending: HashMap<RequestId, PendingRequest>,
    peers: PeerManager,
}

/// Statistics about the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub orphan_blocks: usize,
    pub pending_requests: usize,
    pub connected_peers: usize,
}

pub struct ChainSyncEngine<S: ChainStore> {
    store: Arc<S>,
    codec: Arc<dyn BlockCodec>,
    config: SyncConfig,
    shared: Mutex<SyncShared>,
    shutdown: watch::Sender<bool>,
}

impl<S: ChainStore> ChainSyncEngine<S> {
    pub fn new(store: Arc<S>, config: SyncConfig) -> Self {
        Self::with_codec(store, Arc::new(SszSnappyCodec), config)
    }

    pub fn with_codec(store: Arc<S>, codec: Arc<dyn BlockCodec>, config: SyncConfig) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            store,
            codec,
            config,
            shared: Mutex::new(SyncShared::default()),
            shutdown,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn codec(&self) -> &dyn BlockCodec {
        self.codec.as_ref()
    }

    /// Dispatches one inbound message from `from`.
    pub async fn handle_message(&self, from: PeerId, message: BeaconMessage) {
        trace!(peer = %from, %message, "inbound message");

        match message {
            BeaconMessage::NewBlock { encoded_block } => match self.codec.decode(&encoded_block) {
                Ok(block) => {
                    self.handle_new_block_announcement(Some(from), block).await;
                }
                Err(err) => debug!(peer = %from, %err, "dropping undecodable announcement"),
            },
            BeaconMessage::GetBeaconBlocks {
                request_id,
                block_slot_or_root,
            } => {
                self.serve_block_request(from, request_id, block_slot_or_root)
                    .await;
            }
            BeaconMessage::BeaconBlocks {
                request_id,
                encoded_blocks,
            } => {
                self.handle_block_response(from, request_id, encoded_blocks)
                    .await;
            }
        }
    }

    /// Handles a freshly announced block. Blocks already imported or already
    /// pooled are dropped.
    pub async fn handle_new_block_announcement(
        &self,
        from: Option<PeerId>,
        block: SignedBlock,
    ) -> BlockStatus {
        let root = block.root();

        if self.is_seen(&root).await {
            debug!(root = %root, slot = block.slot().0, "dropping already seen block");
            return BlockStatus::Rejected;
        }

        self.try_import_or_orphan(from, block).await
    }

    /// Handles the response to one of our parent requests.
    ///
    /// Anything but exactly one block with the expected root is dropped. The
    /// request id is spent either way.
    pub async fn handle_block_response(
        &self,
        from: PeerId,
        request_id: RequestId,
        encoded_blocks: Vec<Vec<u8>>,
    ) -> BlockStatus {
        let expected_root = {
            let mut shared = self.shared.lock();
            let ours = shared
                .pending
                .get(&request_id)
                .is_some_and(|pending| pending.peer_id == from);
            if ours {
                shared.peers.on_request_complete(&from);
                shared.pending.remove(&request_id).map(|pending| pending.root)
            } else {
                None
            }
        };

        let Some(expected_root) = expected_root else {
            debug!(peer = %from, %request_id, "dropping unsolicited response");
            return BlockStatus::Rejected;
        };

        if encoded_blocks.len() != MAX_BLOCKS_PER_RESPONSE {
            debug!(
                peer = %from,
                %request_id,
                count = encoded_blocks.len(),
                "dropping response with unexpected block count"
            );
            return BlockStatus::Rejected;
        }

        let block = match self.codec.decode(&encoded_blocks[0]) {
            Ok(block) => block,
            Err(err) => {
                debug!(peer = %from, %request_id, %err, "dropping undecodable response");
                return BlockStatus::Rejected;
            }
        };

        let root = block.root();
        if root != expected_root {
            debug!(
                peer = %from,
                %request_id,
                expected = %expected_root,
                received = %root,
                "dropping response with mismatched root"
            );
            return BlockStatus::Rejected;
        }

        self.try_import_or_orphan(Some(from), block).await
    }

    /// Imports `block` if its parent is stored, otherwise pools it and asks
    /// for the parent. Importing a block releases its pooled descendants,
    /// which are imported in turn from a worklist.
    ///
    /// Returns the status of `block` itself.
    pub async fn try_import_or_orphan(
        &self,
        from: Option<PeerId>,
        block: SignedBlock,
    ) -> BlockStatus {
        let first_root = block.root();
        let mut first_status = BlockStatus::Unknown;
        let mut worklist = vec![block];

        while let Some(block) = worklist.pop() {
            let root = block.root();
            let parent_root = block.parent_root();
            let slot = block.slot();

            let status = match self.store.get_block_by_root(&parent_root).await {
                Ok(_) => match self.store.persist_block(block).await {
                    Ok(reorg) => {
                        debug!(
                            root = %root,
                            slot = slot.0,
                            new_canonical = reorg.new_canonical.len(),
                            old_canonical = reorg.old_canonical.len(),
                            "imported block"
                        );
                        let children = self.shared.lock().orphans.pop_children(&root);
                        worklist.extend(children);
                        BlockStatus::Imported
                    }
                    Err(err) => {
                        warn!(root = %root, slot = slot.0, %err, "chain store rejected block");
                        BlockStatus::Rejected
                    }
                },
                Err(StoreError::BlockNotFound(_)) => self.orphan(from, block),
                Err(err) => {
                    warn!(root = %root, slot = slot.0, %err, "parent lookup failed");
                    BlockStatus::Rejected
                }
            };

            // the first block comes round again if a concurrent import
            // released it from the pool
            if root == first_root && first_status.can_transition_to(status) {
                first_status = status;
            }

            trace!(root = %root, ?status, "block handled");

            if let Some(children) = self.released_after_orphaning(status, &parent_root).await {
                worklist.extend(children);
            }
        }

        first_status
    }

    fn orphan(&self, from: Option<PeerId>, block: SignedBlock) -> BlockStatus {
        let root = block.root();
        let parent_root = block.parent_root();
        let slot = block.slot();

        let added = self.shared.lock().orphans.add(block);
        debug!(root = %root, slot = slot.0, parent = %parent_root, added, "orphaned block");

        // a block already pooled had its parent requested when it was first
        // orphaned
        if added {
            self.request_block_by_root(parent_root, from);
        }
        BlockStatus::Orphaned
    }

    /// Closes the window between the parent lookup and the pool insert: if
    /// the parent was imported meanwhile, its pooled children are released.
    async fn released_after_orphaning(
        &self,
        status: BlockStatus,
        parent_root: &Bytes32,
    ) -> Option<Vec<SignedBlock>> {
        if status != BlockStatus::Orphaned {
            return None;
        }

        if self.store.get_block_by_root(parent_root).await.is_err() {
            return None;
        }

        let children = self.shared.lock().orphans.pop_children(parent_root);
        if children.is_empty() {
            return None;
        }

        debug!(parent = %parent_root, count = children.len(), "parent imported concurrently");
        Some(children)
    }

    /// Asks a peer for the block with `root`, preferring `preferred`.
    ///
    /// Returns the request id, or `None` when no peer could take the request;
    /// the caller's orphan then waits for a later announcement.
    pub fn request_block_by_root(
        &self,
        root: Bytes32,
        preferred: Option<PeerId>,
    ) -> Option<RequestId> {
        let request_id = RequestId::next();
        let mut shared = self.shared.lock();

        let Some(peer) = shared.peers.select_peer_for_request(preferred.as_ref()) else {
            debug!(root = %root, "no peer available for block request");
            return None;
        };

        let message = BeaconMessage::GetBeaconBlocks {
            request_id,
            block_slot_or_root: SlotOrRoot::Root(root),
        };
        if !peer.send(message) {
            debug!(peer = %peer.peer_id, root = %root, "peer session gone before request");
            return None;
        }

        peer.on_request_start();
        let peer_id = peer.peer_id;
        shared.pending.insert(request_id, PendingRequest { root, peer_id });
        debug!(peer = %peer_id, %request_id, root = %root, "requested block");

        Some(request_id)
    }

    /// Answers a peer's block request from the chain store. Unknown blocks
    /// produce an empty response.
    pub async fn serve_block_request(
        &self,
        from: PeerId,
        request_id: RequestId,
        block_slot_or_root: SlotOrRoot,
    ) {
        let found = match block_slot_or_root {
            SlotOrRoot::Root(root) => self.store.get_block_by_root(&root).await,
            SlotOrRoot::Slot(slot) => self.store.get_canonical_block_by_slot(slot).await,
        };

        let encoded_blocks = match found {
            Ok(block) => match self.codec.encode(&block) {
                Ok(bytes) => vec![bytes],
                Err(err) => {
                    warn!(%err, "failed to encode requested block");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        debug!(
            peer = %from,
            %request_id,
            target = ?block_slot_or_root,
            found = !encoded_blocks.is_empty(),
            "serving block request"
        );

        let response = BeaconMessage::BeaconBlocks {
            request_id,
            encoded_blocks,
        };
        let sent = self
            .shared
            .lock()
            .peers
            .get_peer(&from)
            .is_some_and(|peer| peer.send(response));
        if !sent {
            debug!(peer = %from, %request_id, "requester disconnected before response");
        }
    }

    /// Sends `block` to every connected peer.
    pub fn broadcast_new_block(&self, block: &SignedBlock) -> usize {
        let encoded_block = match self.codec.encode(block) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "failed to encode block for broadcast");
                return 0;
            }
        };

        let shared = self.shared.lock();
        shared
            .peers
            .connected_peers()
            .filter(|peer| {
                peer.send(BeaconMessage::NewBlock {
                    encoded_block: encoded_block.clone(),
                })
            })
            .count()
    }

    /// Block is imported or pooled.
    pub async fn is_seen(&self, root: &Bytes32) -> bool {
        if self.shared.lock().orphans.contains(root) {
            return true;
        }

        self.store.get_block_by_root(root).await.is_ok()
    }

    pub fn register_peer(&self, peer_id: PeerId, outbound: UnboundedSender<BeaconMessage>) {
        self.shared.lock().peers.add_peer(peer_id, outbound);
        info!(peer = %peer_id, "peer session registered");
    }

    /// Forgets `peer_id` and every request still waiting on it, returning the
    /// number of purged requests.
    pub fn disconnect_peer(&self, peer_id: &PeerId) -> usize {
        let mut shared = self.shared.lock();
        shared.peers.remove_peer(peer_id);

        let before = shared.pending.len();
        shared.pending.retain(|_, pending| pending.peer_id != *peer_id);
        let purged = before - shared.pending.len();

        info!(peer = %peer_id, purged, "peer session torn down");
        purged
    }

    pub fn pending_request(&self, request_id: &RequestId) -> Option<PendingRequest> {
        self.shared.lock().pending.get(request_id).copied()
    }

    pub fn orphan_contains(&self, root: &Bytes32) -> bool {
        self.shared.lock().orphans.contains(root)
    }

    pub fn stats(&self) -> SyncStats {
        let shared = self.shared.lock();
        SyncStats {
            orphan_blocks: shared.orphans.len(),
            pending_requests: shared.pending.len(),
            connected_peers: shared.peers.connected_peers().count(),
        }
    }

    /// Stops every session and discards outstanding requests. Imports already
    /// running complete normally.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);

        let mut shared = self.shared.lock();
        let cancelled = shared.pending.len();
        shared.pending.clear();
        info!(cancelled, orphans = shared.orphans.len(), "sync engine shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}
