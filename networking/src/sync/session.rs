use super::{engine::ChainSyncEngine, store::ChainStore};
use crate::memory_transport::MemoryConnection;
use crate::types::LossReason;
use libp2p_identity::PeerId;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("connection to peer {peer_id} lost: {reason}")]
    PeerConnectionLost { peer_id: PeerId, reason: LossReason },
}

/// Reads and handles one peer's messages in order until the peer goes
/// silent, closes the link, or the engine shuts down.
///
/// On every exit the peer is unregistered and its pending requests purged.
/// A local shutdown ends the session with `Ok`.
pub async fn run_session<S: ChainStore>(
    engine: Arc<ChainSyncEngine<S>>,
    connection: MemoryConnection,
) -> Result<(), SessionError> {
    let MemoryConnection {
        remote_peer_id: peer_id,
        outbound,
        mut inbound,
        ..
    } = connection;

    engine.register_peer(peer_id, outbound);
    let mut shutdown = engine.subscribe_shutdown();
    let read_timeout = engine.config().read_timeout;

    let result = loop {
        if *shutdown.borrow_and_update() {
            break Ok(());
        }

        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
            read = timeout(read_timeout, inbound.recv()) => match read {
                Ok(Some(message)) => engine.handle_message(peer_id, message).await,
                Ok(None) => {
                    break Err(SessionError::PeerConnectionLost {
                        peer_id,
                        reason: LossReason::Closed,
                    });
                }
                Err(_) => {
                    break Err(SessionError::PeerConnectionLost {
                        peer_id,
                        reason: LossReason::Timeout,
                    });
                }
            },
        }
    };

    engine.disconnect_peer(&peer_id);

    match &result {
        Ok(()) => debug!(peer = %peer_id, "session closed by shutdown"),
        Err(err) => info!(peer = %peer_id, %err, "session ended"),
    }

    result
}

impl<S: ChainStore + 'static> ChainSyncEngine<S> {
    /// Runs a session for `connection` on the tokio runtime.
    pub fn spawn_session(
        self: &Arc<Self>,
        connection: MemoryConnection,
    ) -> JoinHandle<Result<(), SessionError>> {
        tokio::spawn(run_session(Arc::clone(self), connection))
    }
}
