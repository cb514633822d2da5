/// In-process transport linking two peers with channels.
use crate::messages::BeaconMessage;
use libp2p_identity::PeerId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// One end of a memory link.
#[derive(Debug)]
pub struct MemoryConnection {
    pub local_peer_id: PeerId,
    pub remote_peer_id: PeerId,
    pub outbound: UnboundedSender<BeaconMessage>,
    pub inbound: UnboundedReceiver<BeaconMessage>,
}

/// Two connected ends with fresh peer ids. What one end sends the other
/// receives, in order.
pub fn connected_pair() -> (MemoryConnection, MemoryConnection) {
    let a = PeerId::random();
    let b = PeerId::random();
    let (a_to_b, b_inbound) = mpsc::unbounded_channel();
    let (b_to_a, a_inbound) = mpsc::unbounded_channel();

    (
        MemoryConnection {
            local_peer_id: a,
            remote_peer_id: b,
            outbound: a_to_b,
            inbound: a_inbound,
        },
        MemoryConnection {
            local_peer_id: b,
            remote_peer_id: a,
            outbound: b_to_a,
            inbound: b_inbound,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::RequestId;

    #[tokio::test]
    async fn test_pair_is_cross_wired() {
        let (a, mut b) = connected_pair();
        assert_eq!(a.remote_peer_id, b.local_peer_id);
        assert_eq!(b.remote_peer_id, a.local_peer_id);

        let message = BeaconMessage::BeaconBlocks {
            request_id: RequestId(7),
            encoded_blocks: vec![],
        };
        a.outbound.send(message.clone()).expect("receiver alive");
        assert_eq!(b.inbound.recv().await, Some(message));

        drop(a);
        assert_eq!(b.inbound.recv().await, None);
    }
}
