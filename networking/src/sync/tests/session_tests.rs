use super::{create_chain, create_engine};
use crate::codec::{BlockCodec, SszSnappyCodec};
use crate::memory_transport::connected_pair;
use crate::messages::{BeaconMessage, SlotOrRoot};
use crate::sync::{ChainStore, SessionError, SyncConfig, SyncStats};
use crate::types::LossReason;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::{sleep, timeout};

async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(Duration::from_secs(5), async {
        while !condition() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition reached in time");
}

fn quiet_config(read_timeout: Duration) -> SyncConfig {
    SyncConfig { read_timeout }
}

#[tokio::test]
async fn test_two_engines_sync_over_memory_link() {
    let config = quiet_config(Duration::from_secs(30));
    let (source, genesis) = create_engine(config);
    let (sink, _) = create_engine(config);

    let chain = create_chain(&genesis, 6);
    for block in &chain {
        source
            .store()
            .persist_block(block.clone())
            .await
            .expect("imports");
    }

    let (source_end, sink_end) = connected_pair();
    let source_session = source.spawn_session(source_end);
    let sink_session = sink.spawn_session(sink_end);
    wait_until(|| source.stats().connected_peers == 1 && sink.stats().connected_peers == 1).await;

    let tip = chain.last().expect("non-empty chain");
    assert_eq!(source.broadcast_new_block(tip), 1);
    wait_until(|| sink.store().contains(&tip.root())).await;

    for block in &chain {
        assert!(sink.store().contains(&block.root()));
    }
    assert_eq!(sink.store().head_root(), tip.root());
    assert_eq!(
        sink.stats(),
        SyncStats {
            orphan_blocks: 0,
            pending_requests: 0,
            connected_peers: 1,
        }
    );

    sink.shutdown();
    source.shutdown();
    assert_eq!(sink_session.await.expect("session joins"), Ok(()));
    assert_eq!(source_session.await.expect("session joins"), Ok(()));
    assert_eq!(sink.stats().connected_peers, 0);
}

#[tokio::test]
async fn test_silent_peer_times_out() {
    let (engine, genesis) = create_engine(quiet_config(Duration::from_millis(50)));
    let chain = create_chain(&genesis, 2);
    let (engine_end, mut remote) = connected_pair();
    let remote_id = remote.local_peer_id;
    let session = engine.spawn_session(engine_end);

    let encoded_block = SszSnappyCodec.encode(&chain[1]).expect("encodes");
    remote
        .outbound
        .send(BeaconMessage::NewBlock { encoded_block })
        .expect("session alive");

    let request = timeout(Duration::from_secs(1), remote.inbound.recv())
        .await
        .expect("request in time")
        .expect("link open");
    assert!(matches!(
        request,
        BeaconMessage::GetBeaconBlocks {
            block_slot_or_root: SlotOrRoot::Root(root),
            ..
        } if root == chain[0].root()
    ));
    assert_eq!(engine.stats().pending_requests, 1);

    // never answer
    let result = session.await.expect("session joins");
    assert_eq!(
        result,
        Err(SessionError::PeerConnectionLost {
            peer_id: remote_id,
            reason: LossReason::Timeout,
        })
    );
    assert_eq!(
        engine.stats(),
        SyncStats {
            orphan_blocks: 1,
            pending_requests: 0,
            connected_peers: 0,
        }
    );
}

#[tokio::test]
async fn test_closed_link_ends_session() {
    let (engine, _) = create_engine(quiet_config(Duration::from_secs(30)));
    let (engine_end, remote) = connected_pair();
    let remote_id = remote.local_peer_id;
    let session = engine.spawn_session(engine_end);

    drop(remote);

    assert_eq!(
        session.await.expect("session joins"),
        Err(SessionError::PeerConnectionLost {
            peer_id: remote_id,
            reason: LossReason::Closed,
        })
    );
    assert_eq!(engine.stats().connected_peers, 0);
}

#[tokio::test]
async fn test_shutdown_ends_session_cleanly() {
    let (engine, _) = create_engine(quiet_config(Duration::from_secs(30)));
    let (engine_end, _remote) = connected_pair();
    let session = engine.spawn_session(engine_end);
    wait_until(|| engine.stats().connected_peers == 1).await;

    engine.shutdown();

    assert_eq!(session.await.expect("session joins"), Ok(()));
    assert_eq!(engine.stats().connected_peers, 0);
}
