use anyhow::{bail, Context as _, Result};
use chain::ChainConfig;
use clap::{Parser, Subcommand};
use committees::{get_beacon_proposer_index, get_crosslink_committees_at_slot};
use containers::{Epoch, SignedBlock, Slot};
use forks::{process_slots, BlockParams, ForkBundle, ForkName};
use networking::connected_pair;
use networking::sync::{ChainStore, ChainSyncEngine, MemoryChainStore, SyncConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Beacon chain duty assignment and block sync")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print crosslink committees and the proposer for every slot of an epoch.
    Duties {
        #[arg(short, long, default_value = "xiao_long_bao")]
        fork: ForkName,

        /// YAML chain config replacing the fork's preset.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, default_value_t = 64)]
        validators: usize,

        #[arg(short, long, default_value_t = 0)]
        epoch: u64,
    },
    /// Build a chain on one node and let a second node sync it over a memory link.
    Simulate {
        #[arg(short, long, default_value = "xiao_long_bao")]
        fork: ForkName,

        #[arg(short, long, default_value_t = 64)]
        validators: usize,

        #[arg(short, long, default_value_t = 16)]
        blocks: u64,

        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::Duties {
            fork,
            config,
            validators,
            epoch,
        } => print_duties(fork, config, validators, Epoch(epoch)),
        Command::Simulate {
            fork,
            validators,
            blocks,
            timeout_secs,
        } => simulate(fork, validators, blocks, Duration::from_secs(timeout_secs)).await,
    }
}

fn load_bundle(fork: ForkName, config: Option<PathBuf>) -> Result<ForkBundle> {
    let config = match config {
        Some(path) => ChainConfig::load_from_file(&path)
            .with_context(|| format!("loading chain config from {}", path.display()))?,
        None => fork.bundle().config.clone(),
    };

    Ok(ForkBundle {
        config,
        ..*fork.bundle()
    })
}

fn print_duties(
    fork: ForkName,
    config: Option<PathBuf>,
    validators: usize,
    epoch: Epoch,
) -> Result<()> {
    let bundle = load_bundle(fork, config)?;
    let config = &bundle.config;
    let (mut state, _) = bundle.genesis(validators).context("building genesis state")?;

    let start_slot = epoch.start_slot(config.slots_per_epoch);
    process_slots(&mut state, start_slot, config)
        .with_context(|| format!("advancing state to slot {}", start_slot.0))?;

    println!("fork {fork}, epoch {}, {validators} validators", epoch.0);

    for offset in 0..config.slots_per_epoch {
        let slot = Slot(start_slot.0 + offset);
        let committees = get_crosslink_committees_at_slot(&state, slot, config, false)
            .with_context(|| format!("resolving committees at slot {}", slot.0))?;

        match get_beacon_proposer_index(&state, slot, config) {
            Ok(proposer) => println!("slot {}: proposer {}", slot.0, proposer.0),
            Err(err) => println!("slot {}: no proposer ({err})", slot.0),
        }

        for crosslink in committees {
            let members: Vec<u64> = crosslink.committee.iter().map(|index| index.0).collect();
            println!("  shard {}: {members:?}", crosslink.shard.0);
        }
    }

    Ok(())
}

async fn simulate(fork: ForkName, validators: usize, blocks: u64, limit: Duration) -> Result<()> {
    let bundle = fork.bundle();
    let config = &bundle.config;
    let (mut state, genesis) = bundle.genesis(validators).context("building genesis state")?;

    let source_store = Arc::new(MemoryChainStore::new(
        genesis.clone(),
        bundle.fork_choice_scoring,
    ));
    let sink_store = Arc::new(MemoryChainStore::new(
        genesis.clone(),
        bundle.fork_choice_scoring,
    ));

    let mut tip = genesis;
    for index in 0..blocks {
        let block = (bundle.create_block_from_parent)(
            &tip,
            BlockParams {
                randao_reveal: index.to_le_bytes().to_vec(),
                ..BlockParams::default()
            },
        );
        let block = SignedBlock::new(block, Vec::new());
        (bundle.state_transition)(&mut state, &block, config)
            .with_context(|| format!("applying block at slot {}", block.slot().0))?;
        source_store
            .persist_block(block.clone())
            .await
            .context("storing source block")?;
        tip = block;
    }
    info!(head = %tip.root(), slot = tip.slot().0, "source chain built");

    let source = Arc::new(ChainSyncEngine::new(source_store, SyncConfig::default()));
    let sink = Arc::new(ChainSyncEngine::new(
        Arc::clone(&sink_store),
        SyncConfig::default(),
    ));

    let (source_end, sink_end) = connected_pair();
    let source_session = source.spawn_session(source_end);
    let sink_session = sink.spawn_session(sink_end);

    let deadline = Instant::now() + limit;
    while source.stats().connected_peers == 0 {
        if Instant::now() > deadline {
            bail!("sessions did not start within {limit:?}");
        }
        sleep(Duration::from_millis(10)).await;
    }

    source.broadcast_new_block(&tip);

    while !sink_store.contains(&tip.root()) {
        if Instant::now() > deadline {
            bail!("sink did not reach slot {} within {limit:?}", tip.slot().0);
        }
        sleep(Duration::from_millis(10)).await;
    }

    let stats = sink.stats();
    println!(
        "synced {} blocks: head {} at slot {}, {} orphans, {} pending requests",
        sink_store.len(),
        sink_store.head_root(),
        tip.slot().0,
        stats.orphan_blocks,
        stats.pending_requests,
    );

    sink.shutdown();
    source.shutdown();
    sink_session.await?.context("sink session")?;
    source_session.await?.context("source session")?;

    Ok(())
}
