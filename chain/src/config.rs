use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Consensus constants for one network.
///
/// Every duty-assignment and transition function takes a `&ChainConfig`
/// explicitly; there is no process-wide configuration to override.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ChainConfig {
    pub slots_per_epoch: u64,
    pub shard_count: u64,
    pub target_committee_size: u64,
    pub shuffle_round_count: u8,
    pub genesis_slot: u64,
    pub genesis_epoch: u64,
    pub far_future_epoch: u64,
    pub min_seed_lookahead: u64,
    pub activation_exit_delay: u64,
    pub latest_randao_mixes_length: u64,
    pub latest_active_index_roots_length: u64,
    pub seconds_per_slot: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be non-zero")]
    Zero { field: &'static str },
    #[error("shard count {shard_count} is lower than slots per epoch {slots_per_epoch}")]
    TooFewShards {
        shard_count: u64,
        slots_per_epoch: u64,
    },
    #[error("genesis epoch {genesis_epoch} does not match genesis slot {genesis_slot}")]
    GenesisMismatch { genesis_slot: u64, genesis_epoch: u64 },
}

pub const SERENITY_CONFIG: ChainConfig = ChainConfig {
    slots_per_epoch: 64,
    shard_count: 1024,
    target_committee_size: 128,
    shuffle_round_count: 90,
    genesis_slot: 1 << 32,
    genesis_epoch: (1 << 32) / 64,
    far_future_epoch: u64::MAX,
    min_seed_lookahead: 1,
    activation_exit_delay: 4,
    latest_randao_mixes_length: 8192,
    latest_active_index_roots_length: 8192,
    seconds_per_slot: 6,
};

/// Small testnet preset: short epochs, few shards, short history vectors.
pub const XIAO_LONG_BAO_CONFIG: ChainConfig = ChainConfig {
    slots_per_epoch: 4,
    shard_count: 8,
    target_committee_size: 2,
    shuffle_round_count: 10,
    genesis_slot: 0,
    genesis_epoch: 0,
    far_future_epoch: u64::MAX,
    min_seed_lookahead: 1,
    activation_exit_delay: 4,
    latest_randao_mixes_length: 64,
    latest_active_index_roots_length: 64,
    seconds_per_slot: 6,
};

impl ChainConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that would break committee arithmetic.
    ///
    /// The committee count formula only stays within `shard_count` when there
    /// are at least as many shards as slots in an epoch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("SLOTS_PER_EPOCH", self.slots_per_epoch),
            ("SHARD_COUNT", self.shard_count),
            ("TARGET_COMMITTEE_SIZE", self.target_committee_size),
            ("SHUFFLE_ROUND_COUNT", u64::from(self.shuffle_round_count)),
            ("LATEST_RANDAO_MIXES_LENGTH", self.latest_randao_mixes_length),
            (
                "LATEST_ACTIVE_INDEX_ROOTS_LENGTH",
                self.latest_active_index_roots_length,
            ),
        ];

        if let Some((field, _)) = non_zero.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero { field: *field });
        }

        if self.shard_count < self.slots_per_epoch {
            return Err(ConfigError::TooFewShards {
                shard_count: self.shard_count,
                slots_per_epoch: self.slots_per_epoch,
            });
        }

        if self.genesis_slot / self.slots_per_epoch != self.genesis_epoch {
            return Err(ConfigError::GenesisMismatch {
                genesis_slot: self.genesis_slot,
                genesis_epoch: self.genesis_epoch,
            });
        }

        Ok(())
    }
}
