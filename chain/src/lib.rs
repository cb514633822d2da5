pub mod config;

pub use config::{ChainConfig, ConfigError, SERENITY_CONFIG, XIAO_LONG_BAO_CONFIG};
