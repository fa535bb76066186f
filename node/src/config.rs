//! Observer configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use meshmap_crypto::ChannelKey;
use meshmap_network::{MqttConfig, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW_SECS};
use meshmap_protocol::DEFAULT_TOPIC_PATTERN;
use meshmap_types::PruneTtls;

use crate::NodeError;

/// Configuration for the observer.
///
/// Loaded from a TOML file via [`ObserverConfig::from_toml_file`], overridden
/// by command-line flags, or built programmatically in tests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Where the snapshot of valid nodes is written. No file, no snapshot.
    #[serde(default)]
    pub nodes_file: Option<PathBuf>,

    /// One decimal node number per line; those senders are ignored.
    #[serde(default)]
    pub blocklist_file: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log filter, e.g. "info" or "info,meshmap_node=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between prune/snapshot/watchdog cycles.
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,

    /// Messages accepted per sender per window.
    #[serde(default = "default_rate_limit_count")]
    pub rate_limit_count: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Topics not matching this regex are ignored.
    #[serde(default = "default_topic_pattern")]
    pub topic_pattern: String,

    /// Pre-shared key of the channel to decrypt, as hex.
    #[serde(default)]
    pub channel_key: ChannelKey,

    #[serde(default)]
    pub ttls: PruneTtls,

    #[serde(default)]
    pub broker: MqttConfig,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_prune_interval_secs() -> u64 {
    60
}

fn default_rate_limit_count() -> u32 {
    DEFAULT_RATE_LIMIT
}

fn default_rate_limit_window_secs() -> u64 {
    DEFAULT_RATE_WINDOW_SECS
}

fn default_topic_pattern() -> String {
    DEFAULT_TOPIC_PATTERN.to_string()
}

impl ObserverConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values that would stall the periodic tasks.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.prune_interval_secs == 0 {
            return Err(NodeError::Config("prune_interval_secs must be positive".into()));
        }
        if self.rate_limit_window_secs == 0 {
            return Err(NodeError::Config(
                "rate_limit_window_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            nodes_file: None,
            blocklist_file: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            prune_interval_secs: default_prune_interval_secs(),
            rate_limit_count: default_rate_limit_count(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            topic_pattern: default_topic_pattern(),
            channel_key: ChannelKey::default(),
            ttls: PruneTtls::default(),
            broker: MqttConfig::default(),
        }
    }
}
