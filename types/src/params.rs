//! Pruning parameters: how long each part of a node record stays fresh,
//! and how large the bounded collections may grow.

use serde::{Deserialize, Serialize};

/// Maximum number of relay topics remembered per node.
pub const SEEN_BY_LIMIT: usize = 10;

/// Maximum number of neighbors remembered per node.
pub const NEIGHBOR_LIMIT: usize = 100;

/// Per-group time-to-live values, in seconds.
///
/// Each optional group of a node record ages independently: once its own
/// stamp is older than its own TTL the whole group is cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneTtls {
    /// Relay observations. A node whose relays all expire is forgotten.
    /// Default: 1 day.
    pub seen_by_secs: u64,

    /// Neighbor reports. Default: 2 hours.
    pub neighbor_secs: u64,

    /// Device metrics (battery, voltage, utilization, uptime). Default: 2 hours.
    pub device_metrics_secs: u64,

    /// Environment sensor readings. Default: 2 hours.
    pub environment_metrics_secs: u64,

    /// Map report data (firmware, region, modem preset). Default: 1 day.
    pub map_report_secs: u64,
}

impl Default for PruneTtls {
    fn default() -> Self {
        Self {
            seen_by_secs: 86_400,
            neighbor_secs: 7_200,
            device_metrics_secs: 7_200,
            environment_metrics_secs: 7_200,
            map_report_secs: 86_400,
        }
    }
}
