//! Prometheus metrics for the observer.
//!
//! [`ObserverMetrics`] owns a dedicated [`Registry`] so a caller embedding
//! the observer can encode it into the Prometheus text format. The observer
//! itself only logs a summary after each maintenance cycle.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};

pub struct ObserverMetrics {
    pub registry: Registry,

    /// Every message delivered by the broker.
    pub messages_received: IntCounter,
    /// Messages that decoded into an application payload.
    pub messages_accepted: IntCounter,
    /// Messages dropped, by reason.
    pub messages_dropped: IntCounterVec,
    /// Applied updates, by kind.
    pub updates_applied: IntCounterVec,
    pub snapshot_writes: IntCounter,
    pub snapshot_failures: IntCounter,

    /// Nodes held after the last prune.
    pub node_count: IntGauge,
    /// Nodes written in the last snapshot.
    pub valid_node_count: IntGauge,
}

impl ObserverMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let messages_received = register_int_counter_with_registry!(
            Opts::new(
                "meshobserv_messages_received_total",
                "Messages delivered by the broker"
            ),
            registry
        )
        .expect("failed to register messages_received counter");

        let messages_accepted = register_int_counter_with_registry!(
            Opts::new(
                "meshobserv_messages_accepted_total",
                "Messages decoded into an application payload"
            ),
            registry
        )
        .expect("failed to register messages_accepted counter");

        let messages_dropped = register_int_counter_vec_with_registry!(
            Opts::new(
                "meshobserv_messages_dropped_total",
                "Messages dropped before reaching the node table"
            ),
            &["reason"],
            registry
        )
        .expect("failed to register messages_dropped counter");

        let updates_applied = register_int_counter_vec_with_registry!(
            Opts::new(
                "meshobserv_updates_applied_total",
                "Node updates applied, by kind"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register updates_applied counter");

        let snapshot_writes = register_int_counter_with_registry!(
            Opts::new(
                "meshobserv_snapshot_writes_total",
                "Snapshots written successfully"
            ),
            registry
        )
        .expect("failed to register snapshot_writes counter");

        let snapshot_failures = register_int_counter_with_registry!(
            Opts::new(
                "meshobserv_snapshot_failures_total",
                "Snapshot writes that failed"
            ),
            registry
        )
        .expect("failed to register snapshot_failures counter");

        let node_count = register_int_gauge_with_registry!(
            Opts::new("meshobserv_nodes", "Nodes currently tracked"),
            registry
        )
        .expect("failed to register node_count gauge");

        let valid_node_count = register_int_gauge_with_registry!(
            Opts::new("meshobserv_valid_nodes", "Nodes complete enough to export"),
            registry
        )
        .expect("failed to register valid_node_count gauge");

        Self {
            registry,
            messages_received,
            messages_accepted,
            messages_dropped,
            updates_applied,
            snapshot_writes,
            snapshot_failures,
            node_count,
            valid_node_count,
        }
    }

    pub fn record_drop(&self, reason: &str) {
        self.messages_dropped.with_label_values(&[reason]).inc();
    }

    pub fn record_update(&self, kind: &str) {
        self.updates_applied.with_label_values(&[kind]).inc();
    }

    pub fn dropped(&self, reason: &str) -> u64 {
        self.messages_dropped.with_label_values(&[reason]).get()
    }
}

impl Default for ObserverMetrics {
    fn default() -> Self {
        Self::new()
    }
}
