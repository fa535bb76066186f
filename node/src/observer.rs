//! The observer: intake loop plus the periodic maintenance tasks.
//!
//! Each broker message is decoded, dispatched and applied on the blocking
//! pool, so messages are handled concurrently and only the one-node update
//! takes the table lock. Two background tasks run beside the intake loop:
//!
//! - maintenance, every `prune_interval_secs`: prune the table, write the
//!   valid subset to the snapshot store, then check the liveness watchdog;
//! - rate reset, every `rate_limit_window_secs`: clear the per-sender counters.
//!
//! Maintenance also runs on the blocking pool and holds the table lock for
//! the whole pass, so handlers wait to apply while a snapshot is written.
//! Decoding carries on meanwhile.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::Instant;

use meshmap_crypto::ChannelCipher;
use meshmap_network::{BrokerMessage, RateLimiter};
use meshmap_protocol::{EnvelopeDecoder, TopicFilter};
use meshmap_store::{NodeDb, SnapshotStore};
use meshmap_types::{Clock, NodeNum, SystemClock};

use crate::dispatcher::dispatch;
use crate::{Liveness, NodeError, ObserverConfig, ObserverMetrics, ShutdownController};

/// Maximum time to wait for background tasks after shutdown is signalled.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Messages being handled at once before intake stops reading the broker.
const MAX_IN_FLIGHT: usize = 64;

/// What became of one broker message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleOutcome {
    /// A node update of this kind was applied.
    Applied(&'static str),
    /// Decoded and logged, nothing to store.
    Observed,
    /// Dropped for this reason.
    Dropped(&'static str),
}

/// Result of one maintenance pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub remaining: usize,
    pub removed: usize,
    /// Nodes written to the snapshot, if a snapshot store is configured.
    pub written: Option<usize>,
}

struct Shared {
    config: ObserverConfig,
    db: Mutex<NodeDb>,
    limiter: RateLimiter,
    decoder: EnvelopeDecoder,
    liveness: Liveness,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    clock: Arc<dyn Clock>,
    metrics: ObserverMetrics,
}

impl Shared {
    fn db(&self) -> MutexGuard<'_, NodeDb> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, message: &BrokerMessage) -> HandleOutcome {
        self.metrics.messages_received.inc();

        let packet = match self
            .decoder
            .decode(&message.topic, &message.payload, &self.limiter)
        {
            Ok(packet) => packet,
            Err(e) => {
                if e.is_routine() {
                    tracing::debug!(topic = %message.topic, error = %e, "dropped message");
                } else {
                    tracing::warn!(topic = %message.topic, error = %e, "dropped message");
                }
                self.metrics.record_drop(e.reason());
                return HandleOutcome::Dropped(e.reason());
            }
        };
        self.liveness.mark();
        self.metrics.messages_accepted.inc();

        let update = match dispatch(&packet) {
            Ok(Some(update)) => update,
            Ok(None) => return HandleOutcome::Observed,
            Err(e) => {
                let from = packet.from.to_user_id();
                if e.is_routine() {
                    tracing::debug!(%from, topic = %packet.topic, error = %e, "dropped payload");
                } else {
                    tracing::warn!(%from, topic = %packet.topic, error = %e, "dropped payload");
                }
                self.metrics.record_drop(e.reason());
                return HandleOutcome::Dropped(e.reason());
            }
        };

        let kind = update.kind();
        let now = self.clock.now();
        update.apply(&mut self.db(), packet.from, &packet.topic, now);
        tracing::debug!(from = %packet.from.to_user_id(), topic = %packet.topic, kind, "applied update");
        self.metrics.record_update(kind);
        HandleOutcome::Applied(kind)
    }

    fn maintenance_cycle(&self) -> Result<MaintenanceReport, NodeError> {
        let now = self.clock.now();
        let report = {
            let mut db = self.db();
            let summary = db.prune(&self.config.ttls, now);
            self.metrics.node_count.set(summary.remaining as i64);

            let written = match &self.snapshots {
                Some(store) => {
                    let valid = db.valid();
                    if let Err(e) = store.save(&valid) {
                        self.metrics.snapshot_failures.inc();
                        tracing::error!(error = %e, "failed to write nodes");
                        return Err(e.into());
                    }
                    self.metrics.snapshot_writes.inc();
                    self.metrics.valid_node_count.set(valid.len() as i64);
                    tracing::info!(count = valid.len(), "wrote nodes");
                    Some(valid.len())
                }
                None => None,
            };

            MaintenanceReport {
                remaining: summary.remaining,
                removed: summary.removed,
                written,
            }
        };

        tracing::info!(
            nodes = report.remaining,
            pruned = report.removed,
            received = self.metrics.messages_received.get(),
            accepted = self.metrics.messages_accepted.get(),
            "maintenance complete"
        );

        if !self.liveness.take() {
            let interval = self.config.prune_interval_secs;
            tracing::error!(interval_secs = interval, "no messages received");
            return Err(NodeError::Silence(interval));
        }
        Ok(report)
    }
}

/// Ingests broker traffic into the node table and keeps the snapshot fresh.
pub struct MeshObserver {
    shared: Arc<Shared>,
    shutdown: Arc<ShutdownController>,
    task_handles: Vec<JoinHandle<()>>,
}

impl MeshObserver {
    /// Build an observer, seeding the table from the snapshot store.
    ///
    /// A snapshot that exists but cannot be read is an error.
    pub fn new(
        config: ObserverConfig,
        blocklist: HashSet<NodeNum>,
        snapshots: Option<Arc<dyn SnapshotStore>>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let topics = TopicFilter::new(&config.topic_pattern)?;
        let decoder = EnvelopeDecoder::new(topics, ChannelCipher::new(config.channel_key.clone()));
        let limiter = RateLimiter::new(config.rate_limit_count, blocklist);

        let db = match &snapshots {
            Some(store) => {
                let db = store.load()?;
                tracing::info!(count = db.len(), "loaded nodes");
                db
            }
            None => NodeDb::new(),
        };

        let metrics = ObserverMetrics::new();
        metrics.node_count.set(db.len() as i64);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                db: Mutex::new(db),
                limiter,
                decoder,
                liveness: Liveness::new(),
                snapshots,
                clock: Arc::new(SystemClock),
                metrics,
            }),
            shutdown: Arc::new(ShutdownController::new()),
            task_handles: Vec::new(),
        })
    }

    /// Replace the wall clock, e.g. with a controllable one in tests.
    ///
    /// Only valid before [`run`](Self::run) starts the background tasks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::get_mut(&mut self.shared);
        debug_assert!(shared.is_some(), "clock replaced after tasks started");
        if let Some(shared) = shared {
            shared.clock = clock;
        }
        self
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.shared.config
    }

    pub fn metrics(&self) -> &ObserverMetrics {
        &self.shared.metrics
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.shared.limiter
    }

    /// A copy of the live table, valid and incomplete nodes alike.
    pub fn nodes(&self) -> NodeDb {
        self.shared.db().clone()
    }

    /// Handle used to stop [`run`](Self::run) from another task.
    pub fn shutdown_handle(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Decode one broker message and apply it to the table.
    pub fn handle(&self, message: &BrokerMessage) -> HandleOutcome {
        self.shared.handle(message)
    }

    /// Prune, write the snapshot, then check that traffic arrived since the
    /// previous cycle. A write failure or silence is fatal.
    pub fn maintenance_cycle(&self) -> Result<MaintenanceReport, NodeError> {
        self.shared.maintenance_cycle()
    }

    /// Clear the per-sender rate counters.
    pub fn reset_rate_limits(&self) {
        self.shared.limiter.reset();
    }

    /// Consume broker messages until shutdown, a fatal maintenance error, or
    /// the broker channel closing.
    pub async fn run(&mut self, mut inbound: mpsc::Receiver<BrokerMessage>) -> Result<(), NodeError> {
        let mut shutdown_rx = self.shutdown.subscribe();
        if self.shutdown.is_triggered() {
            return Ok(());
        }

        let (fatal_tx, mut fatal_rx) = mpsc::channel::<NodeError>(1);
        self.spawn_maintenance(fatal_tx);
        self.spawn_rate_reset();
        tracing::info!(
            interval_secs = self.shared.config.prune_interval_secs,
            "observer running"
        );

        let mut in_flight: JoinSet<HandleOutcome> = JoinSet::new();
        let result = loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::info!("observer shutting down");
                    break Ok(());
                }
                Some(err) = fatal_rx.recv() => break Err(err),
                Some(joined) = in_flight.join_next() => reap(joined),
                message = inbound.recv(), if in_flight.len() < MAX_IN_FLIGHT => match message {
                    Some(message) => {
                        let shared = Arc::clone(&self.shared);
                        in_flight.spawn_blocking(move || shared.handle(&message));
                    }
                    None => {
                        tracing::error!("broker channel closed");
                        break Err(NodeError::BrokerClosed);
                    }
                },
            }
        };

        // Handlers already started are allowed to finish.
        while let Some(joined) = in_flight.join_next().await {
            reap(joined);
        }
        self.shutdown.shutdown();
        result
    }

    /// Signal the background tasks and wait for them to finish.
    pub async fn stop(&mut self) -> Result<(), NodeError> {
        self.shutdown.shutdown();

        let handles: Vec<JoinHandle<()>> = self.task_handles.drain(..).collect();
        let wait_all = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait_all).await.is_err() {
            tracing::warn!(
                timeout = ?SHUTDOWN_TIMEOUT,
                "shutdown timeout, some tasks may still be running"
            );
        }

        tracing::info!(nodes = self.shared.db().len(), "observer stopped");
        Ok(())
    }

    fn spawn_maintenance(&mut self, fatal: mpsc::Sender<NodeError>) {
        let shared = Arc::clone(&self.shared);
        let mut shutdown_rx = self.shutdown.subscribe();
        let period = Duration::from_secs(shared.config.prune_interval_secs);

        self.task_handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    _ = interval.tick() => {
                        let cycle = Arc::clone(&shared);
                        let outcome = tokio::task::spawn_blocking(move || cycle.maintenance_cycle())
                            .await
                            .map_err(NodeError::from)
                            .and_then(|result| result);
                        if let Err(e) = outcome {
                            let _ = fatal.send(e).await;
                            break;
                        }
                    }
                }
            }
        }));
    }

    fn spawn_rate_reset(&mut self) {
        let shared = Arc::clone(&self.shared);
        let mut shutdown_rx = self.shutdown.subscribe();
        let period = Duration::from_secs(shared.config.rate_limit_window_secs);

        self.task_handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => break,
                    _ = interval.tick() => shared.limiter.reset(),
                }
            }
        }));
    }
}

fn reap(joined: Result<HandleOutcome, JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "message handler failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshmap_messages::{mesh_packet::PayloadVariant, Data, MeshPacket, Message, PortNum, ServiceEnvelope};
    use meshmap_nullables::{NullClock, NullSnapshotStore};

    const TOPIC: &str = "msh/US/2/e/LongFast/!00aaaa01";

    fn text_message(from: u32) -> BrokerMessage {
        let bytes = ServiceEnvelope {
            packet: Some(MeshPacket {
                from,
                id: 1,
                payload_variant: Some(PayloadVariant::Decoded(Data {
                    portnum: PortNum::TextMessageApp as i32,
                    payload: b"hi".to_vec(),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            channel_id: "LongFast".into(),
            gateway_id: "!00aaaa01".into(),
        }
        .encode_to_vec();
        BrokerMessage::new(TOPIC, bytes)
    }

    fn observer() -> MeshObserver {
        MeshObserver::new(ObserverConfig::default(), HashSet::new(), None).unwrap()
    }

    #[test]
    fn text_is_observed_and_counts_as_traffic() {
        let observer = observer();
        assert_eq!(observer.handle(&text_message(0xAAAA01)), HandleOutcome::Observed);
        assert_eq!(observer.metrics().messages_accepted.get(), 1);
        assert!(observer.nodes().is_empty());
        assert!(observer.maintenance_cycle().is_ok());
    }

    #[test]
    fn silence_is_fatal() {
        let observer = observer();
        let err = observer.maintenance_cycle().unwrap_err();
        assert!(matches!(err, NodeError::Silence(60)));
    }

    #[test]
    fn dropped_messages_do_not_feed_the_watchdog() {
        let observer = observer();
        let outcome = observer.handle(&BrokerMessage::new("msh/US/2/json/x/!1", vec![1]));
        assert_eq!(outcome, HandleOutcome::Dropped("topic"));
        assert!(observer.maintenance_cycle().is_err());
    }

    #[test]
    fn blocked_sender_is_dropped() {
        let blocklist = HashSet::from([NodeNum::new(0xBAD)]);
        let observer = MeshObserver::new(ObserverConfig::default(), blocklist, None).unwrap();
        assert_eq!(
            observer.handle(&text_message(0xBAD)),
            HandleOutcome::Dropped("rate_limited")
        );
        assert_eq!(observer.metrics().dropped("rate_limited"), 1);
    }

    #[test]
    fn unreadable_snapshot_fails_construction() {
        let store = Arc::new(NullSnapshotStore::new());
        store.fail_loads(true);
        let store: Arc<dyn SnapshotStore> = store;
        let result = MeshObserver::new(ObserverConfig::default(), HashSet::new(), Some(store));
        assert!(matches!(result, Err(NodeError::Store(_))));
    }

    #[test]
    fn invalid_topic_pattern_fails_construction() {
        let config = ObserverConfig {
            topic_pattern: "msh/(".into(),
            ..ObserverConfig::default()
        };
        let result = MeshObserver::new(config, HashSet::new(), None);
        assert!(matches!(result, Err(NodeError::Protocol(_))));
    }

    #[test]
    fn clock_can_be_replaced_before_running() {
        let clock = Arc::new(NullClock::new(1_000));
        let observer = observer().with_clock(clock.clone());
        clock.advance(5);
        assert_eq!(observer.shared.clock.now().as_secs(), 1_005);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "clock replaced after tasks started")]
    fn replacing_clock_on_shared_observer_panics() {
        let observer = observer();
        let _task_view = Arc::clone(&observer.shared);
        let _ = observer.with_clock(Arc::new(NullClock::new(0)));
    }

    #[tokio::test]
    async fn run_returns_when_broker_closes() {
        let mut observer = observer();
        let (tx, rx) = mpsc::channel(4);
        tx.send(text_message(0xAAAA01)).await.unwrap();
        drop(tx);
        let err = observer.run(rx).await.unwrap_err();
        assert!(matches!(err, NodeError::BrokerClosed));
        assert_eq!(observer.metrics().messages_received.get(), 1);
        observer.stop().await.unwrap();
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let mut observer = observer();
        let shutdown = observer.shutdown_handle();
        let (_tx, rx) = mpsc::channel(4);
        shutdown.shutdown();
        observer.run(rx).await.unwrap();
        observer.stop().await.unwrap();
    }
}
