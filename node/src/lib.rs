//! Mesh observer core.
//!
//! Ties the pieces together: broker messages are decoded by the protocol
//! layer, dispatched into typed node updates, and applied to the node table,
//! while periodic tasks prune the table, write the snapshot, reset the rate
//! counters and watch for a silent broker.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod liveness;
pub mod logging;
pub mod metrics;
pub mod observer;
pub mod shutdown;

pub use config::ObserverConfig;
pub use dispatcher::{dispatch, AppPayload, DispatchError, NodeUpdate};
pub use error::NodeError;
pub use liveness::Liveness;
pub use logging::{init_logging, LogFormat};
pub use metrics::ObserverMetrics;
pub use observer::{HandleOutcome, MaintenanceReport, MeshObserver};
pub use shutdown::ShutdownController;
