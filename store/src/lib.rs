//! Node directory for the mesh observer.
//!
//! [`Node`] records are grouped by the message kind that fills them, and
//! each stamped group ages out on its own TTL. [`NodeDb`] owns the live
//! table; [`SnapshotStore`] persists the exportable subset.

pub mod db;
pub mod error;
pub mod node;
pub mod snapshot;

pub use db::{NodeDb, PruneSummary};
pub use error::StoreError;
pub use node::{
    clean_float, DeviceMetrics, EnvironmentMetrics, Identity, MapReport, Neighbor, Node, Position,
};
pub use snapshot::{JsonFileStore, SnapshotStore};
