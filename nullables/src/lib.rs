//! Nullable infrastructure for deterministic testing.
//!
//! The observer reaches the outside world through three seams: the clock,
//! the broker channel and the snapshot store. This crate provides
//! test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod broker;
pub mod clock;
pub mod store;

pub use broker::NullBroker;
pub use clock::NullClock;
pub use store::NullSnapshotStore;
