//! Fundamental types for the meshmap observer.
//!
//! This crate defines the small value types shared across every other crate in
//! the workspace: node numbers, timestamps and the clock seam, and the pruning
//! parameters that bound the node directory.

pub mod node_num;
pub mod params;
pub mod time;

pub use node_num::{NodeNum, ParseNodeNumError};
pub use params::{PruneTtls, NEIGHBOR_LIMIT, SEEN_BY_LIMIT};
pub use time::{Clock, SystemClock, Timestamp};
