//! Timestamp type and the clock seam.
//!
//! Timestamps are Unix epoch seconds (UTC), the unit the snapshot file uses
//! for every freshness stamp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since this timestamp (relative to `now`).
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether more than `ttl_secs` have passed between this stamp and `now`.
    ///
    /// An entry stamped exactly `ttl_secs` ago is still fresh.
    pub fn is_older_than(&self, ttl_secs: u64, now: Timestamp) -> bool {
        self.0.saturating_add(ttl_secs) < now.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of the current time.
///
/// The observer reads time through this trait so tests can drive expiry
/// deterministically (see `meshmap-nullables`).
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_at_ttl_boundary_is_fresh() {
        let stamp = Timestamp::new(1_000);
        assert!(!stamp.is_older_than(60, Timestamp::new(1_060)));
        assert!(stamp.is_older_than(60, Timestamp::new(1_061)));
    }

    #[test]
    fn huge_ttl_never_expires() {
        let stamp = Timestamp::new(u64::MAX - 1);
        assert!(!stamp.is_older_than(u64::MAX, Timestamp::new(u64::MAX)));
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&Timestamp::new(1_700_000_000)).unwrap();
        assert_eq!(json, "1700000000");
    }
}
