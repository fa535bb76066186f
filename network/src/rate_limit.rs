//! Per-sender message limiter with a fixed, globally reset window.
//!
//! Every sender gets a counter that starts at zero on first sight. Messages
//! are accepted while the counter stays within the limit. All counters are
//! cleared together by [`RateLimiter::reset`], which the observer calls once
//! per window; there is no sliding window.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use meshmap_protocol::SenderGate;
use meshmap_types::NodeNum;

/// Default number of messages a sender may publish per window.
pub const DEFAULT_RATE_LIMIT: u32 = 4000;

/// Default window length in seconds.
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 60 * 60;

/// Only every this-many rejections past the limit is logged.
const LOG_EVERY: u32 = 100;

pub struct RateLimiter {
    limit: u32,
    blocklist: HashSet<NodeNum>,
    counters: Mutex<HashMap<NodeNum, u32>>,
}

impl RateLimiter {
    pub fn new(limit: u32, blocklist: HashSet<NodeNum>) -> Self {
        Self {
            limit,
            blocklist,
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Count one message from `from` and decide whether to let it through.
    ///
    /// Blocked senders are rejected without being counted.
    pub fn accept(&self, from: NodeNum) -> bool {
        if self.blocklist.contains(&from) {
            return false;
        }
        let count = {
            let mut counters = self.counters();
            let counter = counters.entry(from).or_insert(0);
            *counter = counter.saturating_add(1);
            *counter
        };
        if count <= self.limit {
            return true;
        }
        if logs_rejection(count, self.limit) {
            tracing::info!(%from, count, "node rate limited");
        }
        false
    }

    /// Clear every sender's counter at once.
    pub fn reset(&self) {
        self.counters().clear();
        tracing::info!("cleared message counters");
    }

    pub fn is_blocked(&self, from: NodeNum) -> bool {
        self.blocklist.contains(&from)
    }

    /// Messages counted for `from` in the current window.
    pub fn count(&self, from: NodeNum) -> u32 {
        self.counters().get(&from).copied().unwrap_or(0)
    }

    /// Number of senders seen in the current window.
    pub fn tracked_senders(&self) -> usize {
        self.counters().len()
    }

    // A panic while holding the lock cannot leave a counter half-updated.
    fn counters(&self) -> MutexGuard<'_, HashMap<NodeNum, u32>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether the rejection that brought a sender to `count` is worth a log line.
fn logs_rejection(count: u32, limit: u32) -> bool {
    count > limit && (count - limit) % LOG_EVERY == 0
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT, HashSet::new())
    }
}

impl SenderGate for RateLimiter {
    fn accept(&self, from: NodeNum) -> bool {
        RateLimiter::accept(self, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const A: NodeNum = NodeNum::new(0xAAAA01);
    const B: NodeNum = NodeNum::new(0xBBBB02);

    #[test]
    fn accepts_up_to_limit_then_rejects() {
        let limiter = RateLimiter::default();
        for i in 1..=DEFAULT_RATE_LIMIT {
            assert!(limiter.accept(A), "message {i} should pass");
        }
        assert!(!limiter.accept(A));
        assert!(!limiter.accept(A));
        assert_eq!(limiter.count(A), DEFAULT_RATE_LIMIT + 2);
    }

    #[test]
    fn only_every_hundredth_rejection_is_logged() {
        let limit = DEFAULT_RATE_LIMIT;
        assert!(!logs_rejection(limit, limit));
        assert!(!logs_rejection(limit + 1, limit));
        assert!(!logs_rejection(limit + 99, limit));
        assert!(logs_rejection(limit + 100, limit));
        assert!(!logs_rejection(limit + 101, limit));
        assert!(logs_rejection(limit + 200, limit));
        assert!(!logs_rejection(100, limit));
    }

    #[test]
    fn senders_are_counted_independently() {
        let limiter = RateLimiter::new(2, HashSet::new());
        assert!(limiter.accept(A));
        assert!(limiter.accept(A));
        assert!(!limiter.accept(A));
        assert!(limiter.accept(B));
        assert_eq!(limiter.tracked_senders(), 2);
    }

    #[test]
    fn reset_restarts_every_counter() {
        let limiter = RateLimiter::new(1, HashSet::new());
        assert!(limiter.accept(A));
        assert!(limiter.accept(B));
        assert!(!limiter.accept(A));
        assert!(!limiter.accept(B));

        limiter.reset();
        assert_eq!(limiter.tracked_senders(), 0);
        assert!(limiter.accept(A));
        assert!(limiter.accept(B));
    }

    #[test]
    fn blocked_sender_is_rejected_and_not_counted() {
        let limiter = RateLimiter::new(10, HashSet::from([A]));
        assert!(limiter.is_blocked(A));
        assert!(!limiter.accept(A));
        assert_eq!(limiter.count(A), 0);
        assert!(limiter.accept(B));
    }

    #[test]
    fn usable_as_sender_gate() {
        let limiter = RateLimiter::new(1, HashSet::new());
        let gate: &dyn SenderGate = &limiter;
        assert!(gate.accept(A));
        assert!(!gate.accept(A));
    }

    #[test]
    fn concurrent_senders_never_exceed_limit() {
        let limiter = Arc::new(RateLimiter::new(1000, HashSet::new()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..500).filter(|_| limiter.accept(A)).count())
            })
            .collect();
        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 1000);
        assert_eq!(limiter.count(A), 4000);
    }
}
