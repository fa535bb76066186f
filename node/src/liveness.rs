//! Watchdog flag: has any traffic arrived since the last check?

use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the intake path on every decoded message, and tested-and-cleared
/// once per maintenance cycle.
#[derive(Debug, Default)]
pub struct Liveness {
    receiving: AtomicBool,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        self.receiving.store(true, Ordering::Release);
    }

    /// Whether traffic arrived since the previous call. Clears the flag.
    pub fn take(&self) -> bool {
        self.receiving.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        assert!(!Liveness::new().take());
    }

    #[test]
    fn take_clears_the_flag() {
        let liveness = Liveness::new();
        liveness.mark();
        liveness.mark();
        assert!(liveness.take());
        assert!(!liveness.take());
    }
}
