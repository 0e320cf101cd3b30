//! Reference-counted in-flight indicator
//!
//! Overlapping lookups each hold an [`InFlightGuard`]; the indicator is active
//! while any guard is alive. Guards decrement on drop, so success, failure and
//! a cancelled (dropped) future all release their slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct InFlight {
    count: Arc<AtomicUsize>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one in-flight request.
    pub fn enter(&self) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            count: Arc::clone(&self.count),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.count() > 0
    }
}

#[derive(Debug)]
#[must_use = "the request counts as finished as soon as the guard is dropped"]
pub struct InFlightGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
