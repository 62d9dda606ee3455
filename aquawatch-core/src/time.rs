//! Time management for the dashboard core
//!
//! Provides a clock abstraction so cache freshness and result staleness
//! are testable without wall-clock sleeps:
//! - System clock (production)
//! - Fixed clock (tests, advanced by hand)

use std::sync::atomic::{AtomicU64, Ordering};

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Milliseconds per second, for rate and TTL arithmetic
pub const MS_PER_SECOND: u64 = 1_000;

/// Source of time for the system
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System time source backed by the OS wall clock
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
///
/// Interior mutability so a single clock can be shared behind `Arc`
/// between the code under test and the test driving it.
#[derive(Debug, Default)]
pub struct FixedClock {
    ms: AtomicU64,
}

impl FixedClock {
    /// Create a clock pinned at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            ms: AtomicU64::new(timestamp),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, timestamp: Timestamp) {
        self.ms.store(timestamp, Ordering::SeqCst);
    }

    /// Advance the clock by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.ms.load(Ordering::SeqCst)
    }
}
