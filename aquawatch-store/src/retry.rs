//! Bounded Retry with Linear Backoff
//!
//! ## Overview
//!
//! Hosted stores hiccup: connections reset, a pooler restarts, a 503
//! flickers through. Those are worth absorbing instead of surfacing as
//! a failed dashboard action, so every remote query runs under a
//! [`RetryPolicy`] - a bounded attempt budget with a linear backoff
//! between tries:
//!
//! ```text
//! attempt 1 ── fail ── sleep base×1 ── attempt 2 ── fail ── sleep base×2 ── attempt 3
//! ```
//!
//! Only transient failures are retried (see
//! [`StoreError::is_transient`](crate::StoreError::is_transient));
//! deterministic ones fail fast on the first attempt. Exhausting the
//! budget propagates the *last* error so the caller sees what the
//! store was actually saying at the end.

use std::time::Duration;

use crate::{StoreError, StoreResult};

/// Bounded retry-with-backoff around one remote operation
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, including the first try
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` sleeps `base_delay * n` before `n+1`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; an attempt budget of zero is clamped to one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `op` until it succeeds, fails non-transiently, or the
    /// attempt budget is spent
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = StoreResult<T>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        log::info!("store query recovered on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.base_delay * attempt;
                    log::warn!(
                        "store query attempt {attempt}/{} failed: {err}; retrying in {delay:?}",
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    log::error!("store query failed after {attempt} attempt(s): {err}");
                    return Err(err);
                }
            }
        }
    }
}
