//! Dashboard policy knobs
//!
//! Everything here is policy, not protocol: TTLs, the retry budget,
//! the poll cadence, and the default history window. Defaults match
//! the deployed dashboard (60 s / 300 s TTLs, 3 × 1 s retries, 50-row
//! history, 5-minute security poll).

use std::time::Duration;

use aquawatch_store::RetryPolicy;

/// Tunable policy for the dashboard service
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Freshness window for latest-reading and latest-security queries
    pub latest_ttl: Duration,
    /// Freshness window for historical series queries
    pub series_ttl: Duration,
    /// Retry budget wrapped around every store query
    pub retry: RetryPolicy,
    /// Cadence of the background security poller
    pub poll_interval: Duration,
    /// History window used when the caller does not pick one
    pub default_history_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            latest_ttl: Duration::from_secs(60),
            series_ttl: Duration::from_secs(300),
            retry: RetryPolicy::default(),
            poll_interval: Duration::from_secs(300),
            default_history_limit: 50,
        }
    }
}

impl DashboardConfig {
    /// Set the latest-value freshness window in seconds
    pub fn latest_ttl_secs(mut self, secs: u64) -> Self {
        self.latest_ttl = Duration::from_secs(secs);
        self
    }

    /// Set the series freshness window in seconds
    pub fn series_ttl_secs(mut self, secs: u64) -> Self {
        self.series_ttl = Duration::from_secs(secs);
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the security poll cadence in seconds
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval = Duration::from_secs(secs);
        self
    }

    /// Set the default history window
    pub fn default_history_limit(mut self, limit: usize) -> Self {
        self.default_history_limit = limit;
        self
    }
}
