//! Remote Table-Store Access for AquaWatch
//!
//! ## Overview
//!
//! All durable data lives in a hosted table store reached over HTTPS:
//! one table of timestamped sensor readings, one of security-alert
//! events. This crate owns everything between the dashboard and that
//! store - the HTTP client, wire-row decoding into domain types, and
//! the bounded retry policy that wraps every query.
//!
//! ## Design Decisions
//!
//! ### The trait seam
//!
//! The pipeline never talks to [`http::HttpStore`] directly; it takes
//! any [`TableStore`]. That keeps the fetch/cache/classify logic
//! testable against scripted stores with no network in the loop.
//!
//! ### Retryability
//!
//! The store's HTTP surface gives real error classification, so retry
//! is not blanket: transport failures and server-side trouble (5xx,
//! 429) are worth retrying; client errors, bad configuration, and
//! undecodable payloads are not - repeating those can only repeat the
//! failure. [`StoreError::is_transient`] encodes the split and
//! [`retry::RetryPolicy`] honors it.
//!
//! ## Example Usage
//!
//! ```no_run
//! use aquawatch_store::{http::{HttpStore, StoreConfig}, retry::RetryPolicy, TableStore};
//!
//! # async fn example() -> Result<(), aquawatch_store::StoreError> {
//! let store = HttpStore::new(
//!     StoreConfig::new("https://project.supabase.co")
//!         .api_key("service-key")
//!         .timeout_secs(30),
//! )?;
//!
//! let retry = RetryPolicy::default();
//! let rows = retry.execute(|| store.latest_readings(1)).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod http;
pub mod retry;

// Re-export common types
pub use http::{HttpStore, StoreConfig};
pub use retry::RetryPolicy;

use async_trait::async_trait;
use thiserror::Error;

use aquawatch_core::{SecurityEvent, SensorReading};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors talking to the remote table store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or transport failure, including request timeouts
    #[error("request failed: {0}")]
    Request(String),

    /// Store answered with an error status
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        message: String,
    },

    /// Response body could not be decoded into rows
    #[error("decode error: {0}")]
    Decode(String),

    /// Client-side configuration problem
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether a retry has any chance of succeeding
    ///
    /// Transport errors and server-side trouble are transient; client
    /// errors, config and decode failures are deterministic.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::Config(_) => false,
        }
    }
}

/// Query surface of the remote table store
///
/// Both methods return rows newest first (timestamp descending), which
/// is how the store indexes them; consumers re-sort for display.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Up to `limit` most recent sensor readings, newest first
    async fn latest_readings(&self, limit: usize) -> StoreResult<Vec<SensorReading>>;

    /// Up to `limit` most recent security events, newest first
    async fn latest_security_events(&self, limit: usize) -> StoreResult<Vec<SecurityEvent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_split() {
        assert!(StoreError::Request("connection reset".into()).is_transient());
        assert!(StoreError::Server { status: 503, message: String::new() }.is_transient());
        assert!(StoreError::Server { status: 429, message: String::new() }.is_transient());

        assert!(!StoreError::Server { status: 404, message: String::new() }.is_transient());
        assert!(!StoreError::Decode("bad row".into()).is_transient());
        assert!(!StoreError::Config("no url".into()).is_transient());
    }
}
