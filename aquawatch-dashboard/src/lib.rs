//! Dashboard Core for AquaWatch
//!
//! ## Overview
//!
//! This crate is what a presentation layer actually links against. It
//! composes the store client, the fetch cache, the retry policy, and
//! the frozen classifier into five user-facing actions:
//!
//! - refresh now (invalidate + re-run the prediction pipeline)
//! - latest prediction
//! - historical trend series, with or without per-row predictions
//! - latest security status
//! - security history
//!
//! plus one background task, the security poller, which keeps the
//! security-status cache warm on a fixed interval.
//!
//! ## Failure Containment
//!
//! Every failure is caught at this boundary and converted into a
//! [`DashboardError`] value - a rendering layer gets data or a typed
//! error, never a panic and never a raw store/model error it would
//! have to interpret itself.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use aquawatch_core::time::SystemClock;
//! use aquawatch_dashboard::{DashboardConfig, DashboardService};
//! use aquawatch_store::{http::{HttpStore, StoreConfig}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(HttpStore::new(StoreConfig::from_env()?)?);
//! let service = DashboardService::with_model_file(
//!     store,
//!     "water_quality_model.json",
//!     Arc::new(SystemClock),
//!     DashboardConfig::default(),
//! );
//!
//! let poller = service.spawn_security_poller();
//! let result = service.refresh_now().await?;
//! println!("quality: {}", result.label.name());
//! poller.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod pipeline;
pub mod poller;
pub mod service;

// Public API
pub use config::DashboardConfig;
pub use pipeline::{PipelineResult, PredictionPipeline, TrendPoint};
pub use poller::{PollerHandle, SecurityPoller};
pub use service::DashboardService;

use thiserror::Error;

use aquawatch_core::ReadingError;
use aquawatch_ml::ModelError;
use aquawatch_store::StoreError;

/// Result type for dashboard actions
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Everything a dashboard action can fail with
///
/// The presentation layer renders each variant differently: a fetch
/// failure is a "try again" state, no data is informational, the rest
/// are error banners.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The remote query exhausted its retry budget (or failed fast on
    /// a non-transient error); recoverable by trying again later
    #[error("remote fetch failed")]
    FetchFailure(#[source] StoreError),

    /// Store reachable but the result set was empty; informational
    #[error("no data available")]
    NoDataAvailable,

    /// The latest reading failed the plausibility gate
    #[error("invalid sensor reading")]
    InvalidReading(#[source] ReadingError),

    /// The classifier produced an ordinal outside the trained classes;
    /// fatal to this one prediction, never retried
    #[error("classifier returned class {class} outside the quality range")]
    ClassifierContract {
        /// The out-of-range ordinal
        class: u8,
    },

    /// The classifier failed while evaluating a sample
    #[error("classifier failure")]
    Classifier(#[source] ModelError),

    /// No model is loaded; raw data views still work
    #[error("prediction model unavailable")]
    PredictionsUnavailable,
}
