//! The User-Facing Dashboard Service
//!
//! ## Overview
//!
//! One [`DashboardService`] per process: it owns the prediction
//! pipeline, the security cache, and the refresh sequencing, and it is
//! the only type a presentation layer needs to hold. All methods take
//! `&self`; the service is shared behind an `Arc` between the UI and
//! the background poller.
//!
//! ## Refresh Sequencing
//!
//! Explicit refreshes are tagged with a monotonic sequence number.
//! A refresh that completes after a newer one was issued still returns
//! its result to its own caller, but does not overwrite the last-result
//! snapshot - late completions cannot make the UI flick backwards.
//! In-flight refreshes are never cancelled.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use aquawatch_core::cache::{FetchCache, QueryKey};
use aquawatch_core::time::TimeSource;
use aquawatch_core::SecurityEvent;
use aquawatch_ml::{Classifier, QualityForest};
use aquawatch_store::TableStore;

use crate::pipeline::{PipelineResult, PredictionPipeline, TrendPoint};
use crate::poller::{PollerHandle, SecurityPoller};
use crate::{DashboardConfig, DashboardError, DashboardResult};

/// The dashboard's action surface
pub struct DashboardService<S> {
    pipeline: PredictionPipeline<S>,
    store: Arc<S>,
    security_cache: Arc<FetchCache<Vec<SecurityEvent>>>,
    clock: Arc<dyn TimeSource>,
    config: DashboardConfig,
    refresh_seq: AtomicU64,
    last_refresh: Mutex<Option<(u64, PipelineResult)>>,
}

impl<S: TableStore + 'static> DashboardService<S> {
    /// Build a service over a store and an already-loaded classifier
    pub fn new(
        store: Arc<S>,
        classifier: Option<Arc<dyn Classifier>>,
        clock: Arc<dyn TimeSource>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            pipeline: PredictionPipeline::new(
                Arc::clone(&store),
                classifier,
                Arc::clone(&clock),
                &config,
            ),
            store,
            security_cache: Arc::new(FetchCache::new()),
            clock,
            config,
            refresh_seq: AtomicU64::new(0),
            last_refresh: Mutex::new(None),
        }
    }

    /// Build a service, loading the classifier artifact from disk
    ///
    /// A load failure disables predictions but nothing else: the error
    /// is logged once and raw data views keep working.
    pub fn with_model_file<P: AsRef<Path>>(
        store: Arc<S>,
        model_path: P,
        clock: Arc<dyn TimeSource>,
        config: DashboardConfig,
    ) -> Self {
        let classifier: Option<Arc<dyn Classifier>> =
            match QualityForest::from_file(model_path.as_ref()) {
                Ok(forest) => Some(Arc::new(forest)),
                Err(err) => {
                    log::error!(
                        "quality model failed to load, predictions disabled: {err}"
                    );
                    None
                }
            };
        Self::new(store, classifier, clock, config)
    }

    /// Whether prediction-dependent actions can succeed
    pub fn predictions_enabled(&self) -> bool {
        self.pipeline.predictions_enabled()
    }

    /// Current reading and quality label, served from cache when fresh
    pub async fn latest_prediction(&self) -> DashboardResult<PipelineResult> {
        self.pipeline.latest_prediction().await
    }

    /// Invalidate the latest-reading entry and re-run the pipeline
    pub async fn refresh_now(&self) -> DashboardResult<PipelineResult> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.pipeline.invalidate_latest();

        let result = self.pipeline.latest_prediction().await?;

        if self.refresh_seq.load(Ordering::SeqCst) == seq {
            let mut last = self.last_refresh.lock().unwrap_or_else(|e| e.into_inner());
            *last = Some((seq, result));
        } else {
            log::debug!("refresh {seq} superseded, snapshot kept");
        }
        Ok(result)
    }

    /// Result of the newest completed, non-superseded refresh
    pub fn last_refresh(&self) -> Option<PipelineResult> {
        let last = self.last_refresh.lock().unwrap_or_else(|e| e.into_inner());
        last.map(|(_, result)| result)
    }

    /// Historical trend series, oldest first
    ///
    /// `limit: None` uses the configured default window.
    pub async fn historical_series(
        &self,
        limit: Option<usize>,
        include_predictions: bool,
    ) -> DashboardResult<Vec<TrendPoint>> {
        let limit = limit.unwrap_or(self.config.default_history_limit);
        self.pipeline
            .historical_series(limit, include_predictions)
            .await
    }

    /// Latest security event, `None` when the table is empty
    pub async fn security_status(&self) -> DashboardResult<Option<SecurityEvent>> {
        let now = self.clock.now();
        if let Some(events) = self.security_cache.get(&QueryKey::LatestSecurity, now) {
            return Ok(events.first().copied());
        }

        let events = self.fetch_security(1).await?;
        let fetched_at = self.clock.now();
        self.security_cache.put(
            QueryKey::LatestSecurity,
            events.clone(),
            fetched_at,
            self.config.latest_ttl,
        );
        Ok(events.first().copied())
    }

    /// Security event history, newest first
    pub async fn security_history(&self, limit: usize) -> DashboardResult<Vec<SecurityEvent>> {
        let key = QueryKey::SecuritySeries { limit };
        let now = self.clock.now();
        if let Some(events) = self.security_cache.get(&key, now) {
            return Ok(events);
        }

        let mut events = self.fetch_security(limit).await?;
        // The alert timeline renders newest first; make it so even if
        // the store response order ever changes
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let fetched_at = self.clock.now();
        self.security_cache
            .put(key, events.clone(), fetched_at, self.config.series_ttl);
        Ok(events)
    }

    /// Start the background security poller for this service
    pub fn spawn_security_poller(&self) -> PollerHandle {
        SecurityPoller::new(
            Arc::clone(&self.store),
            Arc::clone(&self.security_cache),
            self.config.retry.clone(),
            Arc::clone(&self.clock),
            self.config.poll_interval,
            self.config.latest_ttl,
        )
        .spawn()
    }

    async fn fetch_security(&self, limit: usize) -> DashboardResult<Vec<SecurityEvent>> {
        let store = Arc::clone(&self.store);
        self.config
            .retry
            .execute(move || {
                let store = Arc::clone(&store);
                async move { store.latest_security_events(limit).await }
            })
            .await
            .map_err(DashboardError::FetchFailure)
    }
}
