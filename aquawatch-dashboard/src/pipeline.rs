//! The Fetch-and-Classify Prediction Pipeline
//!
//! ## Overview
//!
//! One pipeline instance turns "what is the water like right now" into
//! a reading plus a quality label, and "show me the trend" into a
//! time-ordered series. Each step happens in a fixed order:
//!
//! ```text
//! cache ──miss──▶ store (under retry) ──▶ plausibility gate ──▶ classifier
//!   ▲                                          │
//!   └────────── rows cached on fetch ──────────┘
//! ```
//!
//! ## Degradation Rules
//!
//! - An empty result set is *information* ("no data yet"), never a
//!   fabricated reading.
//! - A latest reading that fails the plausibility gate fails the
//!   prediction; in a series the bad row is logged and dropped so one
//!   corrupt row cannot blank the whole chart.
//! - A per-row classification failure in a series leaves that row's
//!   label unknown and keeps going. Only the latest-prediction path
//!   treats classifier trouble as a hard error.

use std::sync::Arc;
use std::time::Duration;

use aquawatch_core::cache::{FetchCache, QueryKey};
use aquawatch_core::time::{TimeSource, Timestamp};
use aquawatch_core::{QualityLabel, ReadingValidators, SensorReading};
use aquawatch_ml::Classifier;
use aquawatch_store::{RetryPolicy, TableStore};

use crate::{DashboardConfig, DashboardError, DashboardResult};

/// A successful fetch-and-classify cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineResult {
    /// The most recent sensor reading
    pub reading: SensorReading,
    /// The classifier's verdict on it
    pub label: QualityLabel,
    /// When the reading was fetched from the store (cache hits keep
    /// the original fetch instant, so staleness reads true)
    pub fetched_at: Timestamp,
}

/// One row of a historical trend series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    /// The sensor reading
    pub reading: SensorReading,
    /// Quality label for the row; `None` when predictions were not
    /// requested or this row's classification failed (rendered as
    /// "Unknown")
    pub label: Option<QualityLabel>,
}

/// Composes cache, retry, store, and classifier into predictions
pub struct PredictionPipeline<S> {
    store: Arc<S>,
    classifier: Option<Arc<dyn Classifier>>,
    validators: ReadingValidators,
    cache: FetchCache<Vec<SensorReading>>,
    retry: RetryPolicy,
    clock: Arc<dyn TimeSource>,
    latest_ttl: Duration,
    series_ttl: Duration,
}

impl<S: TableStore> PredictionPipeline<S> {
    /// Build a pipeline over a store and an optional classifier
    ///
    /// `classifier` is `None` when the model artifact failed to load;
    /// raw series remain available, prediction paths fail typed.
    pub fn new(
        store: Arc<S>,
        classifier: Option<Arc<dyn Classifier>>,
        clock: Arc<dyn TimeSource>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            validators: ReadingValidators::default(),
            cache: FetchCache::new(),
            retry: config.retry.clone(),
            clock,
            latest_ttl: config.latest_ttl,
            series_ttl: config.series_ttl,
        }
    }

    /// Whether a classifier is loaded
    pub fn predictions_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    /// Expire the latest-reading cache entry, forcing the next
    /// prediction to hit the store
    pub fn invalidate_latest(&self) {
        self.cache.invalidate(&QueryKey::LatestReading);
    }

    /// Fetch rows for `key` through cache and retry
    ///
    /// Returns the rows and the instant they were fetched from the
    /// store, which is older than now on a cache hit.
    async fn fetch_rows(
        &self,
        key: QueryKey,
        limit: usize,
        ttl: Duration,
    ) -> DashboardResult<(Vec<SensorReading>, Timestamp)> {
        let now = self.clock.now();
        if let Some(hit) = self.cache.get_entry(&key, now) {
            log::debug!("cache hit for {key:?}");
            return Ok(hit);
        }

        let store = Arc::clone(&self.store);
        let rows = self
            .retry
            .execute(move || {
                let store = Arc::clone(&store);
                async move { store.latest_readings(limit).await }
            })
            .await
            .map_err(DashboardError::FetchFailure)?;

        let fetched_at = self.clock.now();
        self.cache.put(key, rows.clone(), fetched_at, ttl);
        log::info!("fetched {} rows for {key:?}", rows.len());
        Ok((rows, fetched_at))
    }

    /// Map one classifier ordinal to a label, enforcing the contract
    fn label_for(&self, class: u8) -> DashboardResult<QualityLabel> {
        QualityLabel::from_class(class).ok_or_else(|| {
            log::error!("classifier contract violation: class {class} has no label");
            DashboardError::ClassifierContract { class }
        })
    }

    /// Produce the current reading and its quality label
    pub async fn latest_prediction(&self) -> DashboardResult<PipelineResult> {
        let (rows, fetched_at) = self
            .fetch_rows(QueryKey::LatestReading, 1, self.latest_ttl)
            .await?;

        let reading = *rows.first().ok_or(DashboardError::NoDataAvailable)?;

        self.validators.validate(&reading).map_err(|err| {
            log::error!("latest reading rejected: {err}");
            DashboardError::InvalidReading(err)
        })?;

        let classifier = self
            .classifier
            .as_deref()
            .ok_or(DashboardError::PredictionsUnavailable)?;

        let class = classifier.predict_reading(&reading).map_err(|err| {
            log::error!("classification failed: {err}");
            DashboardError::Classifier(err)
        })?;
        let label = self.label_for(class)?;

        Ok(PipelineResult {
            reading,
            label,
            fetched_at,
        })
    }

    /// Produce the historical trend series, oldest first
    ///
    /// Implausible rows are dropped (and logged); with predictions on,
    /// a row whose classification fails keeps its place with an
    /// unknown label. An empty store result is an empty series.
    pub async fn historical_series(
        &self,
        limit: usize,
        include_predictions: bool,
    ) -> DashboardResult<Vec<TrendPoint>> {
        if include_predictions && self.classifier.is_none() {
            return Err(DashboardError::PredictionsUnavailable);
        }

        let (rows, _) = self
            .fetch_rows(QueryKey::ReadingSeries { limit }, limit, self.series_ttl)
            .await?;

        let mut readings: Vec<SensorReading> = rows
            .into_iter()
            .filter(|reading| match self.validators.validate(reading) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("dropping implausible row at {}: {err}", reading.timestamp);
                    false
                }
            })
            .collect();

        // Stable sort: rows sharing a timestamp keep store response order
        readings.sort_by_key(|reading| reading.timestamp);

        let series = readings
            .into_iter()
            .map(|reading| {
                let label = if include_predictions {
                    self.classify_row(&reading)
                } else {
                    None
                };
                TrendPoint { reading, label }
            })
            .collect();

        Ok(series)
    }

    /// Classify one series row, degrading to `None` on any failure
    fn classify_row(&self, reading: &SensorReading) -> Option<QualityLabel> {
        let classifier = self.classifier.as_deref()?;
        match classifier.predict_reading(reading) {
            Ok(class) => match QualityLabel::from_class(class) {
                Some(label) => Some(label),
                None => {
                    log::warn!(
                        "row at {}: classifier contract violation (class {class}), label unknown",
                        reading.timestamp
                    );
                    None
                }
            },
            Err(err) => {
                log::warn!("row at {}: classification failed ({err}), label unknown", reading.timestamp);
                None
            }
        }
    }
}
