//! Shared fixtures for dashboard integration tests
//!
//! Provides:
//! - A scripted in-memory table store with failure injection and call
//!   counting
//! - A closure-backed classifier for shaping per-row outcomes
//! - Reading constructors for the common cases

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use aquawatch_core::{SecurityEvent, SensorReading};
use aquawatch_ml::{Classifier, ModelError, ModelResult, FEATURE_COUNT};
use aquawatch_store::{StoreError, StoreResult, TableStore};

/// In-memory stand-in for the remote table store
///
/// Rows are held newest first, exactly as the real store returns them.
#[derive(Default)]
pub struct MockStore {
    readings: Mutex<Vec<SensorReading>>,
    security: Mutex<Vec<SecurityEvent>>,
    fail_reading_queries: AtomicU32,
    fail_security_queries: AtomicU32,
    reading_calls: AtomicU32,
    security_calls: AtomicU32,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with reading rows, newest first
    pub fn with_readings(rows: Vec<SensorReading>) -> Self {
        let store = Self::new();
        store.set_readings(rows);
        store
    }

    pub fn set_readings(&self, rows: Vec<SensorReading>) {
        *self.readings.lock().unwrap() = rows;
    }

    pub fn set_security(&self, rows: Vec<SecurityEvent>) {
        *self.security.lock().unwrap() = rows;
    }

    /// Make the next `n` reading queries fail transiently
    pub fn fail_next_reading_queries(&self, n: u32) {
        self.fail_reading_queries.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` security queries fail transiently
    pub fn fail_next_security_queries(&self, n: u32) {
        self.fail_security_queries.store(n, Ordering::SeqCst);
    }

    pub fn reading_calls(&self) -> u32 {
        self.reading_calls.load(Ordering::SeqCst)
    }

    pub fn security_calls(&self) -> u32 {
        self.security_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl TableStore for MockStore {
    async fn latest_readings(&self, limit: usize) -> StoreResult<Vec<SensorReading>> {
        self.reading_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.fail_reading_queries) {
            return Err(StoreError::Request("scripted outage".into()));
        }
        Ok(self.readings.lock().unwrap().iter().take(limit).copied().collect())
    }

    async fn latest_security_events(&self, limit: usize) -> StoreResult<Vec<SecurityEvent>> {
        self.security_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.fail_security_queries) {
            return Err(StoreError::Request("scripted outage".into()));
        }
        Ok(self.security.lock().unwrap().iter().take(limit).copied().collect())
    }
}

/// Classifier backed by a closure over the feature vector
pub struct FnClassifier<F>(pub F);

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&[f32; FEATURE_COUNT]) -> ModelResult<u8> + Send + Sync,
{
    fn predict_one(&self, features: &[f32; FEATURE_COUNT]) -> ModelResult<u8> {
        (self.0)(features)
    }
}

/// A classifier that answers the same class for every sample
pub fn fixed_classifier(class: u8) -> FnClassifier<impl Fn(&[f32; 3]) -> ModelResult<u8> + Send + Sync> {
    FnClassifier(move |_: &[f32; 3]| Ok(class))
}

/// The error a scripted classifier fails with
pub fn scripted_model_error() -> ModelError {
    ModelError::CorruptTree {
        tree: 0,
        reason: "scripted failure",
    }
}

pub fn reading(temperature: f32, turbidity: f32, ph: f32, timestamp: u64) -> SensorReading {
    SensorReading::new(temperature, turbidity, ph, timestamp)
}

pub fn event(alert: bool, timestamp: u64) -> SecurityEvent {
    SecurityEvent::new(alert, timestamp)
}
