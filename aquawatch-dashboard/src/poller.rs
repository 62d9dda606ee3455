//! Background Security Poller
//!
//! ## Overview
//!
//! Security state changes on its own schedule, not when a user clicks
//! refresh, so a low-frequency background task re-fetches the latest
//! security event and drops it into the security cache. The poller
//! touches *only* that one cache entry; predictions and series are
//! foreground concerns.
//!
//! ## Ordering With Foreground Refreshes
//!
//! The poller and an explicit refresh may race on the same cache key.
//! No lock is held across the fetch - the cache's `put` compares
//! `fetched_at` and ignores the older write, so whichever fetch
//! completed with fresher data wins regardless of completion order.
//!
//! ## Failure Behavior
//!
//! A failed poll is logged and the loop keeps its cadence; the cache
//! simply ages until a poll succeeds or a foreground query refreshes
//! the entry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use aquawatch_core::cache::{FetchCache, QueryKey};
use aquawatch_core::time::TimeSource;
use aquawatch_core::SecurityEvent;
use aquawatch_store::{RetryPolicy, StoreResult, TableStore};

/// Periodically refreshes the latest-security cache entry
pub struct SecurityPoller<S> {
    store: Arc<S>,
    cache: Arc<FetchCache<Vec<SecurityEvent>>>,
    retry: RetryPolicy,
    clock: Arc<dyn TimeSource>,
    interval: Duration,
    ttl: Duration,
}

impl<S: TableStore + 'static> SecurityPoller<S> {
    /// Create a poller writing into `cache`
    pub fn new(
        store: Arc<S>,
        cache: Arc<FetchCache<Vec<SecurityEvent>>>,
        retry: RetryPolicy,
        clock: Arc<dyn TimeSource>,
        interval: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            retry,
            clock,
            interval,
            ttl,
        }
    }

    /// Fetch the latest security event and cache it
    ///
    /// Public so a service can prime the cache outside the timer.
    pub async fn poll_once(&self) -> StoreResult<()> {
        let store = Arc::clone(&self.store);
        let events = self
            .retry
            .execute(move || {
                let store = Arc::clone(&store);
                async move { store.latest_security_events(1).await }
            })
            .await?;

        let fetched_at = self.clock.now();
        if self
            .cache
            .put(QueryKey::LatestSecurity, events, fetched_at, self.ttl)
        {
            log::debug!("security status refreshed at {fetched_at}");
        }
        Ok(())
    }

    /// Start the timer loop on the current runtime
    ///
    /// The first tick fires immediately, priming the cache at startup.
    /// The task runs until the returned handle shuts it down; dropping
    /// the handle also stops the loop at its next wakeup.
    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = self.poll_once().await {
                            log::warn!("security poll failed: {err}");
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            log::debug!("security poller stopped");
        });

        PollerHandle { stop: stop_tx, task }
    }
}

/// Handle to a running poller task
pub struct PollerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poller and wait for the task to finish
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
