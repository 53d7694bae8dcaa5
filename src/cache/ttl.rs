//! Shared TTL cache handle.
//!
//! [`TtlCache`] puts a [`TtlStore`] behind a mutex so it can be shared between
//! request handlers, and owns the optional background sweep task.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheConfig, CacheMetrics, TtlStore, DEFAULT_CAPACITY};
use crate::tasks::spawn_sweep_task;

/// A bounded, expiring key-value cache safe to share across tasks.
///
/// Every operation is synchronous and holds the lock only for its own body.
pub struct TtlCache<T> {
    name: String,
    store: Mutex<TtlStore<T>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<T> TtlCache<T>
where
    T: Clone + Serialize + Send + 'static,
{
    pub fn new(max_size: usize) -> Self {
        Self::named("cache", max_size)
    }

    /// Creates a cache whose name is attached to its log events.
    pub fn named(name: impl Into<String>, max_size: usize) -> Self {
        Self {
            name: name.into(),
            store: Mutex::new(TtlStore::new(max_size)),
            sweeper: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_size(&self) -> usize {
        self.store.lock().max_size()
    }

    pub fn set(&self, key: impl Into<String>, data: T, config: &CacheConfig) {
        self.store.lock().set(key.into(), data, config);
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.store.lock().get(key)
    }

    /// Lookup whose hit is counted only if `f` accepts the value.
    pub fn get_map<U, F>(&self, key: &str, f: F) -> Option<U>
    where
        F: FnOnce(&T) -> Option<U>,
    {
        self.store.lock().get_map(key, f)
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.lock().has(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    pub fn delete_by_tag(&self, tag: &str) -> usize {
        self.store.lock().delete_by_tag(tag)
    }

    pub fn delete_by_pattern(&self, pattern: &Regex) -> usize {
        self.store.lock().delete_by_pattern(pattern)
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Keys with a positive remaining lifetime of at most `threshold`.
    ///
    /// Refresh-ahead consumers use this to decide what to recompute.
    pub fn expiring_keys(&self, threshold: Duration) -> Vec<String> {
        self.store.lock().expiring_keys(threshold)
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.store.lock().metrics()
    }

    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    // == Sweep Lifecycle ==
    /// Starts the periodic expiration sweep on the current tokio runtime.
    ///
    /// The task only holds a weak reference, so it ends on its own once the
    /// cache is dropped. Returns false when a sweep is already running, the
    /// interval is zero, or no runtime is available.
    pub fn start_sweep(self: &Arc<Self>, interval: Duration) -> bool {
        if interval.is_zero() {
            warn!(cache = %self.name, "Refusing to start sweep with a zero interval");
            return false;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            warn!(cache = %self.name, "No tokio runtime, sweep not started");
            return false;
        }

        let mut sweeper = self.sweeper.lock();
        if sweeper.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        *sweeper = Some(spawn_sweep_task(Arc::downgrade(self), interval));
        info!(cache = %self.name, interval_secs = interval.as_secs(), "Sweep started");
        true
    }

    /// Stops the sweep task; true if one was running.
    pub fn stop_sweep(&self) -> bool {
        match self.sweeper.lock().take() {
            Some(handle) => {
                handle.abort();
                info!(cache = %self.name, "Sweep stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the sweep and clears all entries. Used at shutdown and teardown.
    pub fn destroy(&self) {
        self.stop_sweep();
        self.clear();
    }
}

impl<T> Drop for TtlCache<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T> Default for TtlCache<T>
where
    T: Clone + Serialize + Send + 'static,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
