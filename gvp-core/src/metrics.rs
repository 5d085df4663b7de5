//! # Operation Counters
//!
//! In-process counters for service operations. Nothing here exports them;
//! callers read a [`MetricsSnapshot`] when they need numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector
#[derive(Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    // Write metrics
    vectors_upserted: AtomicU64,
    vectors_updated: AtomicU64,
    delete_calls: AtomicU64,

    // Read metrics
    fetches: AtomicU64,
    queries_executed: AtomicU64,
    query_errors: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record upserted vectors
    pub fn record_upsert(&self, count: u64) {
        self.inner.vectors_upserted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_update(&self) {
        self.inner.vectors_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.inner.delete_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self) {
        self.inner.fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query that returned matches
    pub fn record_query(&self) {
        self.inner.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query that failed
    pub fn record_query_error(&self) {
        self.inner.query_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            vectors_upserted: self.inner.vectors_upserted.load(Ordering::Relaxed),
            vectors_updated: self.inner.vectors_updated.load(Ordering::Relaxed),
            delete_calls: self.inner.delete_calls.load(Ordering::Relaxed),
            fetches: self.inner.fetches.load(Ordering::Relaxed),
            queries_executed: self.inner.queries_executed.load(Ordering::Relaxed),
            query_errors: self.inner.query_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
///
/// Every counter except `query_errors` counts successful calls only; a
/// failed call leaves them untouched. `query_errors` counts failed queries,
/// so `queries_executed + query_errors` is the number of queries received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub vectors_upserted: u64,
    pub vectors_updated: u64,
    pub delete_calls: u64,
    pub fetches: u64,
    pub queries_executed: u64,
    pub query_errors: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    /// Start new timer
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and log duration
    pub fn stop(self) {
        let duration = self.elapsed();
        tracing::debug!(
            name = self.name,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
