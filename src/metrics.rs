//! Ambient metrics front door (SPEC_FULL.md §10.6). Atomic counters, no
//! external metrics backend wired up — mirrors the teacher's
//! `MetricsCollector` shape (plain atomics behind a struct, `snapshot()`
//! returning a serializable summary) without committing this crate to a
//! specific exporter.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Default)]
pub struct MetricsCollector {
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    requests_skipped: AtomicU64,
    search_unavailable_total: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub requests_failed: u64,
    pub requests_skipped: u64,
    pub search_unavailable_total: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.requests_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_unavailable(&self) {
        self.search_unavailable_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            requests_skipped: self.requests_skipped.load(Ordering::Relaxed),
            search_unavailable_total: self.search_unavailable_total.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let metrics = MetricsCollector::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_failure();
        let snap = metrics.snapshot();
        assert_eq!(snap.requests_total, 2);
        assert_eq!(snap.requests_failed, 1);
        assert_eq!(snap.requests_skipped, 0);
    }
}
