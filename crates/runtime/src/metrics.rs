use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Batch counters. Clones share the same counters.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    records_seen: AtomicU64,
    orders_built: AtomicU64,
    records_skipped: AtomicU64,
    summary_lines: AtomicU64,
    summaries_skipped: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_records_seen(&self, delta: u64) {
        self.inner.records_seen.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_orders_built(&self, delta: u64) {
        self.inner.orders_built.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_records_skipped(&self, delta: u64) {
        self.inner.records_skipped.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_summary_lines(&self, delta: u64) {
        self.inner.summary_lines.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_summaries_skipped(&self, delta: u64) {
        self.inner.summaries_skipped.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_seen: self.inner.records_seen.load(Ordering::Relaxed),
            orders_built: self.inner.orders_built.load(Ordering::Relaxed),
            records_skipped: self.inner.records_skipped.load(Ordering::Relaxed),
            summary_lines: self.inner.summary_lines.load(Ordering::Relaxed),
            summaries_skipped: self.inner.summaries_skipped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_seen: u64,
    pub orders_built: u64,
    pub records_skipped: u64,
    pub summary_lines: u64,
    pub summaries_skipped: u64,
}

impl MetricsSnapshot {
    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct BatchTimer {
    start: Instant,
}

impl BatchTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
