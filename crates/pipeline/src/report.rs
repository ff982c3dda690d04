use std::sync::Mutex;

use tracing::{debug, warn};

use oi_core::{Order, OrderId, ValidationError};
use oi_runtime::metrics::MetricsRegistry;

/// Per-record outcome hooks, injected into the pipeline.
///
/// Shared across workers, so implementations must be `Send + Sync`. `index`
/// is the record's position in the input batch.
pub trait BatchReporter: Send + Sync {
    fn record_built(&self, index: usize, order: &Order);

    fn record_skipped(&self, index: usize, reason: &ValidationError);

    /// A built order whose summary line could not be produced.
    fn summary_skipped(&self, order: &Order, reason: &ValidationError);

    fn summary_rendered(&self, _lines: usize) {}
}

/// Logs through `tracing` and keeps batch counters.
#[derive(Clone, Default)]
pub struct TracingReporter {
    metrics: MetricsRegistry,
}

impl TracingReporter {
    pub fn new(metrics: MetricsRegistry) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

impl BatchReporter for TracingReporter {
    fn record_built(&self, index: usize, order: &Order) {
        self.metrics.inc_records_seen(1);
        self.metrics.inc_orders_built(1);
        debug!(index, order_id = order.order_id(), "order accepted");
    }

    fn record_skipped(&self, index: usize, reason: &ValidationError) {
        self.metrics.inc_records_seen(1);
        self.metrics.inc_records_skipped(1);
        warn!(index, %reason, "skipping invalid order");
    }

    fn summary_skipped(&self, order: &Order, reason: &ValidationError) {
        self.metrics.inc_summaries_skipped(1);
        warn!(order_id = order.order_id(), %reason, "omitting order from summary");
    }

    fn summary_rendered(&self, lines: usize) {
        self.metrics.inc_summary_lines(lines as u64);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub reason: ValidationError,
}

/// Keeps the skip reasons in memory, for callers that want them after the run.
#[derive(Default)]
pub struct CollectingReporter {
    skipped: Mutex<Vec<SkippedRecord>>,
    unrendered: Mutex<Vec<(OrderId, ValidationError)>>,
}

impl CollectingReporter {
    /// Skipped records sorted by input index.
    pub fn skipped(&self) -> Vec<SkippedRecord> {
        let mut skipped = match self.skipped.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        skipped.sort_by_key(|s| s.index);
        skipped
    }

    /// Orders left out of the summary, in render order.
    pub fn unrendered(&self) -> Vec<(OrderId, ValidationError)> {
        match self.unrendered.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl BatchReporter for CollectingReporter {
    fn record_built(&self, _index: usize, _order: &Order) {}

    fn record_skipped(&self, index: usize, reason: &ValidationError) {
        let entry = SkippedRecord { index, reason: reason.clone() };
        match self.skipped.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }

    fn summary_skipped(&self, order: &Order, reason: &ValidationError) {
        let entry = (order.order_id(), reason.clone());
        match self.unrendered.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oi_core::PricedItem;
    use rust_decimal_macros::dec;

    fn order() -> Order {
        let item = PricedItem::new("Pen", dec!(1), 1).unwrap();
        Order::new(1, "Ann", vec![item], None, None).unwrap()
    }

    #[test]
    fn tracing_reporter_counts_outcomes() {
        let reporter = TracingReporter::default();
        reporter.record_built(0, &order());
        reporter.record_skipped(1, &ValidationError::MissingField { field: "customer" });
        reporter.record_built(2, &order());
        reporter.summary_skipped(&order(), &ValidationError::AmountOverflow { what: "total".into() });
        reporter.summary_rendered(2);

        let snapshot = reporter.metrics().snapshot();
        assert_eq!(snapshot.records_seen, 3);
        assert_eq!(snapshot.orders_built, 2);
        assert_eq!(snapshot.records_skipped, 1);
        assert_eq!(snapshot.summary_lines, 2);
        assert_eq!(snapshot.summaries_skipped, 1);
    }

    #[test]
    fn collecting_reporter_sorts_by_index() {
        let reporter = CollectingReporter::default();
        reporter.record_skipped(4, &ValidationError::EmptyOrder { order_id: 4 });
        reporter.record_skipped(1, &ValidationError::MissingField { field: "items" });
        let indices: Vec<usize> = reporter.skipped().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 4]);
    }
}
