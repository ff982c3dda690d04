//! Batch pipeline: turns raw order records into orders and an invoice summary.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use oi_core::{DiscountTable, Order};

pub mod report;
pub mod source;
pub mod validate;

pub use report::{BatchReporter, CollectingReporter, SkippedRecord, TracingReporter};
pub use source::{load_discounts, load_orders, SourceError};
pub use validate::{build_order, validate, RawRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Concurrent,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub mode: ExecutionMode,
    /// Pool size for concurrent runs; `None` means available parallelism.
    pub workers: Option<usize>,
}

impl PipelineConfig {
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(oi_runtime::default_workers)
            .max(1)
    }
}

pub struct BatchPipeline {
    cfg: PipelineConfig,
    discounts: Arc<DiscountTable>,
    reporter: Arc<dyn BatchReporter>,
}

impl BatchPipeline {
    pub fn new(cfg: PipelineConfig, discounts: DiscountTable, reporter: Arc<dyn BatchReporter>) -> Self {
        Self {
            cfg,
            discounts: Arc::new(discounts),
            reporter,
        }
    }

    /// Process with whichever strategy the config selects.
    pub fn run(&self, records: Vec<RawRecord>) -> Result<Vec<Order>> {
        match self.cfg.mode {
            ExecutionMode::Sequential => Ok(self.process(&records)),
            ExecutionMode::Concurrent => self.process_concurrent(records),
        }
    }

    /// Build orders one record at a time. Invalid records are reported and
    /// dropped; the rest keep their input order.
    pub fn process(&self, records: &[RawRecord]) -> Vec<Order> {
        let orders: Vec<Order> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| process_record(self.reporter.as_ref(), index, record))
            .collect();
        info!(records = records.len(), orders = orders.len(), "batch processed");
        orders
    }

    /// Same result as [`process`](Self::process), with records spread across
    /// the worker pool.
    ///
    /// Worker `w` of `n` takes every record whose index is `w` mod `n` and
    /// returns `(index, outcome)` pairs; the fan-in re-sequences by index and
    /// drops the skipped records.
    pub fn process_concurrent(&self, records: Vec<RawRecord>) -> Result<Vec<Order>> {
        let total = records.len();
        let records = Arc::new(records);
        let reporter = Arc::clone(&self.reporter);

        let partials = oi_runtime::run_workers(self.cfg.worker_count(), move |worker, peers| {
            records
                .iter()
                .enumerate()
                .skip(worker)
                .step_by(peers)
                .map(|(index, record)| (index, process_record(reporter.as_ref(), index, record)))
                .collect::<Vec<_>>()
        })?;

        let orders = fan_in(partials);
        info!(records = total, orders = orders.len(), "batch processed concurrently");
        Ok(orders)
    }

    /// One summary line per order, newline-terminated, in iteration order.
    /// Accepts plain orders or `Option` placeholders; `None`s are skipped.
    /// An order whose discounted total cannot be represented is reported and
    /// left out; the other lines are still rendered.
    pub fn render_summary<'a, I, T>(&self, orders: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<&'a Order>>,
    {
        let mut out = String::new();
        let mut lines = 0;
        for order in orders.into_iter().filter_map(|o| -> Option<&'a Order> { o.into() }) {
            match order.summary(&self.discounts) {
                Ok(line) => {
                    out.push_str(&line);
                    out.push('\n');
                    lines += 1;
                }
                Err(reason) => self.reporter.summary_skipped(order, &reason),
            }
        }
        self.reporter.summary_rendered(lines);
        out
    }
}

fn process_record(reporter: &dyn BatchReporter, index: usize, record: &RawRecord) -> Option<Order> {
    match build_order(record) {
        Ok(order) => {
            reporter.record_built(index, &order);
            Some(order)
        }
        Err(reason) => {
            reporter.record_skipped(index, &reason);
            None
        }
    }
}

fn fan_in(partials: Vec<Vec<(usize, Option<Order>)>>) -> Vec<Order> {
    let mut indexed: Vec<(usize, Option<Order>)> = partials.into_iter().flatten().collect();
    indexed.sort_unstable_by_key(|(index, _)| *index);
    indexed.into_iter().filter_map(|(_, order)| order).collect()
}
