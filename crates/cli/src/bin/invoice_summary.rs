use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use oi_pipeline::{
    load_discounts, load_orders, BatchPipeline, ExecutionMode, PipelineConfig, TracingReporter,
};
use oi_runtime::metrics::{BatchTimer, MetricsRegistry};
use oi_runtime::{init_tracing, LogFormat};

/// Validate a batch of orders, price them, and write one invoice line per
/// valid order.
#[derive(Parser, Debug)]
#[command(name = "invoice_summary", version)]
struct Args {
    /// Orders source: a JSON array of order records.
    orders: PathBuf,

    /// Discounts source: a JSON object of code to percentage.
    discounts: PathBuf,

    /// Where to write the invoice summary.
    output: PathBuf,

    /// Process records one by one on the main thread.
    #[arg(long)]
    sequential: bool,

    /// Worker pool size; defaults to available parallelism.
    #[arg(long, value_name = "N", conflicts_with = "sequential")]
    workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,

    /// Print batch counters as a JSON line on stdout when done.
    #[arg(long)]
    metrics: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format.into());
    info!("invoice_summary starting");
    let timer = BatchTimer::start();

    // Both sources load before any record is touched, so a bad source leaves
    // no output behind.
    let discounts = load_discounts(&args.discounts)?;
    let records = load_orders(&args.orders)?;

    let cfg = PipelineConfig {
        mode: if args.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Concurrent
        },
        workers: args.workers,
    };
    let metrics = MetricsRegistry::default();
    let reporter = Arc::new(TracingReporter::new(metrics.clone()));
    let pipeline = BatchPipeline::new(cfg, discounts, reporter);

    let orders = pipeline.run(records)?;
    let summary = pipeline.render_summary(&orders);
    fs::write(&args.output, summary)
        .with_context(|| format!("failed to write invoice summary to {}", args.output.display()))?;
    info!(path = %args.output.display(), orders = orders.len(), "invoice summary saved");

    if args.metrics {
        let snapshot = metrics.snapshot();
        println!("{}", snapshot.to_json_line("invoice_summary", Some(timer.elapsed())));
    }
    Ok(())
}
