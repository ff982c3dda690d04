//! Runtime bootstrap: tracing setup and the fixed-size worker pool.

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

pub mod metrics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the process-wide subscriber on stderr. `RUST_LOG` overrides the
/// default `info` filter. Later calls are no-ops.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Worker count used when none is configured.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Run `f` once on each of `workers` threads and gather every worker's return
/// value, in worker-index order.
///
/// `f` receives `(index, peers)`; partitioning the input between workers is
/// the caller's job.
pub fn run_workers<T, F>(workers: usize, f: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(usize, usize) -> T + Send + Sync + 'static,
{
    let workers = workers.max(1);
    info!(%workers, "starting worker pool");
    let guards = timely::execute(timely::Config::process(workers), move |worker| {
        f(worker.index(), worker.peers())
    })
    .map_err(|e| anyhow!("failed to start worker pool: {e}"))?;

    guards
        .join()
        .into_iter()
        .enumerate()
        .map(|(index, res)| res.map_err(|e| anyhow!("worker {index} failed: {e}")))
        .collect()
}
