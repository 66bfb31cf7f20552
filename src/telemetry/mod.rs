//! Telemetry for benchmark runs.
//!
//! Structured logging through `tracing` and counters through the `metrics`
//! facade. Nothing is exported unless the embedding application installs a
//! recorder.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{RunSpan, SpanExt};

/// Record the measured duration of a run.
pub fn record_run_elapsed(backend: &'static str, elapsed_seconds: f64) {
    metrics::histogram!("bench_run_elapsed_seconds", "backend" => backend).record(elapsed_seconds);
}
