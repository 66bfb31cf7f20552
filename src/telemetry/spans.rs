//! Span utilities and extension traits for benchmark tracing.

use tracing::{info_span, Span};

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for benchmark run spans.
pub struct RunSpan;

impl RunSpan {
    /// Create a span for one benchmark run.
    ///
    /// Fields included:
    /// - `run_id`: Unique identifier for the run
    /// - `backend`: Strategy under test
    /// - `status`: To be filled in by `SpanExt::record_result`
    /// - `error.message`: To be filled in on error
    /// - `elapsed_s`: To be filled in after the timed region
    pub fn new(run_id: &str, backend: &str) -> Span {
        info_span!(
            "bench_run",
            run_id = %run_id,
            backend = %backend,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
            elapsed_s = tracing::field::Empty,
        )
    }
}
