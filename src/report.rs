//! Throughput accounting.
//!
//! Token totals always come from the original workload, never from how
//! batches grouped it.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BenchError;
use crate::workload::WorkloadSet;

/// Measured outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunResult {
    pub elapsed_seconds: f64,
    pub total_requests: usize,
    pub total_tokens: usize,
}

impl RunResult {
    pub fn new(workload: &WorkloadSet, elapsed: Duration) -> Self {
        Self::from_seconds(workload, elapsed.as_secs_f64())
    }

    pub fn from_seconds(workload: &WorkloadSet, elapsed_seconds: f64) -> Self {
        Self {
            elapsed_seconds,
            total_requests: workload.len(),
            total_tokens: workload.total_tokens(),
        }
    }
}

/// Request and token rates for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputReport {
    pub backend: String,
    pub requests_per_second: f64,
    pub tokens_per_second: f64,
    #[serde(flatten)]
    pub run: RunResult,
    pub finished_at: DateTime<Utc>,
}

impl ThroughputReport {
    /// Compute rates for `run`.
    ///
    /// An empty workload reports zero for both rates. A non-empty workload
    /// with a non-positive or non-finite elapsed time is rejected rather
    /// than reported as infinite.
    pub fn compute(backend: &str, run: RunResult) -> Result<Self, BenchError> {
        let (requests_per_second, tokens_per_second) = if run.total_requests == 0 {
            (0.0, 0.0)
        } else {
            if !(run.elapsed_seconds.is_finite() && run.elapsed_seconds > 0.0) {
                return Err(BenchError::DivideByZero {
                    requests: run.total_requests,
                    elapsed_seconds: run.elapsed_seconds,
                });
            }
            (
                run.total_requests as f64 / run.elapsed_seconds,
                run.total_tokens as f64 / run.elapsed_seconds,
            )
        };

        Ok(Self {
            backend: backend.to_string(),
            requests_per_second,
            tokens_per_second,
            run,
            finished_at: Utc::now(),
        })
    }

    /// Single-line JSON rendering of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Throughput: {:.2} requests/s, {:.2} tokens/s",
            self.requests_per_second, self.tokens_per_second
        )
    }
}
