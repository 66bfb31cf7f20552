//! Backend execution strategies.
//!
//! Both strategies expose the same `run(workload) -> elapsed` capability so
//! the harness and reporter never branch on the backend.

mod delegated;
mod manual;
mod progress;

use std::time::Duration;

pub use delegated::DelegatedRunner;
pub use manual::ManualRunner;
pub use progress::{LogProgress, NoProgress, ProgressObserver};

use crate::error::BenchError;
use crate::workload::WorkloadSet;

/// A timed execution strategy.
pub trait BackendRunner {
    /// Short strategy name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Process the whole workload, returning wall-clock time of the
    /// strategy's timed region.
    ///
    /// Any collaborator failure aborts the run and discards the timing.
    fn run(&mut self, workload: &WorkloadSet) -> Result<Duration, BenchError>;
}

impl<R: BackendRunner + ?Sized> BackendRunner for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn run(&mut self, workload: &WorkloadSet) -> Result<Duration, BenchError> {
        (**self).run(workload)
    }
}
