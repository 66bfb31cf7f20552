//! Delegated-engine strategy.
//!
//! The whole workload is queued first; only the engine's drain call is
//! timed.

use std::time::{Duration, Instant};

use super::BackendRunner;
use crate::engine::{GenerationEngine, SamplingParams};
use crate::error::BenchError;
use crate::workload::WorkloadSet;

/// Hands every request to an internally batching engine.
pub struct DelegatedRunner<E> {
    engine: E,
    n: usize,
    use_beam_search: bool,
}

impl<E: GenerationEngine> DelegatedRunner<E> {
    pub fn new(engine: E, n: usize, use_beam_search: bool) -> Self {
        Self { engine, n, use_beam_search }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

impl<E: GenerationEngine> BackendRunner for DelegatedRunner<E> {
    fn name(&self) -> &'static str {
        "delegated"
    }

    fn run(&mut self, workload: &WorkloadSet) -> Result<Duration, BenchError> {
        for request in workload {
            let params = SamplingParams::for_throughput(
                self.n,
                self.use_beam_search,
                request.output_len,
            );
            self.engine.enqueue(&request.prompt, params)?;
        }
        tracing::debug!(queued = workload.len(), "workload queued, starting engine");

        let start = Instant::now();
        let finished = self.engine.run_to_completion()?;
        let elapsed = start.elapsed();

        tracing::debug!(finished, elapsed_s = elapsed.as_secs_f64(), "engine run complete");
        Ok(elapsed)
    }
}
