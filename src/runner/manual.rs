//! Manual-batch strategy.
//!
//! Batches come from the greedy scheduler. Tokenization, padding,
//! generation and decoding for every batch all sit inside one timed region.

use std::time::{Duration, Instant};

use super::progress::ProgressObserver;
use super::BackendRunner;
use crate::engine::{BatchModel, GenerateParams, PaddedBatch, Tokenizer};
use crate::error::BenchError;
use crate::scheduler::{Batch, BatchScheduler};
use crate::workload::WorkloadSet;

/// Runs pre-built batches through a non-batching model call.
pub struct ManualRunner<M, T, P> {
    model: M,
    tokenizer: T,
    scheduler: BatchScheduler,
    n: usize,
    use_beam_search: bool,
    progress: P,
}

impl<M, T, P> ManualRunner<M, T, P>
where
    M: BatchModel,
    T: Tokenizer,
    P: ProgressObserver,
{
    pub fn new(
        model: M,
        tokenizer: T,
        scheduler: BatchScheduler,
        n: usize,
        use_beam_search: bool,
        progress: P,
    ) -> Self {
        Self {
            model,
            tokenizer,
            scheduler,
            n,
            use_beam_search,
            progress,
        }
    }

    fn run_batch(&self, batch: &Batch<'_>) -> Result<(), BenchError> {
        let rows = batch
            .requests()
            .iter()
            .map(|request| self.tokenizer.encode(&request.prompt))
            .collect::<Result<Vec<_>, _>>()?;
        let input = PaddedBatch::left_padded(rows, self.tokenizer.pad_token());

        let params = GenerateParams::sampling(batch.max_output_len(), self.n);
        let outputs = self.model.generate(&input, &params)?;

        // Decoding is part of the measured pipeline.
        self.tokenizer.batch_decode(&outputs)?;
        Ok(())
    }
}

impl<M, T, P> BackendRunner for ManualRunner<M, T, P>
where
    M: BatchModel,
    T: Tokenizer,
    P: ProgressObserver,
{
    fn name(&self) -> &'static str {
        "manual"
    }

    fn run(&mut self, workload: &WorkloadSet) -> Result<Duration, BenchError> {
        if self.use_beam_search {
            return Err(BenchError::UnsupportedCombination(
                "beam search is not supported by the manual backend".into(),
            ));
        }

        let total = workload.len();
        let mut completed = 0;

        let start = Instant::now();
        for batch in self.scheduler.batches(workload) {
            self.run_batch(&batch)?;
            completed += batch.len();
            self.progress.on_batch_complete(batch.len(), completed, total);
        }
        Ok(start.elapsed())
    }
}
