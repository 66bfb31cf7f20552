//! Progress reporting for the manual-batch strategy.
//!
//! Observers see one update per completed batch. They run inside the timed
//! region, so implementations should stay cheap.

/// Receives progress updates as batches complete.
pub trait ProgressObserver {
    /// `batch_len` requests just finished; `completed` of `total` are done.
    fn on_batch_complete(&mut self, batch_len: usize, completed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize, usize),
{
    fn on_batch_complete(&mut self, batch_len: usize, completed: usize, total: usize) {
        self(batch_len, completed, total)
    }
}

/// Logs each completed batch through `tracing`.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_batch_complete(&mut self, batch_len: usize, completed: usize, total: usize) {
        tracing::info!(batch_len, completed, total, "batch complete");
    }
}

/// Discards progress updates.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_batch_complete(&mut self, _batch_len: usize, _completed: usize, _total: usize) {}
}
