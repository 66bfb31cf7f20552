//! Greedy token-budget batching.
//!
//! Requests are grouped in arrival order in a single pass. A request joins
//! the current batch only if the batch's running maxima stay within the
//! token budget and the batch is not full; otherwise the batch is flushed.

use crate::workload::Request;

/// Configuration for manual batching.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_batch_size: usize,
    /// Upper bound on `max_prompt_len + max_output_len` per batch.
    pub token_budget: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 8,
            token_budget: 2048,
        }
    }
}

/// Borrowed group of requests processed by one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<'a> {
    requests: Vec<&'a Request>,
    max_prompt_len: usize,
    max_output_len: usize,
}

impl<'a> Batch<'a> {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            max_prompt_len: 0,
            max_output_len: 0,
        }
    }

    fn singleton(request: &'a Request) -> Self {
        let mut batch = Self::new();
        batch.push(request);
        batch
    }

    fn push(&mut self, request: &'a Request) {
        self.max_prompt_len = self.max_prompt_len.max(request.prompt_len);
        self.max_output_len = self.max_output_len.max(request.output_len);
        self.requests.push(request);
    }

    pub fn requests(&self) -> &[&'a Request] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn max_prompt_len(&self) -> usize {
        self.max_prompt_len
    }

    pub fn max_output_len(&self) -> usize {
        self.max_output_len
    }

    /// Padded footprint of the batch: longest prompt plus longest output.
    pub fn padded_tokens(&self) -> usize {
        self.max_prompt_len + self.max_output_len
    }

    /// A lone request larger than the budget.
    pub fn is_singleton_overflow(&self, token_budget: usize) -> bool {
        self.len() == 1 && self.padded_tokens() > token_budget
    }
}

impl Default for Batch<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups requests into batches under a token budget.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    config: BatchConfig,
}

impl BatchScheduler {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Check if a request can join the batch.
    ///
    /// An empty batch accepts anything, including a request that alone
    /// exceeds the budget.
    pub fn can_add(&self, batch: &Batch<'_>, request: &Request) -> bool {
        if batch.is_empty() {
            return true;
        }
        // `>=` so a zero batch size still yields singleton batches.
        if batch.len() >= self.config.max_batch_size {
            return false;
        }

        let prompt = batch.max_prompt_len.max(request.prompt_len);
        let output = batch.max_output_len.max(request.output_len);
        prompt + output <= self.config.token_budget
    }

    /// Lazily batch `requests`, one batch per `next` call.
    pub fn batches<'a, I>(&self, requests: I) -> Batches<'a, '_, I::IntoIter>
    where
        I: IntoIterator<Item = &'a Request>,
    {
        Batches {
            scheduler: self,
            requests: requests.into_iter(),
            current: Batch::new(),
        }
    }

    /// Create every batch for `requests` up front.
    pub fn create_batches<'a>(&self, requests: &'a [Request]) -> Vec<Batch<'a>> {
        self.batches(requests).collect()
    }

    fn record_flush(&self, batch: &Batch<'_>) {
        metrics::counter!("bench_batches_emitted_total").increment(1);
        metrics::histogram!("bench_batch_size").record(batch.len() as f64);

        if batch.is_singleton_overflow(self.config.token_budget) {
            metrics::counter!("bench_singleton_overflow_total").increment(1);
            tracing::warn!(
                padded_tokens = batch.padded_tokens(),
                token_budget = self.config.token_budget,
                "request exceeds token budget, scheduled alone"
            );
        }
    }
}

/// Streaming batch iterator returned by [`BatchScheduler::batches`].
///
/// Holds at most one partially built batch.
pub struct Batches<'a, 's, I> {
    scheduler: &'s BatchScheduler,
    requests: I,
    current: Batch<'a>,
}

impl<'a, I> Iterator for Batches<'a, '_, I>
where
    I: Iterator<Item = &'a Request>,
{
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for request in self.requests.by_ref() {
            if self.scheduler.can_add(&self.current, request) {
                self.current.push(request);
                continue;
            }
            let full = std::mem::replace(&mut self.current, Batch::singleton(request));
            self.scheduler.record_flush(&full);
            return Some(full);
        }

        if self.current.is_empty() {
            return None;
        }
        let last = std::mem::take(&mut self.current);
        self.scheduler.record_flush(&last);
        Some(last)
    }
}
