//! Fuzz target for greedy batch scheduling.
//!
//! Every request must land in exactly one batch, in order, and multi-request
//! batches must respect both limits.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use gen_throughput::scheduler::{BatchConfig, BatchScheduler};
use gen_throughput::workload::Request;

#[derive(Debug, Arbitrary)]
struct Input {
    max_batch_size: u8,
    token_budget: u16,
    lengths: Vec<(u8, u8)>,
}

fuzz_target!(|input: Input| {
    let max_batch_size = usize::from(input.max_batch_size).max(1);
    let token_budget = usize::from(input.token_budget);
    let requests: Vec<Request> = input
        .lengths
        .iter()
        .map(|&(p, o)| Request::new(String::new(), usize::from(p), usize::from(o)))
        .collect();

    let scheduler = BatchScheduler::new(BatchConfig { max_batch_size, token_budget });
    let batches = scheduler.create_batches(&requests);

    let mut next = 0;
    for batch in &batches {
        assert!(!batch.is_empty());
        assert!(batch.len() <= max_batch_size);
        if batch.len() > 1 {
            assert!(batch.padded_tokens() <= token_budget);
        }
        for member in batch.requests() {
            assert!(std::ptr::eq(*member, &requests[next]));
            next += 1;
        }
    }
    assert_eq!(next, requests.len());
});
