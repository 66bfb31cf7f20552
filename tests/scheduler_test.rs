//! TDD-Light tests for token-budget batch scheduling.

use gen_throughput::scheduler::{Batch, BatchConfig, BatchScheduler};
use gen_throughput::workload::Request;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn request(prompt_len: usize, output_len: usize) -> Request {
    Request::new("!".repeat(prompt_len), prompt_len, output_len)
}

fn scheduler(max_batch_size: usize, token_budget: usize) -> BatchScheduler {
    BatchScheduler::new(BatchConfig { max_batch_size, token_budget })
}

/// Map each batch to the indices of its members in `requests`.
fn batch_indices(requests: &[Request], batches: &[Batch<'_>]) -> Vec<Vec<usize>> {
    batches
        .iter()
        .map(|batch| {
            batch
                .requests()
                .iter()
                .map(|member| {
                    requests
                        .iter()
                        .position(|r| std::ptr::eq(r, *member))
                        .expect("batch member must borrow from the workload")
                })
                .collect()
        })
        .collect()
}

#[test]
fn size_limit_flushes_full_batch() {
    let requests = vec![request(3, 4), request(2, 5), request(4, 4), request(1, 1)];
    let batches = scheduler(3, 10).create_batches(&requests);

    assert_eq!(batch_indices(&requests, &batches), vec![vec![0, 1, 2], vec![3]]);
    assert_eq!(batches[0].max_prompt_len(), 4);
    assert_eq!(batches[0].max_output_len(), 5);
    assert_eq!(batches[1].max_prompt_len(), 1);
    assert_eq!(batches[1].max_output_len(), 1);
}

#[test]
fn token_budget_flushes_batch() {
    let requests = vec![request(2, 2), request(3, 3), request(5, 5)];
    let batches = scheduler(10, 8).create_batches(&requests);

    assert_eq!(batch_indices(&requests, &batches), vec![vec![0, 1], vec![2]]);
    assert_eq!(batches[0].padded_tokens(), 6);
}

#[test]
fn budget_uses_combined_maxima_not_per_request_sums() {
    // Each request fits alone, but long prompt + long output does not.
    let requests = vec![request(8, 1), request(1, 8)];
    let batches = scheduler(10, 10).create_batches(&requests);

    assert_eq!(batch_indices(&requests, &batches), vec![vec![0], vec![1]]);
}

#[test]
fn oversize_request_is_scheduled_alone() {
    let requests = vec![request(2, 2), request(50, 50), request(2, 2)];
    let batches = scheduler(10, 10).create_batches(&requests);

    assert_eq!(batch_indices(&requests, &batches), vec![vec![0], vec![1], vec![2]]);
    assert!(batches[1].is_singleton_overflow(10));
    assert!(!batches[0].is_singleton_overflow(10));
}

#[test]
fn oversize_first_request_is_not_dropped() {
    let requests = vec![request(100, 100)];
    let batches = scheduler(4, 10).create_batches(&requests);

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
}

#[test]
fn final_partial_batch_is_emitted() {
    let requests: Vec<Request> = (0..5).map(|_| request(1, 1)).collect();
    let batches = scheduler(4, 100).create_batches(&requests);

    assert_eq!(batch_indices(&requests, &batches), vec![vec![0, 1, 2, 3], vec![4]]);
}

#[test]
fn empty_workload_yields_no_batches() {
    let requests: Vec<Request> = Vec::new();
    assert!(scheduler(4, 100).create_batches(&requests).is_empty());
}

#[test]
fn batch_size_one_keeps_every_request_alone() {
    let requests: Vec<Request> = (1..=4).map(|i| request(i, i)).collect();
    let batches = scheduler(1, 1000).create_batches(&requests);
    assert!(batches.iter().all(|b| b.len() == 1));
    assert_eq!(batches.len(), 4);
}

#[test]
fn random_workloads_keep_coverage_and_budget() {
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..200 {
        let len = rng.gen_range(0..60);
        let requests: Vec<Request> = (0..len)
            .map(|_| request(rng.gen_range(0..40), rng.gen_range(1..40)))
            .collect();
        let max_batch_size = rng.gen_range(1..8);
        let token_budget = rng.gen_range(1..80);
        let batches = scheduler(max_batch_size, token_budget).create_batches(&requests);

        let flattened: Vec<usize> = batch_indices(&requests, &batches).concat();
        assert_eq!(flattened, (0..requests.len()).collect::<Vec<_>>());

        for batch in &batches {
            assert!(!batch.is_empty());
            assert!(batch.len() <= max_batch_size);
            if batch.len() > 1 {
                assert!(batch.padded_tokens() <= token_budget);
            }
            let max_prompt = batch.requests().iter().map(|r| r.prompt_len).max().unwrap();
            let max_output = batch.requests().iter().map(|r| r.output_len).max().unwrap();
            assert_eq!(batch.max_prompt_len(), max_prompt);
            assert_eq!(batch.max_output_len(), max_output);
        }
    }
}

#[test]
fn streaming_and_collected_batches_match() {
    let requests = vec![request(3, 4), request(2, 5), request(4, 4), request(1, 1)];
    let scheduler = scheduler(2, 9);

    let streamed: Vec<Batch<'_>> = scheduler.batches(requests.iter()).collect();
    assert_eq!(streamed, scheduler.create_batches(&requests));
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    (value, logs.contents())
}

#[test]
fn oversize_singleton_logs_warning() {
    let requests = vec![request(2, 2), request(50, 50), request(2, 2)];
    let scheduler = scheduler(10, 10);

    let (batches, logs) = capture_logs(|| scheduler.create_batches(&requests));

    assert_eq!(batches.len(), 3);
    assert_eq!(logs.matches("exceeds token budget").count(), 1);
    assert!(logs.contains("WARN"));
    assert!(logs.contains("padded_tokens=100"));
}

#[test]
fn batches_within_budget_log_nothing() {
    let requests = vec![request(2, 2), request(3, 3), request(5, 5)];
    let scheduler = scheduler(10, 8);

    let (_, logs) = capture_logs(|| scheduler.create_batches(&requests));

    assert!(logs.is_empty());
}
