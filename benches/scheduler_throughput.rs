//! Scheduling and sampling throughput benchmarks.
//!
//! Measures the benchmark's own overhead so it stays negligible next to
//! generation time.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use gen_throughput::engine::CharTokenizer;
use gen_throughput::scheduler::{BatchConfig, BatchScheduler};
use gen_throughput::workload::{LengthBounds, RequestSampler, WorkloadSet};

fn sample_workload(count: usize) -> WorkloadSet {
    let bounds = LengthBounds::new(128, 256, 256, 512).unwrap();
    RequestSampler::seeded(0)
        .sample(count, &CharTokenizer::default(), &bounds)
        .unwrap()
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_sampling");
    let tokenizer = CharTokenizer::default();
    let bounds = LengthBounds::new(128, 256, 256, 512).unwrap();

    for count in [100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("requests", count), &count, |b, &count| {
            b.iter(|| {
                RequestSampler::seeded(black_box(0))
                    .sample(count, &tokenizer, &bounds)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_batching(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_batching");
    let workload = sample_workload(1000);
    group.throughput(Throughput::Elements(workload.len() as u64));

    for (name, max_batch_size, token_budget) in
        [("small", 8, 2048), ("default", 24, 8192), ("wide", 128, 65536)]
    {
        let scheduler = BatchScheduler::new(BatchConfig { max_batch_size, token_budget });
        group.bench_function(BenchmarkId::new("config", name), |b| {
            b.iter(|| scheduler.create_batches(black_box(workload.as_slice())).len())
        });
    }

    group.finish();
}

fn bench_streaming_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_batches");
    let workload = sample_workload(1000);
    let scheduler = BatchScheduler::new(BatchConfig::default());

    group.throughput(Throughput::Elements(workload.len() as u64));
    group.bench_function("count_only", |b| {
        b.iter(|| scheduler.batches(black_box(&workload)).count())
    });

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_batching, bench_streaming_batches);
criterion_main!(benches);
