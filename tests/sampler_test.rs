//! TDD-Light tests for synthetic workload sampling.

use gen_throughput::engine::{CharTokenizer, Tokenizer};
use gen_throughput::workload::{LengthBounds, RequestSampler};

fn bounds() -> LengthBounds {
    LengthBounds::new(8, 64, 4, 32).unwrap()
}

#[test]
fn same_seed_produces_identical_workloads() {
    let tokenizer = CharTokenizer::default();

    let first = RequestSampler::seeded(42).sample(100, &tokenizer, &bounds()).unwrap();
    let second = RequestSampler::seeded(42).sample(100, &tokenizer, &bounds()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn different_seeds_diverge() {
    let tokenizer = CharTokenizer::default();

    let first = RequestSampler::seeded(1).sample(50, &tokenizer, &bounds()).unwrap();
    let second = RequestSampler::seeded(2).sample(50, &tokenizer, &bounds()).unwrap();

    assert_ne!(first, second);
}

#[test]
fn interleaved_samplers_do_not_share_state() {
    let tokenizer = CharTokenizer::default();
    let reference = RequestSampler::seeded(9).sample(20, &tokenizer, &bounds()).unwrap();

    let mut a = RequestSampler::seeded(9);
    let mut b = RequestSampler::seeded(9);
    let mut interleaved = Vec::new();
    for _ in 0..20 {
        interleaved.extend(a.sample(1, &tokenizer, &bounds()).unwrap().iter().cloned());
        b.sample(3, &tokenizer, &bounds()).unwrap();
    }

    assert_eq!(interleaved.as_slice(), reference.as_slice());
}

#[test]
fn produces_exact_request_count() {
    let tokenizer = CharTokenizer::default();
    let workload = RequestSampler::seeded(0).sample(17, &tokenizer, &bounds()).unwrap();
    assert_eq!(workload.len(), 17);
}

#[test]
fn zero_requests_yields_empty_workload() {
    let tokenizer = CharTokenizer::default();
    let workload = RequestSampler::seeded(0).sample(0, &tokenizer, &bounds()).unwrap();
    assert!(workload.is_empty());
    assert_eq!(workload.total_tokens(), 0);
}

#[test]
fn prompt_len_comes_from_tokenizer() {
    let tokenizer = CharTokenizer::new(false);
    let workload = RequestSampler::seeded(5).sample(30, &tokenizer, &bounds()).unwrap();

    for request in &workload {
        assert_eq!(request.prompt_len, request.prompt.len());
        assert_eq!(request.prompt_len, tokenizer.encode(&request.prompt).unwrap().len());
    }
}

#[test]
fn zero_length_prompts_are_allowed() {
    let tokenizer = CharTokenizer::new(false);
    let bounds = LengthBounds::new(0, 0, 1, 1).unwrap();
    let workload = RequestSampler::seeded(3).sample(4, &tokenizer, &bounds).unwrap();

    assert!(workload.iter().all(|r| r.prompt.is_empty() && r.prompt_len == 0));
}

#[test]
fn caller_supplied_rng_matches_seeded_sampler() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let tokenizer = CharTokenizer::default();

    for seed in [0, 7, 42] {
        let injected = RequestSampler::from_rng(StdRng::seed_from_u64(seed))
            .sample(40, &tokenizer, &bounds())
            .unwrap();
        let seeded = RequestSampler::seeded(seed).sample(40, &tokenizer, &bounds()).unwrap();

        assert_eq!(injected, seeded);
    }
}
