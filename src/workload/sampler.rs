//! Deterministic synthetic request sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Request, WorkloadSet};
use crate::config::ConfigError;
use crate::engine::Tokenizer;
use crate::error::BenchError;

/// Character used to build filler prompts. Throughput only depends on length.
pub const FILLER_CHAR: char = '!';

/// Inclusive length bounds for prompt characters and response tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_prompt_len: usize,
    pub max_prompt_len: usize,
    pub min_response_len: usize,
    pub max_response_len: usize,
}

impl LengthBounds {
    /// Validate raw bounds. Negative values, inverted ranges and a zero
    /// minimum response length are rejected.
    pub fn new(
        min_prompt_len: i64,
        max_prompt_len: i64,
        min_response_len: i64,
        max_response_len: i64,
    ) -> Result<Self, ConfigError> {
        let min_prompt = non_negative("min_prompt_len", min_prompt_len)?;
        let max_prompt = non_negative("max_prompt_len", max_prompt_len)?;
        let min_response = non_negative("min_response_len", min_response_len)?;
        let max_response = non_negative("max_response_len", max_response_len)?;

        if min_prompt > max_prompt {
            return Err(ConfigError::InvertedRange {
                name: "prompt_len",
                min: min_prompt_len,
                max: max_prompt_len,
            });
        }
        if min_response > max_response {
            return Err(ConfigError::InvertedRange {
                name: "response_len",
                min: min_response_len,
                max: max_response_len,
            });
        }
        if min_response == 0 {
            return Err(ConfigError::InvalidValue {
                name: "min_response_len",
                reason: "every request must generate at least one token".into(),
            });
        }

        Ok(Self {
            min_prompt_len: min_prompt,
            max_prompt_len: max_prompt,
            min_response_len: min_response,
            max_response_len: max_response,
        })
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Negative { name, value })
}

/// Produces reproducible workloads from an owned PRNG.
///
/// The generator is seeded once at construction and never reseeded, so two
/// samplers built from the same seed yield identical workloads while
/// independent samplers never share state.
pub struct RequestSampler<R = StdRng> {
    rng: R,
}

impl RequestSampler<StdRng> {
    /// Create a sampler backed by a `StdRng` seeded with `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RequestSampler<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Sample `num_requests` requests.
    ///
    /// Per request the draws happen in a fixed order: prompt character
    /// length first, then output length.
    pub fn sample<T: Tokenizer + ?Sized>(
        &mut self,
        num_requests: usize,
        tokenizer: &T,
        bounds: &LengthBounds,
    ) -> Result<WorkloadSet, BenchError> {
        let mut requests = Vec::with_capacity(num_requests);

        for _ in 0..num_requests {
            let chars = self.rng.gen_range(bounds.min_prompt_len..=bounds.max_prompt_len);
            let prompt = String::from(FILLER_CHAR).repeat(chars);
            let prompt_len = tokenizer.encode(&prompt)?.len();
            let output_len = self
                .rng
                .gen_range(bounds.min_response_len..=bounds.max_response_len);
            requests.push(Request::new(prompt, prompt_len, output_len));
        }

        metrics::counter!("bench_requests_sampled_total").increment(num_requests as u64);
        tracing::debug!(num_requests, "sampled synthetic workload");

        Ok(WorkloadSet::new(requests))
    }
}
