//! Simulated collaborators backed by dummy weights.
//!
//! They do no numeric work; an optional per-step latency stands in for the
//! forward pass so both strategies can be exercised end to end.

use std::time::Duration;

use super::continuous::{ContinuousBatcher, PendingRequest, RequestId};
use super::error::GenerationError;
use super::model::{BatchModel, GenerationEngine, PaddedBatch};
use super::params::{GenerateParams, SamplingParams};
use super::tokenizer::{CharTokenizer, Tokenizer};

/// Engine scheduling limits.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum concurrently running sequences.
    pub max_num_seqs: usize,
    /// Maximum tokens reserved by running sequences.
    pub max_num_batched_tokens: usize,
    pub tensor_parallel_size: usize,
    pub seed: u64,
    /// Simulated cost of one engine step.
    pub step_latency: Duration,
}

impl EngineConfig {
    /// Size the engine for a workload whose requests never exceed
    /// `max_prompt_len + max_response_len` tokens.
    ///
    /// Returns `None` if the token budget overflows `usize`.
    pub fn for_workload(
        batch_size: usize,
        max_prompt_len: usize,
        max_response_len: usize,
    ) -> Option<Self> {
        let per_sequence = max_prompt_len.checked_add(max_response_len)?.checked_add(1)?;
        Some(Self {
            max_num_seqs: batch_size,
            max_num_batched_tokens: batch_size.checked_mul(per_sequence)?,
            ..Self::default()
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_num_seqs: 24,
            max_num_batched_tokens: 24 * (256 + 512 + 1),
            tensor_parallel_size: 1,
            seed: 0,
            step_latency: Duration::ZERO,
        }
    }
}

/// Continuous-batching engine with dummy weights.
pub struct SimulatedEngine<T: Tokenizer = CharTokenizer> {
    config: EngineConfig,
    tokenizer: T,
    batcher: ContinuousBatcher,
    next_id: u64,
    generated_tokens: usize,
}

impl<T: Tokenizer> SimulatedEngine<T> {
    pub fn new(config: EngineConfig, tokenizer: T) -> Self {
        let batcher = ContinuousBatcher::new(config.max_num_seqs, config.max_num_batched_tokens);
        tracing::info!(
            max_num_seqs = config.max_num_seqs,
            max_num_batched_tokens = config.max_num_batched_tokens,
            tensor_parallel_size = config.tensor_parallel_size,
            seed = config.seed,
            "simulated engine initialized"
        );
        Self {
            config,
            tokenizer,
            batcher,
            next_id: 0,
            generated_tokens: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tokens generated across every completed run, counting fan-out.
    pub fn generated_tokens(&self) -> usize {
        self.generated_tokens
    }

    pub fn pending_count(&self) -> usize {
        self.batcher.pending_count()
    }
}

impl<T: Tokenizer> GenerationEngine for SimulatedEngine<T> {
    fn enqueue(&mut self, prompt: &str, params: SamplingParams) -> Result<(), GenerationError> {
        params.validate()?;
        let prompt_len = self
            .tokenizer
            .encode(prompt)
            .map_err(|e| GenerationError::ModelError(e.to_string()))?
            .len();

        let tokens = prompt_len + params.max_tokens;
        if tokens > self.config.max_num_batched_tokens {
            return Err(GenerationError::RequestTooLarge {
                tokens,
                budget: self.config.max_num_batched_tokens,
            });
        }

        let request_id = RequestId(self.next_id);
        self.next_id += 1;
        self.batcher.enqueue(PendingRequest {
            request_id,
            prompt_len,
            fan_out: params.n,
            max_tokens: params.max_tokens,
        });
        Ok(())
    }

    fn run_to_completion(&mut self) -> Result<usize, GenerationError> {
        let mut finished = 0;
        let mut steps = 0usize;

        while !self.batcher.is_empty() {
            self.batcher.admit_pending();
            self.generated_tokens += self.batcher.step();
            if !self.config.step_latency.is_zero() {
                std::thread::sleep(self.config.step_latency);
            }
            finished += self.batcher.evict_completed().len();
            steps += 1;
        }

        tracing::debug!(finished, steps, "engine drained queue");
        Ok(finished)
    }
}

/// Non-batching model with dummy weights.
#[derive(Debug, Clone, Default)]
pub struct SimulatedModel {
    /// Simulated cost of one decode step over the whole batch.
    pub token_latency: Duration,
}

impl SimulatedModel {
    pub fn new(token_latency: Duration) -> Self {
        Self { token_latency }
    }
}

impl BatchModel for SimulatedModel {
    fn generate(
        &self,
        input: &PaddedBatch,
        params: &GenerateParams,
    ) -> Result<Vec<Vec<u32>>, GenerationError> {
        params.validate()?;
        if input.is_empty() {
            return Err(GenerationError::EmptyBatch);
        }
        input.check_rectangular()?;

        if !self.token_latency.is_zero() {
            // One step per generated position, shared by every row.
            let steps = u32::try_from(params.max_new_tokens).unwrap_or(u32::MAX);
            std::thread::sleep(self.token_latency.saturating_mul(steps));
        }

        let mut outputs = Vec::with_capacity(input.len() * params.num_return_sequences);
        for row in input.rows() {
            for seq in 0..params.num_return_sequences {
                let mut output = Vec::with_capacity(row.len() + params.max_new_tokens);
                output.extend_from_slice(row);
                output.extend(
                    (0..params.max_new_tokens).map(|i| u32::from(b'a') + ((i + seq) % 26) as u32),
                );
                outputs.push(output);
            }
        }
        Ok(outputs)
    }
}
