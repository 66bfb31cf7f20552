//! Sampling configurations handed to the generation collaborators.
//!
//! All fields are validated before a collaborator accepts them.

use super::error::GenerationError;

/// Per-request sampling configuration for the batching engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Output sequences per prompt (fan-out).
    pub n: usize,
    /// 0.0 for beam search, 1.0 otherwise.
    pub temperature: f32,
    pub top_p: f32,
    pub use_beam_search: bool,
    /// Disable early stopping so exactly `max_tokens` tokens are produced.
    pub ignore_eos: bool,
    /// Tokens to generate.
    pub max_tokens: usize,
}

impl SamplingParams {
    /// Fixed-length sampling for a throughput run.
    pub fn for_throughput(n: usize, use_beam_search: bool, max_tokens: usize) -> Self {
        Self {
            n,
            temperature: if use_beam_search { 0.0 } else { 1.0 },
            top_p: 1.0,
            use_beam_search,
            ignore_eos: true,
            max_tokens,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.n == 0 {
            return Err(GenerationError::InvalidParams("n must be >= 1".into()));
        }
        if self.max_tokens == 0 {
            return Err(GenerationError::InvalidParams("max_tokens must be > 0".into()));
        }
        if self.temperature < 0.0 {
            return Err(GenerationError::InvalidParams("temperature must be >= 0".into()));
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(GenerationError::InvalidParams("top_p must be in (0, 1]".into()));
        }
        if self.use_beam_search && self.temperature != 0.0 {
            return Err(GenerationError::InvalidParams(
                "beam search requires temperature 0".into(),
            ));
        }
        Ok(())
    }
}

/// Per-call configuration for a non-batching `generate` interface.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub max_new_tokens: usize,
    /// Sequences returned per input row.
    pub num_return_sequences: usize,
    pub do_sample: bool,
    pub temperature: f32,
    pub top_p: f32,
    pub use_cache: bool,
}

impl GenerateParams {
    /// Plain sampling at temperature 1 with KV caching.
    pub fn sampling(max_new_tokens: usize, num_return_sequences: usize) -> Self {
        Self {
            max_new_tokens,
            num_return_sequences,
            do_sample: true,
            temperature: 1.0,
            top_p: 1.0,
            use_cache: true,
        }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.num_return_sequences == 0 {
            return Err(GenerationError::InvalidParams(
                "num_return_sequences must be >= 1".into(),
            ));
        }
        if self.max_new_tokens == 0 {
            return Err(GenerationError::InvalidParams("max_new_tokens must be > 0".into()));
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(GenerationError::InvalidParams("top_p must be in (0, 1]".into()));
        }
        Ok(())
    }
}
