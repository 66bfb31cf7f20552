//! Generation collaborator interfaces.
//!
//! `GenerationEngine` batches internally; `BatchModel` runs one rectangular
//! batch per call and leaves grouping to the caller.

use super::error::GenerationError;
use super::params::{GenerateParams, SamplingParams};

/// Serving engine that schedules heterogeneous requests on its own.
pub trait GenerationEngine {
    /// Queue one prompt. Does no generation work.
    fn enqueue(&mut self, prompt: &str, params: SamplingParams) -> Result<(), GenerationError>;

    /// Drive every queued request to completion, blocking until done.
    ///
    /// Returns the number of finished requests.
    fn run_to_completion(&mut self) -> Result<usize, GenerationError>;
}

/// Non-batching model call that requires rectangular input.
pub trait BatchModel {
    /// Generate continuations for every row of `input`.
    ///
    /// Output has `input.len() * params.num_return_sequences` rows, each the
    /// input row followed by `params.max_new_tokens` generated ids.
    fn generate(
        &self,
        input: &PaddedBatch,
        params: &GenerateParams,
    ) -> Result<Vec<Vec<u32>>, GenerationError>;
}

/// Token-id rows padded to a common width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    rows: Vec<Vec<u32>>,
    width: usize,
}

impl PaddedBatch {
    /// Left-pad every row with `pad` up to the longest row.
    pub fn left_padded(rows: Vec<Vec<u32>>, pad: u32) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut padded = vec![pad; width - row.len()];
                padded.extend(row);
                padded
            })
            .collect();
        Self { rows, width }
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Verify every row has the batch width.
    pub fn check_rectangular(&self) -> Result<(), GenerationError> {
        for (row, tokens) in self.rows.iter().enumerate() {
            if tokens.len() != self.width {
                return Err(GenerationError::RaggedBatch {
                    row,
                    got: tokens.len(),
                    expected: self.width,
                });
            }
        }
        Ok(())
    }
}
