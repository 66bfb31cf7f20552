//! Generation collaborators.
//!
//! Defines the tokenizer, engine and model interfaces the harness drives,
//! plus simulated implementations that run without real weights.

pub mod continuous;
pub mod error;
pub mod model;
pub mod params;
pub mod simulated;

mod tokenizer;

pub use continuous::{BatchSlot, ContinuousBatcher, PendingRequest, RequestId, RequestPhase};
pub use error::GenerationError;
pub use model::{BatchModel, GenerationEngine, PaddedBatch};
pub use params::{GenerateParams, SamplingParams};
pub use simulated::{EngineConfig, SimulatedEngine, SimulatedModel};
pub use tokenizer::{CharTokenizer, Tokenizer, TokenizerError};
