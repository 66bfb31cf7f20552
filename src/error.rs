//! Top-level error type for a benchmark run.
//!
//! Every failure is fatal: nothing is retried and partial timings are
//! discarded.

use thiserror::Error;

use crate::cli::CliError;
use crate::config::ConfigError;
use crate::engine::{GenerationError, TokenizerError};
use crate::telemetry::LogError;

/// Process exit code for configuration and argument errors.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Process exit code for runtime failures.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Argument error: {0}")]
    Cli(#[from] CliError),

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Unsupported combination: {0}")]
    UnsupportedCombination(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Cannot compute throughput for {requests} requests over {elapsed_seconds}s")]
    DivideByZero { requests: usize, elapsed_seconds: f64 },

    #[error("Logging setup failed: {0}")]
    Logging(#[from] LogError),
}

impl BenchError {
    /// Returns true if the run was rejected before any work started.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Cli(_) | Self::UnknownBackend(_)
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_config_error() {
            EXIT_CONFIG_ERROR
        } else {
            EXIT_FAILURE
        }
    }
}
