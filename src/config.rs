//! Benchmark configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags. Logging is configured separately from `GEN_BENCH_*`
//! environment variables, where invalid values fall back to defaults.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `GEN_BENCH_LOG` | info | Log filter directive |
//! | `GEN_BENCH_LOG_FORMAT` | pretty | `json` or `pretty` |
//! | `GEN_BENCH_LOG_FILE` | unset | Write JSON logs to this file |

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::EngineConfig;
use crate::error::BenchError;
use crate::scheduler::BatchConfig;
use crate::telemetry::{LogConfig, LogFormat};
use crate::workload::LengthBounds;

/// Invalid or conflicting configuration. Raised before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: i64 },

    #[error("min_{name} ({min}) exceeds max_{name} ({max})")]
    InvertedRange { name: &'static str, min: i64, max: i64 },

    #[error("invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("manual_max_batch_size is required for the manual backend")]
    MissingManualBatchSize,

    #[error("manual_max_batch_size is only valid for the manual backend")]
    ManualBatchSizeForbidden,

    #[error("manual backend runs on one device, got tensor_parallel_size {0}")]
    ManualTensorParallel(usize),

    #[error("failed to read config file {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Execution strategy under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Backend {
    /// Hand the whole workload to a batching engine.
    #[default]
    Delegated,
    /// Pre-batch requests for a non-batching model call.
    Manual,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegated => "delegated",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delegated" | "vllm" => Ok(Self::Delegated),
            "manual" | "hf" => Ok(Self::Manual),
            other => Err(BenchError::UnknownBackend(other.to_string())),
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Every knob of a benchmark run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub backend: Backend,
    /// Accepted for compatibility; sampling never reads it.
    pub dataset_path: Option<PathBuf>,
    pub model: String,
    pub tensor_parallel_size: usize,
    /// Output sequences per prompt.
    pub n: usize,
    pub use_beam_search: bool,
    pub num_prompts: usize,
    pub seed: u64,
    /// Batch size cap for the manual backend.
    pub manual_max_batch_size: Option<usize>,
    /// Sizes the delegated engine's scheduling budget.
    pub token_budget_batch_size: usize,
    /// Token budget for manual batches.
    pub manual_token_budget: usize,
    pub min_prompt_len: i64,
    pub max_prompt_len: i64,
    pub min_response_len: i64,
    pub max_response_len: i64,
    /// Simulated per-step cost of the built-in collaborators.
    pub sim_step_latency_us: u64,
    /// Print the summary as JSON instead of text.
    pub json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Delegated,
            dataset_path: None,
            model: "facebook/opt-125m".to_string(),
            tensor_parallel_size: 1,
            n: 1,
            use_beam_search: false,
            num_prompts: 200,
            seed: 0,
            manual_max_batch_size: None,
            token_budget_batch_size: 24,
            manual_token_budget: 2048,
            min_prompt_len: 128,
            max_prompt_len: 256,
            min_response_len: 256,
            max_response_len: 512,
            sim_step_latency_us: 0,
            json: false,
        }
    }
}

impl BenchConfig {
    /// Load a config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate every field and flag combination.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.length_bounds()?;

        if self.n == 0 {
            return Err(ConfigError::InvalidValue { name: "n", reason: "must be >= 1".into() });
        }
        if self.tensor_parallel_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "tensor_parallel_size",
                reason: "must be >= 1".into(),
            });
        }
        if self.token_budget_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "token_budget_batch_size",
                reason: "must be >= 1".into(),
            });
        }

        match self.backend {
            Backend::Delegated => {
                if self.manual_max_batch_size.is_some() {
                    return Err(ConfigError::ManualBatchSizeForbidden);
                }
                self.engine_config()?;
            }
            Backend::Manual => {
                match self.manual_max_batch_size {
                    None => return Err(ConfigError::MissingManualBatchSize),
                    Some(0) => {
                        return Err(ConfigError::InvalidValue {
                            name: "manual_max_batch_size",
                            reason: "must be >= 1".into(),
                        })
                    }
                    Some(_) => {}
                }
                if self.tensor_parallel_size != 1 {
                    return Err(ConfigError::ManualTensorParallel(self.tensor_parallel_size));
                }
                if self.manual_token_budget == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "manual_token_budget",
                        reason: "must be >= 1".into(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn length_bounds(&self) -> Result<LengthBounds, ConfigError> {
        LengthBounds::new(
            self.min_prompt_len,
            self.max_prompt_len,
            self.min_response_len,
            self.max_response_len,
        )
    }

    /// Manual batching limits. Only meaningful for the manual backend.
    pub fn batch_config(&self) -> Result<BatchConfig, ConfigError> {
        let max_batch_size = self
            .manual_max_batch_size
            .ok_or(ConfigError::MissingManualBatchSize)?;
        Ok(BatchConfig {
            max_batch_size,
            token_budget: self.manual_token_budget,
        })
    }

    /// Delegated engine limits derived from the largest possible request.
    ///
    /// Slots are capped at the workload size since no more sequences than
    /// requests can ever run at once.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let bounds = self.length_bounds()?;
        let sized = EngineConfig::for_workload(
            self.token_budget_batch_size,
            bounds.max_prompt_len,
            bounds.max_response_len,
        )
        .ok_or_else(|| ConfigError::InvalidValue {
            name: "token_budget_batch_size",
            reason: "engine token budget overflows with the configured lengths".into(),
        })?;

        Ok(EngineConfig {
            max_num_seqs: sized.max_num_seqs.min(self.num_prompts.max(1)),
            tensor_parallel_size: self.tensor_parallel_size,
            seed: self.seed,
            step_latency: self.step_latency(),
            ..sized
        })
    }

    pub fn step_latency(&self) -> Duration {
        Duration::from_micros(self.sim_step_latency_us)
    }
}

/// Read a string env var, treating empty as unset.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load logging configuration from environment.
pub fn load_log_config() -> LogConfig {
    let level = env_string("GEN_BENCH_LOG").unwrap_or_else(|| "info".to_string());
    let format = env_string("GEN_BENCH_LOG_FORMAT")
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or(LogFormat::Pretty);
    let output_path = env_string("GEN_BENCH_LOG_FILE").map(PathBuf::from);

    LogConfig { format, level, output_path }
}
