// Copyright 2024-2026 GG-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface for the throughput benchmark.
//!
//! Flags are applied on top of an optional `--config FILE`, which in turn
//! overrides the built-in defaults.
//!
//! ## Usage
//!
//! ```bash
//! gen-throughput --backend delegated --num-prompts 100
//! gen-throughput --backend manual --manual-max-batch-size 8
//! gen-throughput run --config bench.toml --json
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::config::{Backend, BenchConfig};
use crate::error::BenchError;

/// Errors from malformed command lines.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
}

/// Parsed top-level command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(BenchConfig),
    Help,
    Version,
}

/// Parse process arguments (including the program name at index 0).
pub fn parse_args(args: &[String]) -> Result<Command, BenchError> {
    let rest = args.get(1..).unwrap_or_default();
    match rest.first().map(String::as_str) {
        Some("help" | "--help" | "-h") => Ok(Command::Help),
        Some("version" | "--version" | "-V") => Ok(Command::Version),
        Some("run") => parse_run_args(&rest[1..]).map(Command::Run),
        _ => parse_run_args(rest).map(Command::Run),
    }
}

/// Build a config from run flags.
pub fn parse_run_args(args: &[String]) -> Result<BenchConfig, BenchError> {
    let mut config = match find_config_file(args)? {
        Some(path) => BenchConfig::from_file(&path)?,
        None => BenchConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--use-beam-search" => {
                config.use_beam_search = true;
                i += 1;
                continue;
            }
            "--json" => {
                config.json = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let value = args
            .get(i + 1)
            .ok_or_else(|| CliError::MissingValue(flag.to_string()))?;
        match flag {
            "--config" => {}
            "--backend" => config.backend = value.parse::<Backend>()?,
            "--dataset" => config.dataset_path = Some(PathBuf::from(value)),
            "--model" => config.model = value.clone(),
            "--tensor-parallel-size" | "-tp" => {
                config.tensor_parallel_size = parse_value(flag, value)?
            }
            "--n" => config.n = parse_value(flag, value)?,
            "--num-prompts" => config.num_prompts = parse_value(flag, value)?,
            "--seed" => config.seed = parse_value(flag, value)?,
            "--manual-max-batch-size" | "--hf-max-batch-size" => {
                config.manual_max_batch_size = Some(parse_value(flag, value)?)
            }
            "--batch-size" => config.token_budget_batch_size = parse_value(flag, value)?,
            "--manual-token-budget" => config.manual_token_budget = parse_value(flag, value)?,
            "--min-prompt-len" => config.min_prompt_len = parse_value(flag, value)?,
            "--max-prompt-len" => config.max_prompt_len = parse_value(flag, value)?,
            "--min-response-len" => config.min_response_len = parse_value(flag, value)?,
            "--max-response-len" => config.max_response_len = parse_value(flag, value)?,
            "--sim-step-latency-us" => config.sim_step_latency_us = parse_value(flag, value)?,
            _ => return Err(CliError::UnknownArgument(flag.to_string()).into()),
        }
        i += 2;
    }

    Ok(config)
}

fn find_config_file(args: &[String]) -> Result<Option<PathBuf>, CliError> {
    match args.iter().position(|a| a == "--config") {
        Some(idx) => args
            .get(idx + 1)
            .map(|p| Some(PathBuf::from(p)))
            .ok_or_else(|| CliError::MissingValue("--config".to_string())),
        None => Ok(None),
    }
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Usage text for `help`.
pub fn usage() -> String {
    format!(
        "gen-throughput v{}

Benchmark offline generation throughput.

USAGE:
    gen-throughput [run] [OPTIONS]
    gen-throughput help | version

OPTIONS:
    --backend <delegated|manual>   Strategy under test (aliases: vllm, hf) [default: delegated]
    --dataset <PATH>               Dataset path (accepted, not read)
    --model <ID>                   Model identifier [default: facebook/opt-125m]
    -tp, --tensor-parallel-size N  Tensor parallel degree [default: 1]
    --n <N>                        Sequences per prompt [default: 1]
    --use-beam-search              Use beam search (delegated only)
    --num-prompts <N>              Number of requests [default: 200]
    --seed <N>                     Sampling seed [default: 0]
    --manual-max-batch-size <N>    Batch size cap, required for manual
    --batch-size <N>               Engine scheduling batch size [default: 24]
    --manual-token-budget <N>      Token budget per manual batch [default: 2048]
    --min-prompt-len <N>           [default: 128]
    --max-prompt-len <N>           [default: 256]
    --min-response-len <N>         [default: 256]
    --max-response-len <N>         [default: 512]
    --sim-step-latency-us <N>      Simulated per-step cost [default: 0]
    --config <FILE>                TOML config file, overridden by flags
    --json                         Print the summary as JSON

ENVIRONMENT:
    GEN_BENCH_LOG         Log filter (default: info)
    GEN_BENCH_LOG_FORMAT  json or pretty (default: pretty)
    GEN_BENCH_LOG_FILE    Write logs to file

EXIT CODES:
    0  Success
    1  Run failed
    2  Configuration error
",
        env!("CARGO_PKG_VERSION")
    )
}
