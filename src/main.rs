//! gen-throughput entry point.
//!
//! Parses flags, initializes logging, runs one benchmark and prints a single
//! summary line to stdout.
//!
//! ## Exit Codes
//!
//! - `0` success
//! - `1` run failed
//! - `2` configuration or argument error

use std::process::ExitCode;

use gen_throughput::cli::{self, Command};
use gen_throughput::config::load_log_config;
use gen_throughput::error::{BenchError, EXIT_FAILURE};
use gen_throughput::telemetry::init_logging;
use gen_throughput::run_benchmark;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config = match cli::parse_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            eprintln!("{}", cli::usage());
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("gen-throughput {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&e),
    };

    if let Err(e) = init_logging(&load_log_config()) {
        return fail(&BenchError::from(e));
    }

    let report = match run_benchmark(&config) {
        Ok(report) => report,
        Err(e) => return fail(&e),
    };

    if config.json {
        match report.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return ExitCode::from(EXIT_FAILURE);
            }
        }
    } else {
        println!("{}", report);
    }
    ExitCode::SUCCESS
}

fn fail(error: &BenchError) -> ExitCode {
    eprintln!("Error: {}", error);
    if error.is_config_error() {
        eprintln!("Run 'gen-throughput help' for usage.");
    }
    ExitCode::from(error.exit_code())
}
