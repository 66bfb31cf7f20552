//! Offline generation throughput benchmark.
//!
//! Compares two ways of serving a synthetic workload:
//!
//! - **Delegated**: queue every request into an engine that batches
//!   internally, then time the engine's drain.
//! - **Manual**: group requests greedily under a token budget and time a
//!   non-batching `generate` call per batch, decode included.
//!
//! # Pipeline
//!
//! `RequestSampler` → (`BatchScheduler` → manual runner | delegated runner)
//! → `ThroughputReport`.
//!
//! Everything runs on the calling thread. Collaborator calls block until
//! complete and there is no cancellation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod telemetry;
pub mod workload;

use engine::{CharTokenizer, SimulatedEngine, SimulatedModel};
use runner::{BackendRunner, DelegatedRunner, LogProgress, ManualRunner};
use scheduler::BatchScheduler;
use telemetry::{RunSpan, SpanExt};

pub use config::{Backend, BenchConfig, ConfigError};
pub use error::BenchError;
pub use report::{RunResult, ThroughputReport};
pub use workload::{Request, RequestSampler, WorkloadSet};

/// Build the runner for `config` backed by the simulated collaborators.
pub fn build_runner(config: &BenchConfig) -> Result<Box<dyn BackendRunner>, BenchError> {
    let runner: Box<dyn BackendRunner> = match config.backend {
        Backend::Delegated => {
            let engine = SimulatedEngine::new(config.engine_config()?, CharTokenizer::default());
            Box::new(DelegatedRunner::new(engine, config.n, config.use_beam_search))
        }
        Backend::Manual => Box::new(ManualRunner::new(
            SimulatedModel::new(config.step_latency()),
            CharTokenizer::default(),
            BatchScheduler::new(config.batch_config()?),
            config.n,
            config.use_beam_search,
            LogProgress,
        )),
    };
    Ok(runner)
}

/// Time `runner` over `workload` and compute its throughput.
pub fn execute<R: BackendRunner + ?Sized>(
    runner: &mut R,
    workload: &WorkloadSet,
) -> Result<ThroughputReport, BenchError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let span = RunSpan::new(&run_id, runner.name());
    let _guard = span.enter();

    let result = runner.run(workload).and_then(|elapsed| {
        span.record("elapsed_s", elapsed.as_secs_f64());
        telemetry::record_run_elapsed(runner.name(), elapsed.as_secs_f64());
        ThroughputReport::compute(runner.name(), RunResult::new(workload, elapsed))
    });
    span.record_result(&result);
    result
}

/// Validate `config`, sample the workload and run the selected backend.
pub fn run_benchmark(config: &BenchConfig) -> Result<ThroughputReport, BenchError> {
    config.validate()?;
    let bounds = config.length_bounds()?;

    tracing::info!(
        backend = %config.backend,
        model = %config.model,
        dataset = ?config.dataset_path,
        num_prompts = config.num_prompts,
        n = config.n,
        use_beam_search = config.use_beam_search,
        seed = config.seed,
        tensor_parallel_size = config.tensor_parallel_size,
        host_cpus = num_cpus::get(),
        "starting throughput benchmark"
    );

    let tokenizer = CharTokenizer::default();
    let workload = RequestSampler::seeded(config.seed).sample(
        config.num_prompts,
        &tokenizer,
        &bounds,
    )?;

    let mut runner = build_runner(config)?;
    execute(runner.as_mut(), &workload)
}
