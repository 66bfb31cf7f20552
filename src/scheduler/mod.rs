//! Request scheduling for the manual-batch strategy.
//!
//! Groups an ordered workload into token-budgeted batches without
//! reordering it.

mod batch;

pub use batch::{Batch, BatchConfig, BatchScheduler, Batches};
