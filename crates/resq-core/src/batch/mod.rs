//! Windowed batch execution.
//!
//! Inputs are split into consecutive windows of `concurrency` items. Each
//! window runs fully concurrently and must settle before the next one starts,
//! so at most `concurrency` operations are ever in flight.

mod result;
mod run;

pub use result::{BatchItemError, BatchResult};
pub use run::{run_batch, BatchScheduler, DEFAULT_CONCURRENCY};
