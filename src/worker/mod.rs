//! Worker pool for parallel vanity key search.
//!
//! This module provides:
//! - CPU workers running the generate-and-test loop
//! - A pool owning the worker threads, result channel and stop flag

mod cpu;
mod pool;

pub use cpu::{CpuWorker, WorkerExit};
pub use pool::{VanityResult, WorkerPool};
