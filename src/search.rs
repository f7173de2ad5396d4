//! Search coordination: runs one pool until the first match.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, info};

use crate::crypto::KeypairGenerator;
use crate::matcher::Matcher;
use crate::stats::StatsSnapshot;
use crate::worker::{VanityResult, WorkerExit, WorkerPool};

/// Default interval between progress reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Errors that end a search without a result.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("All {workers} workers exited without finding a match")]
    NoLiveWorkers { workers: usize },

    #[error("Search interrupted before a match was found")]
    Interrupted,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}

/// The winning result together with the final statistics.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The first result delivered by any worker
    pub result: VanityResult,
    /// Statistics taken after every worker stopped
    pub stats: StatsSnapshot,
}

/// Drives a single search: spawns the workers, reports progress on a fixed
/// interval and returns the first match.
///
/// Losing workers are stopped as soon as the first result is received.
#[derive(Debug, Clone)]
pub struct Coordinator {
    num_workers: usize,
    report_interval: Duration,
    stop_flag: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator for `num_workers` workers (at least one).
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers: num_workers.max(1),
            report_interval: DEFAULT_REPORT_INTERVAL,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Sets the progress report interval.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Returns the number of workers a search will use.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Runs the search until a worker delivers a match.
    ///
    /// There is no timeout. The search only fails when every worker has
    /// exited without a result, either because its generator failed or
    /// because the stop flag was raised.
    ///
    /// The stop flag stays raised afterwards, so each coordinator runs one
    /// search.
    pub fn run<G, M>(&self, generator: G, matcher: M) -> Result<SearchOutcome, SearchError>
    where
        G: KeypairGenerator + 'static,
        M: Matcher + 'static,
    {
        let pool = WorkerPool::spawn(
            self.num_workers,
            Arc::new(generator),
            Arc::new(matcher),
            self.stop_flag.clone(),
        )?;
        let reporter = pool.reporter();

        let received = loop {
            match pool.wait_for_result(self.report_interval) {
                Ok(result) => break Some(result),
                Err(RecvTimeoutError::Timeout) => {
                    reporter.report();
                }
                Err(RecvTimeoutError::Disconnected) => break None,
            }
        };

        let interrupted = self.stop_flag.load(Ordering::Relaxed);
        let exits = pool.join();
        debug!(?exits, "all workers joined");
        let stats = reporter.report();

        match received {
            Some(result) => {
                info!(
                    worker = result.worker_id,
                    "Found pubkey: {}",
                    result.keypair.public_key()
                );
                Ok(SearchOutcome { result, stats })
            }
            None if interrupted => Err(SearchError::Interrupted),
            None => {
                let failed = exits
                    .iter()
                    .filter(|e| **e != WorkerExit::Stopped)
                    .count();
                debug!(failed, "no live workers left");
                Err(SearchError::NoLiveWorkers {
                    workers: self.num_workers,
                })
            }
        }
    }
}
