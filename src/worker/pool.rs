//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use tracing::debug;

use crate::crypto::{Keypair, KeypairGenerator};
use crate::matcher::Matcher;
use crate::stats::{StatsReporter, WorkerStats};

use super::cpu::{CpuWorker, WorkerExit};

/// Result of a successful vanity key search.
#[derive(Debug, Clone)]
pub struct VanityResult {
    /// The matching keypair
    pub keypair: Keypair,
    /// The ID of the worker that found this result
    pub worker_id: usize,
    /// Attempts the winning worker had made, including the match
    pub attempts: u64,
}

/// Manages a pool of workers for parallel vanity key search.
///
/// Only the workers hold result senders, so the channel disconnects once
/// every worker has exited.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<WorkerExit>>>,
    /// Channel receiver for results
    result_rx: Receiver<VanityResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Per-worker statistics
    stats: Vec<Arc<WorkerStats>>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` workers sharing one generator and one matcher.
    pub fn spawn<G, M>(
        num_workers: usize,
        generator: Arc<G>,
        matcher: Arc<M>,
        stop_flag: Arc<AtomicBool>,
    ) -> io::Result<Self>
    where
        G: KeypairGenerator + 'static,
        M: Matcher + 'static,
    {
        // One slot per worker: each sends at most once, so no send ever blocks.
        let (result_tx, result_rx) = bounded(num_workers.max(1));
        let stats: Vec<_> = (0..num_workers)
            .map(|_| Arc::new(WorkerStats::new()))
            .collect();
        let start_time = Instant::now();

        let mut handles = Vec::with_capacity(num_workers);
        for (id, worker_stats) in stats.iter().enumerate() {
            let worker = CpuWorker::new(
                id,
                generator.clone(),
                matcher.clone(),
                result_tx.clone(),
                stop_flag.clone(),
                worker_stats.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    stop_flag.store(true, Ordering::Relaxed);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }

        // Drop the original sender so the channel closes when all workers finish
        drop(result_tx);

        debug!(workers = num_workers, "worker pool started");

        Ok(Self {
            num_workers,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time,
        })
    }

    /// Waits for a result with a timeout.
    ///
    /// `Disconnected` means every worker has exited and no result is pending.
    pub fn wait_for_result(&self, timeout: Duration) -> Result<VanityResult, RecvTimeoutError> {
        self.result_rx.recv_timeout(timeout)
    }

    /// Attempts to receive a result without blocking.
    pub fn try_recv(&self) -> Option<VanityResult> {
        self.result_rx.try_recv().ok()
    }

    /// Returns a stats reporter over this pool's worker counters.
    pub fn reporter(&self) -> StatsReporter {
        StatsReporter::new(self.stats.clone(), self.start_time)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops the workers and waits for all of them to exit.
    ///
    /// Returns each worker's exit reason in worker ID order.
    pub fn join(mut self) -> Vec<WorkerExit> {
        self.stop();
        self.join_handles()
    }

    fn join_handles(&mut self) -> Vec<WorkerExit> {
        self.handles
            .take()
            .map(|handles| {
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(WorkerExit::Panicked))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        // Wait for workers to finish if they haven't been joined
        self.join_handles();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::GenerateError;
    use crate::matcher::Pattern;

    struct NeverMatches;

    impl KeypairGenerator for NeverMatches {
        fn generate(&self) -> Result<Keypair, GenerateError> {
            Ok(Keypair::new("zzzz", "private"))
        }
    }

    struct AlwaysMatches;

    impl KeypairGenerator for AlwaysMatches {
        fn generate(&self) -> Result<Keypair, GenerateError> {
            Ok(Keypair::new("abcd", "private"))
        }
    }

    fn spawn<G: KeypairGenerator + 'static>(workers: usize, generator: G) -> WorkerPool {
        WorkerPool::spawn(
            workers,
            Arc::new(generator),
            Arc::new(Pattern::prefix("ab")),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap()
    }

    #[test]
    fn test_total_attempts_is_non_decreasing() {
        let pool = spawn(4, NeverMatches);
        assert_eq!(pool.num_workers(), 4);
        let reporter = pool.reporter();

        let mut last = 0;
        for _ in 0..50 {
            let total = reporter.total_attempts();
            assert!(total >= last);
            last = total;
            thread::sleep(Duration::from_millis(1));
        }
        assert!(matches!(
            pool.wait_for_result(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        ));

        let exits = pool.join();
        assert_eq!(exits, vec![WorkerExit::Stopped; 4]);
        assert!(reporter.total_attempts() >= last);
    }

    #[test]
    fn test_every_worker_can_deliver_without_blocking() {
        let pool = spawn(8, AlwaysMatches);
        let reporter = pool.reporter();

        // Every worker matches on its first attempt and must still exit.
        let first = pool.wait_for_result(Duration::from_secs(10)).unwrap();
        assert_eq!(first.keypair.public_key(), "abcd");
        assert_eq!(first.attempts, 1);

        let exits = pool.join();
        assert_eq!(exits.len(), 8);
        assert!(exits
            .iter()
            .all(|e| matches!(e, WorkerExit::Found | WorkerExit::Stopped)));
        assert!(reporter.total_matches() >= 1);
    }

    #[test]
    fn test_channel_disconnects_when_workers_stop() {
        let pool = spawn(2, NeverMatches);
        pool.stop();
        assert!(pool.is_stopped());
        assert_eq!(
            pool.wait_for_result(Duration::from_secs(10)).unwrap_err(),
            RecvTimeoutError::Disconnected
        );
        assert!(pool.try_recv().is_none());
    }
}
