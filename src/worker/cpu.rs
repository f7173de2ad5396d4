//! CPU-based worker for vanity key generation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::crypto::KeypairGenerator;
use crate::matcher::Matcher;
use crate::stats::WorkerStats;

use super::VanityResult;

/// Why a worker loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker found a match and sent it
    Found,
    /// The stop flag was raised
    Stopped,
    /// The key generator failed
    GeneratorFailed,
    /// The worker thread panicked
    Panicked,
}

/// A CPU worker that generates and tests keypairs.
pub struct CpuWorker<G, M> {
    /// Worker ID
    id: usize,
    /// Shared key generator
    generator: Arc<G>,
    /// Shared matcher
    matcher: Arc<M>,
    /// Channel to send the result
    result_tx: Sender<VanityResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// This worker's statistics
    stats: Arc<WorkerStats>,
}

impl<G: KeypairGenerator, M: Matcher> CpuWorker<G, M> {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        generator: Arc<G>,
        matcher: Arc<M>,
        result_tx: Sender<VanityResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            generator,
            matcher,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates keypairs and tests them against the matcher until:
    /// - A match is found (sends it through the channel)
    /// - The stop flag is set
    /// - The generator fails
    ///
    /// Consumes the worker so its sender is dropped when the loop ends.
    pub fn run(self) -> WorkerExit {
        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                debug!(worker = self.id, "stop flag raised");
                return WorkerExit::Stopped;
            }

            let attempts = self.stats.record_attempt();

            let keypair = match self.generator.generate() {
                Ok(keypair) => keypair,
                Err(e) => {
                    warn!(worker = self.id, "key generation failed, worker exiting: {}", e);
                    return WorkerExit::GeneratorFailed;
                }
            };

            if self.matcher.matches(&keypair) {
                self.stats.record_match();

                let result = VanityResult {
                    keypair,
                    worker_id: self.id,
                    attempts,
                };

                // The channel has room for one result per worker; a closed
                // channel means the search is already over.
                let _ = self.result_tx.send(result);
                return WorkerExit::Found;
            }
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{GenerateError, Keypair};
    use crate::matcher::Pattern;
    use crossbeam_channel::bounded;
    use std::sync::atomic::AtomicUsize;

    struct Sequence {
        keys: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl KeypairGenerator for Sequence {
        fn generate(&self) -> Result<Keypair, GenerateError> {
            let i = self.next.fetch_add(1, Ordering::Relaxed);
            Ok(Keypair::new(self.keys[i % self.keys.len()], format!("private-{}", i)))
        }
    }

    struct Failing;

    impl KeypairGenerator for Failing {
        fn generate(&self) -> Result<Keypair, GenerateError> {
            Err(GenerateError::Other("no entropy".into()))
        }
    }

    fn worker<G: KeypairGenerator>(
        generator: G,
        pattern: Pattern,
        stop: bool,
    ) -> (CpuWorker<G, Pattern>, crossbeam_channel::Receiver<VanityResult>, Arc<WorkerStats>) {
        let (tx, rx) = bounded(1);
        let stats = Arc::new(WorkerStats::new());
        let worker = CpuWorker::new(
            7,
            Arc::new(generator),
            Arc::new(pattern),
            tx,
            Arc::new(AtomicBool::new(stop)),
            stats.clone(),
        );
        (worker, rx, stats)
    }

    #[test]
    fn test_worker_sends_first_match() {
        let generator = Sequence {
            keys: vec!["zzz", "yyy", "abc"],
            next: AtomicUsize::new(0),
        };
        let (worker, rx, stats) = worker(generator, Pattern::prefix("AB"), false);
        assert_eq!(worker.id(), 7);

        assert_eq!(worker.run(), WorkerExit::Found);

        let result = rx.try_recv().unwrap();
        assert_eq!(result.keypair.public_key(), "abc");
        assert_eq!(result.keypair.private_key(), "private-2");
        assert_eq!(result.worker_id, 7);
        assert_eq!(result.attempts, 3);
        assert_eq!(stats.attempts(), 3);
        assert_eq!(stats.matches_found(), 1);

        // the worker's sender is gone once it returns
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_worker_exits_on_generator_failure() {
        let (worker, rx, stats) = worker(Failing, Pattern::prefix("a"), false);
        assert_eq!(worker.run(), WorkerExit::GeneratorFailed);
        assert_eq!(stats.attempts(), 1);
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_worker_honours_stop_flag() {
        let generator = Sequence {
            keys: vec!["abc"],
            next: AtomicUsize::new(0),
        };
        let (worker, rx, stats) = worker(generator, Pattern::prefix("a"), true);
        assert_eq!(worker.run(), WorkerExit::Stopped);
        assert_eq!(stats.attempts(), 0);
        assert!(rx.try_recv().is_err());
    }
}
