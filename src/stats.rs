//! Progress statistics aggregated across workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

/// Statistics for a single worker.
///
/// Written only by the owning worker, read concurrently by the reporter.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Keys generated and tested
    attempts: AtomicU64,
    /// Matches found
    matches_found: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one generate-and-test attempt.
    #[inline]
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Records a match.
    pub fn record_match(&self) {
        self.matches_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the matches found so far.
    pub fn matches_found(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// A point-in-time view of search progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// Wall-clock time since the search started
    pub elapsed: Duration,
    /// Sum of all worker attempt counters
    pub total_attempts: u64,
}

impl StatsSnapshot {
    /// Returns throughput in keys per second.
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns throughput in thousands of keys per second.
    pub fn kilo_keys_per_second(&self) -> f64 {
        self.keys_per_second() / 1000.0
    }
}

/// Derives elapsed time and throughput from the workers' counters.
///
/// The total is a relaxed sum over counters that keep moving while it is
/// read, so it is only a monitoring signal.
#[derive(Debug, Clone)]
pub struct StatsReporter {
    workers: Vec<Arc<WorkerStats>>,
    start_time: Instant,
}

impl StatsReporter {
    /// Creates a reporter over the given worker counters.
    pub fn new(workers: Vec<Arc<WorkerStats>>, start_time: Instant) -> Self {
        Self {
            workers,
            start_time,
        }
    }

    /// Returns the sum of every worker's attempt counter.
    pub fn total_attempts(&self) -> u64 {
        self.workers.iter().map(|w| w.attempts()).sum()
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.workers.iter().map(|w| w.matches_found()).sum()
    }

    /// Returns the elapsed time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Takes a snapshot of the current progress.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            elapsed: self.elapsed(),
            total_attempts: self.total_attempts(),
        }
    }

    /// Logs the current progress and returns the snapshot it reported.
    pub fn report(&self) -> StatsSnapshot {
        let snapshot = self.snapshot();
        info!(
            "Time: {}s | Tested: {} | {:.2} kKeys/s",
            snapshot.elapsed.as_secs(),
            format_number(snapshot.total_attempts),
            snapshot.kilo_keys_per_second()
        );
        snapshot
    }
}

/// Formats a count with a K/M/B suffix.
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        let snapshot = StatsSnapshot {
            elapsed: Duration::from_secs(2),
            total_attempts: 2000,
        };
        assert!((snapshot.kilo_keys_per_second() - 1.0).abs() < 1e-9);
        assert!((snapshot.keys_per_second() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_without_elapsed_time() {
        let snapshot = StatsSnapshot {
            elapsed: Duration::ZERO,
            total_attempts: 10,
        };
        assert_eq!(snapshot.kilo_keys_per_second(), 0.0);
    }

    #[test]
    fn test_total_attempts_sums_workers() {
        let workers: Vec<_> = (0..3).map(|_| Arc::new(WorkerStats::new())).collect();
        let reporter = StatsReporter::new(workers.clone(), Instant::now());
        assert_eq!(reporter.total_attempts(), 0);

        workers[0].record_attempt();
        workers[1].record_attempt();
        workers[1].record_attempt();
        workers[2].record_match();

        assert_eq!(reporter.total_attempts(), 3);
        assert_eq!(reporter.total_matches(), 1);
        assert_eq!(reporter.report().total_attempts, 3);
    }

    #[test]
    fn test_record_attempt_returns_running_count() {
        let stats = WorkerStats::new();
        assert_eq!(stats.record_attempt(), 1);
        assert_eq!(stats.record_attempt(), 2);
        assert_eq!(stats.attempts(), 2);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.50K");
        assert_eq!(format_number(2_000_000), "2.00M");
        assert_eq!(format_number(3_250_000_000), "3.25B");
    }
}
