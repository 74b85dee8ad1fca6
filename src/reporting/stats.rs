use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::processing::ProbeOutcome;

/// Running success and failure counts for one file.
///
/// Shared by reference between every worker probing that file. Counters
/// only grow.
#[derive(Debug)]
pub struct FileStatistics {
    filename: String,
    successes: AtomicU64,
    failures: AtomicU64,
}

impl FileStatistics {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    /// Count `outcome` and return a snapshot if the new total sits on a
    /// multiple of `interval`.
    ///
    /// Workers racing across the same boundary may each get a snapshot, or
    /// none of them may; both are expected.
    pub fn record(&self, outcome: ProbeOutcome, interval: u64) -> Option<StatsSnapshot> {
        if outcome.is_success() {
            self.record_success();
        } else {
            self.record_failure();
        }

        let snapshot = self.snapshot();
        let total = snapshot.total();
        (interval > 0 && total > 0 && total % interval == 0).then_some(snapshot)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.snapshot().total()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            filename: self.filename.clone(),
            successes: self.successes(),
            failures: self.failures(),
        }
    }
}

/// Point-in-time copy of a file's counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub filename: String,
    pub successes: u64,
    pub failures: u64,
}

impl StatsSnapshot {
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "File: {} called {} URLs successfully, and {} URLs unsuccessfully out of {} total calls.",
            self.filename,
            self.successes,
            self.failures,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new__starts_at_zero() {
        let stats = FileStatistics::new("a.gz");

        assert_eq!(stats.filename(), "a.gz");
        assert_eq!(stats.successes(), 0);
        assert_eq!(stats.failures(), 0);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_record__malformed_counts_as_failure() {
        let stats = FileStatistics::new("a.gz");

        stats.record(ProbeOutcome::Success, 10_000);
        stats.record(ProbeOutcome::Failure, 10_000);
        stats.record(ProbeOutcome::Malformed, 10_000);

        assert_eq!(stats.successes(), 1);
        assert_eq!(stats.failures(), 2);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_record__snapshot_only_on_interval_multiples() {
        let stats = FileStatistics::new("a.gz");

        let snapshots: Vec<_> = (0..25)
            .filter_map(|_| stats.record(ProbeOutcome::Success, 10))
            .collect();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].total(), 10);
        assert_eq!(snapshots[1].total(), 20);
    }

    #[test]
    fn test_snapshot__display_format() {
        let snapshot = StatsSnapshot {
            filename: "urls.gz".to_string(),
            successes: 7,
            failures: 3,
        };

        assert_eq!(
            snapshot.to_string(),
            "File: urls.gz called 7 URLs successfully, and 3 URLs unsuccessfully out of 10 total calls."
        );
    }

    #[test]
    fn test_snapshot__is_a_copy() {
        let stats = FileStatistics::new("a.gz");
        stats.record_success();
        let snapshot = stats.snapshot();

        stats.record_failure();

        assert_eq!(snapshot.total(), 1);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_record__concurrent_increments_are_not_lost() {
        let stats = Arc::new(FileStatistics::new("a.gz"));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for i in 0..1_000 {
                        let outcome = if (worker + i) % 2 == 0 {
                            ProbeOutcome::Success
                        } else {
                            ProbeOutcome::Failure
                        };
                        if let Some(snapshot) = stats.record(outcome, 100) {
                            assert_eq!(
                                snapshot.total(),
                                snapshot.successes + snapshot.failures
                            );
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert_eq!(stats.successes(), 4_000);
        assert_eq!(stats.failures(), 4_000);
        assert_eq!(stats.total(), 8_000);
    }

    #[test]
    fn test_snapshot__counts_never_decrease_under_concurrency() {
        let stats = Arc::new(FileStatistics::new("a.gz"));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    let mut seen = Vec::with_capacity(1_000);
                    for i in 0..1_000 {
                        let outcome = if (worker + i) % 3 == 0 {
                            ProbeOutcome::Success
                        } else {
                            ProbeOutcome::Malformed
                        };
                        stats.record(outcome, 1);
                        seen.push(stats.snapshot());
                    }
                    seen
                })
            })
            .collect();

        for handle in handles {
            let seen = handle.join().expect("worker panicked");
            for pair in seen.windows(2) {
                assert!(pair[1].successes >= pair[0].successes);
                assert!(pair[1].failures >= pair[0].failures);
                assert!(pair[1].total() > pair[0].total());
            }
        }
        assert_eq!(stats.total(), 8_000);
    }
}
