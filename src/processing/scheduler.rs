use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::core::constants::{messages, reporting};
use crate::core::error::Result;
use crate::processing::line_source::{LineSource, display_name};
use crate::processing::pool::{PoolSizing, WorkerPool};
use crate::processing::prober::Probe;
use crate::reporting::logging;
use crate::reporting::sink::ReportSink;
use crate::reporting::stats::{FileStatistics, StatsSnapshot};

/// How a file job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Every line was probed
    Completed,
    /// The line source failed to open or broke mid-stream
    Aborted,
}

/// Final statistics of one file job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub snapshot: StatsSnapshot,
    pub elapsed: Duration,
    pub status: JobStatus,
}

impl FileReport {
    pub fn is_aborted(&self) -> bool {
        self.status == JobStatus::Aborted
    }
}

/// Drives files through the prober on one shared worker pool.
///
/// Every file job runs on its own coordinating thread that reads lines and
/// hands each one to the pool as a separate task. A file keeps at most its
/// share of the pool busy, so a slow sibling cannot hold its lines back.
/// The job waits for all of its lines, then emits the final report and
/// timing line.
pub struct Scheduler<P, S> {
    pool: WorkerPool,
    prober: P,
    sink: S,
    report_interval: u64,
    in_flight: usize,
}

impl<P: Probe, S: ReportSink> Scheduler<P, S> {
    /// Each file may occupy the whole pool.
    pub fn new(pool: WorkerPool, prober: P, sink: S) -> Self {
        let in_flight = pool.width();
        Self {
            pool,
            prober,
            sink,
            report_interval: reporting::REPORT_INTERVAL,
            in_flight,
        }
    }

    /// Size a fresh pool for `file_count` files, splitting it evenly between them.
    pub fn for_batch(sizing: &PoolSizing, file_count: usize, prober: P, sink: S) -> Result<Self> {
        let pool = WorkerPool::for_batch(sizing, file_count)?;
        let in_flight = (pool.width() / file_count.max(1)).max(1);
        Ok(Self::new(pool, prober, sink).with_in_flight(in_flight))
    }

    /// Size the pool and report interval from `config`.
    pub fn from_config(config: &Config, file_count: usize, prober: P, sink: S) -> Result<Self> {
        Ok(Self::for_batch(&config.pool_sizing(), file_count, prober, sink)?
            .with_report_interval(config.report_interval()))
    }

    pub fn with_report_interval(mut self, interval: u64) -> Self {
        self.report_interval = interval;
        self
    }

    /// Cap the lines of one file that are probed at the same time.
    pub fn with_in_flight(mut self, limit: usize) -> Self {
        self.in_flight = limit.max(1);
        self
    }

    pub fn pool_width(&self) -> usize {
        self.pool.width()
    }

    /// Process every file and return one report per file, in input order.
    pub fn process(&self, files: &[PathBuf]) -> Vec<FileReport> {
        let start = Instant::now();
        let reports: Vec<FileReport> = thread::scope(|scope| {
            let jobs: Vec<_> = files
                .iter()
                .map(|path| scope.spawn(move || self.process_file(path)))
                .collect();

            jobs.into_iter()
                .map(|job| {
                    job.join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        let aborted = reports.iter().filter(|r| r.is_aborted()).count();
        logging::log_batch_complete(reports.len(), aborted, start.elapsed());
        reports
    }

    /// Run one file job to completion on the calling thread and emit its reports.
    ///
    /// The calling thread must not be one of the pool's workers.
    pub fn process_file(&self, path: &Path) -> FileReport {
        let file_name = display_name(path);
        let stats = FileStatistics::new(file_name.clone());
        let start = Instant::now();

        let status = match self.drain(path, &stats) {
            Ok(()) => JobStatus::Completed,
            Err(e) => {
                logging::log_file_failure(&e);
                self.sink
                    .emit(&format!("{}{}", messages::FILE_ERROR_PREFIX, file_name));
                JobStatus::Aborted
            }
        };

        let elapsed = start.elapsed();
        let snapshot = stats.snapshot();
        self.sink.emit(&snapshot.to_string());
        self.sink.emit(&format!(
            "Done processing {}.  Process took {} milliseconds",
            file_name,
            elapsed.as_millis()
        ));
        logging::log_file_complete(&file_name, snapshot.total(), elapsed);

        FileReport {
            snapshot,
            elapsed,
            status,
        }
    }

    /// Feed every line of `path` through the prober into `stats`.
    ///
    /// Lines are read here and probed on the pool, at most `in_flight` at a
    /// time. A read error stops dispatch; lines already handed out still
    /// finish and stay counted.
    fn drain(&self, path: &Path, stats: &FileStatistics) -> Result<()> {
        let source = LineSource::open(path)?;

        // One token per free slot: taken before a line is spawned, returned when it is recorded
        let (release, acquire) = mpsc::sync_channel(self.in_flight);
        for _ in 0..self.in_flight {
            let _ = release.send(());
        }

        self.pool.in_place_scope(|scope| {
            for line in source {
                let line = line?;
                if acquire.recv().is_err() {
                    break;
                }

                let release = release.clone();
                scope.spawn(move |_| {
                    let outcome = self.prober.probe(&line);
                    if let Some(snapshot) = stats.record(outcome, self.report_interval) {
                        self.sink.emit(&snapshot.to_string());
                    }
                    let _ = release.send(());
                });
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::processing::prober::{ProbeOutcome, parse_url};
    use crate::reporting::sink::MemorySink;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    /// Answers from a fixed table, never touches the network.
    #[derive(Default)]
    struct ScriptedProber {
        outcomes: HashMap<String, ProbeOutcome>,
        calls: AtomicUsize,
    }

    impl ScriptedProber {
        fn with(pairs: &[(&str, ProbeOutcome)]) -> Self {
            Self {
                outcomes: pairs
                    .iter()
                    .map(|(url, outcome)| (url.to_string(), *outcome))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Probe for ScriptedProber {
        fn probe(&self, line: &str) -> ProbeOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if parse_url(line).is_err() {
                return ProbeOutcome::Malformed;
            }
            self.outcomes
                .get(line.trim())
                .copied()
                .unwrap_or(ProbeOutcome::Failure)
        }
    }

    fn write_gz(dir: &TempDir, name: &str, lines: &[String]) -> std::io::Result<PathBuf> {
        let path = dir.path().join(name);
        let mut encoder = GzEncoder::new(std::fs::File::create(&path)?, Compression::fast());
        for line in lines {
            writeln!(encoder, "{line}")?;
        }
        encoder.finish()?;
        Ok(path)
    }

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_process__mixed_outcomes() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = write_gz(
            &dir,
            "a.gz",
            &strings(&["http://ok/", "not a url", "http://err/"]),
        )?;
        let prober = ScriptedProber::with(&[
            ("http://ok/", ProbeOutcome::Success),
            ("http://err/", ProbeOutcome::Failure),
        ]);
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 1, &prober, &sink)?;

        let reports = scheduler.process(&[path]);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, JobStatus::Completed);
        assert_eq!(reports[0].snapshot.successes, 1);
        assert_eq!(reports[0].snapshot.failures, 2);
        assert_eq!(reports[0].snapshot.total(), 3);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 3);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "File: a.gz called 1 URLs successfully, and 2 URLs unsuccessfully out of 3 total calls."
        );
        assert!(lines[1].starts_with("Done processing a.gz.  Process took "));
        assert!(lines[1].ends_with(" milliseconds"));
        Ok(())
    }

    #[test]
    fn test_process__empty_batch() -> TestResult {
        let prober = ScriptedProber::default();
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 0, &prober, &sink)?;

        let reports = scheduler.process(&[]);

        assert_eq!(scheduler.pool_width(), 4);
        assert!(reports.is_empty());
        assert!(sink.lines().is_empty());
        Ok(())
    }

    #[test]
    fn test_process__threshold_and_final_reports_both_emitted() -> TestResult {
        let dir = tempfile::tempdir()?;
        let lines: Vec<String> = (0..10_000).map(|_| "http://ok/".to_string()).collect();
        let path = write_gz(&dir, "big.gz", &lines)?;
        let prober = ScriptedProber::with(&[("http://ok/", ProbeOutcome::Success)]);
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 1, &prober, &sink)?;

        let reports = scheduler.process(&[path]);

        assert_eq!(reports[0].snapshot.total(), 10_000);
        let full = "File: big.gz called 10000 URLs successfully, and 0 URLs unsuccessfully out of 10000 total calls.";
        let matching = sink.lines().iter().filter(|l| l.as_str() == full).count();
        assert!(matching >= 2, "expected threshold and final report, got {matching}");
        Ok(())
    }

    #[test]
    fn test_process__corrupt_file_does_not_stop_batch() -> TestResult {
        let dir = tempfile::tempdir()?;
        let bad = dir.path().join("bad.gz");
        std::fs::write(&bad, b"this is not gzip")?;
        let good = write_gz(&dir, "good.gz", &strings(&["http://ok/", "http://ok/"]))?;
        let prober = ScriptedProber::with(&[("http://ok/", ProbeOutcome::Success)]);
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 2, &prober, &sink)?;

        let reports = scheduler.process(&[bad, good]);

        assert_eq!(reports[0].status, JobStatus::Aborted);
        assert_eq!(reports[0].snapshot.total(), 0);
        assert_eq!(reports[1].status, JobStatus::Completed);
        assert_eq!(reports[1].snapshot.successes, 2);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 2);

        let lines = sink.lines();
        assert!(lines.contains(&"Error processing lines in file: bad.gz".to_string()));
        assert!(lines.contains(
            &"File: bad.gz called 0 URLs successfully, and 0 URLs unsuccessfully out of 0 total calls."
                .to_string()
        ));
        assert!(lines.iter().any(|l| l.starts_with("Done processing bad.gz.")));
        assert!(lines.iter().any(|l| l.starts_with("Done processing good.gz.")));
        Ok(())
    }

    #[test]
    fn test_process__missing_file_is_aborted() -> TestResult {
        let dir = tempfile::tempdir()?;
        let prober = ScriptedProber::default();
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 1, &prober, &sink)?;

        let reports = scheduler.process(&[dir.path().join("gone.gz")]);

        assert!(reports[0].is_aborted());
        assert_eq!(sink.lines()[0], "Error processing lines in file: gone.gz");
        Ok(())
    }

    #[test]
    fn test_process__truncated_file_keeps_completed_counts() -> TestResult {
        let dir = tempfile::tempdir()?;
        let lines: Vec<String> = (0..5_000).map(|i| format!("http://host/{i}")).collect();
        let full = write_gz(&dir, "full.gz", &lines)?;
        let mut bytes = std::fs::read(&full)?;
        bytes.truncate(bytes.len() - 16);
        let cut = dir.path().join("cut.gz");
        std::fs::write(&cut, bytes)?;
        let prober = ScriptedProber::default();
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 1, &prober, &sink)?;

        let reports = scheduler.process(&[cut]);

        assert!(reports[0].is_aborted());
        assert!(reports[0].snapshot.total() <= 5_000);
        assert_eq!(
            reports[0].snapshot.total() as usize,
            prober.calls.load(Ordering::SeqCst)
        );
        assert!(sink.lines().contains(&"Error processing lines in file: cut.gz".to_string()));
        Ok(())
    }

    #[test]
    fn test_process__counts_survive_concurrency() -> TestResult {
        let dir = tempfile::tempdir()?;
        let lines: Vec<String> = (0..3_000)
            .map(|i| match i % 3 {
                0 => "http://ok/".to_string(),
                1 => "http://err/".to_string(),
                _ => "garbage".to_string(),
            })
            .collect();
        let a = write_gz(&dir, "a.gz", &lines)?;
        let b = write_gz(&dir, "b.gz", &lines)?;
        let prober = ScriptedProber::with(&[("http://ok/", ProbeOutcome::Success)]);
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 2, &prober, &sink)?
            .with_report_interval(100);

        let reports = scheduler.process(&[a, b]);

        for report in &reports {
            assert_eq!(report.snapshot.successes, 1_000);
            assert_eq!(report.snapshot.failures, 2_000);
        }
        for line in sink.lines().iter().filter(|l| l.starts_with("File: ")) {
            let total: u64 = line
                .trim_end_matches(" total calls.")
                .rsplit(' ')
                .next()
                .and_then(|n| n.parse().ok())
                .expect("report ends with a total");
            assert_eq!(total % 100, 0, "unexpected report: {line}");
        }
        Ok(())
    }

    #[test]
    fn test_from_config__sizes_pool_and_interval() -> TestResult {
        let config = Config {
            workers_per_file: Some(2),
            report_interval: Some(7),
            ..Default::default()
        };
        let prober = ScriptedProber::default();
        let sink = MemorySink::new();

        let scheduler = Scheduler::from_config(&config, 3, &prober, &sink)?;

        assert_eq!(scheduler.pool_width(), 6);
        assert_eq!(scheduler.report_interval, 7);
        assert_eq!(scheduler.in_flight, 2);
        Ok(())
    }

    /// Sleeps per line, longer for hosts named `slow`, and tracks peak concurrency.
    #[derive(Default)]
    struct SleepyProber {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Probe for SleepyProber {
        fn probe(&self, line: &str) -> ProbeOutcome {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let pause = if line.contains("slow") { 300 } else { 1 };
            std::thread::sleep(Duration::from_millis(pause));
            self.active.fetch_sub(1, Ordering::SeqCst);
            ProbeOutcome::Success
        }
    }

    #[test]
    fn test_process__fast_file_does_not_wait_for_slow_sibling() -> TestResult {
        let dir = tempfile::tempdir()?;
        let slow = write_gz(&dir, "slow.gz", &strings(&["http://slow/"; 4]))?;
        let fast = write_gz(&dir, "fast.gz", &strings(&["http://fast/"; 8]))?;
        let prober = SleepyProber::default();
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 2, &prober, &sink)?;

        let reports = scheduler.process(&[slow, fast]);

        assert_eq!(reports[0].snapshot.total(), 4);
        assert_eq!(reports[1].snapshot.total(), 8);
        assert!(reports[0].elapsed >= Duration::from_millis(300));
        assert!(
            reports[1].elapsed < Duration::from_millis(150),
            "fast file took {:?}",
            reports[1].elapsed
        );

        let lines = sink.lines();
        let fast_done = lines.iter().position(|l| l.starts_with("Done processing fast.gz."));
        let slow_done = lines.iter().position(|l| l.starts_with("Done processing slow.gz."));
        assert!(
            fast_done.is_some() && fast_done < slow_done,
            "unexpected order: {lines:?}"
        );
        Ok(())
    }

    #[test]
    fn test_process__file_keeps_to_its_share_of_the_pool() -> TestResult {
        let dir = tempfile::tempdir()?;
        let lines: Vec<String> = (0..40).map(|i| format!("http://host/{i}")).collect();
        let path = write_gz(&dir, "a.gz", &lines)?;
        let prober = SleepyProber::default();
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::new(8, 4), 1, &prober, &sink)?
            .with_in_flight(3);

        let reports = scheduler.process(&[path]);

        assert_eq!(reports[0].snapshot.total(), 40);
        assert!(prober.peak.load(Ordering::SeqCst) <= 3);
        Ok(())
    }

    #[test]
    fn test_process_file__runs_outside_process() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = write_gz(&dir, "one.gz", &strings(&["http://ok/"]))?;
        let prober = ScriptedProber::with(&[("http://ok/", ProbeOutcome::Success)]);
        let sink = MemorySink::new();
        let scheduler = Scheduler::for_batch(&PoolSizing::default(), 1, &prober, &sink)?;

        let report = scheduler.process_file(&path);

        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.snapshot.successes, 1);
        Ok(())
    }
}
