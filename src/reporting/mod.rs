//! Statistics and reporting
//!
//! This module holds the per-file counters, the sinks report lines are
//! written to, and structured logging for the application.

pub mod logging;
pub mod sink;
pub mod stats;

// Re-export commonly used items
pub use sink::{MemorySink, ReportSink, StdoutSink};
pub use stats::{FileStatistics, StatsSnapshot};
