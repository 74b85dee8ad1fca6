use std::sync::Mutex;

/// Destination for report lines.
///
/// Called concurrently from every worker; each call writes one whole line.
pub trait ReportSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes report lines to standard output.
#[derive(Default, Debug)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Keeps report lines in memory, in emission order.
#[derive(Default, Debug)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &S {
    fn emit(&self, line: &str) {
        (**self).emit(line);
    }
}
