// # In-Memory Report Sink
//
// Captures report lines for inspection. Clones share the same buffer, so a
// test can keep one handle and give the other to the reporter.

use super::ReportSink;
use std::io;
use std::sync::{Arc, Mutex};

/// Severity of a captured line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Log,
    Error,
}

/// In-memory sink (not persistent)
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(Severity, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, in delivery order
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Captured informational lines
    pub fn logs(&self) -> Vec<String> {
        self.filtered(Severity::Log)
    }

    /// Captured error lines
    pub fn errors(&self) -> Vec<String> {
        self.filtered(Severity::Error)
    }

    fn filtered(&self, severity: Severity) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, severity: Severity, message: &str) -> io::Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?;
        lines.push((severity, message.to_string()));
        Ok(())
    }
}

impl ReportSink for MemorySink {
    fn log(&self, message: &str) -> io::Result<()> {
        self.push(Severity::Log, message)
    }

    fn error(&self, message: &str) -> io::Result<()> {
        self.push(Severity::Error, message)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();

        sink.log("a").unwrap();
        sink.error("b").unwrap();

        assert_eq!(
            handle.lines(),
            vec![
                (Severity::Log, "a".to_string()),
                (Severity::Error, "b".to_string())
            ]
        );
    }
}
