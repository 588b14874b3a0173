//! Console sink: log lines to stdout, error lines to stderr

use super::ReportSink;
use std::io::{self, Write};

/// Writes report lines to the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for ConsoleSink {
    fn log(&self, message: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", message)?;
        out.flush()
    }

    fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{}", message)
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
