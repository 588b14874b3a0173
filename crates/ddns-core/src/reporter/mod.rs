//! Run reporter
//!
//! Operator-facing log lines for a run. A [`Reporter`] fans each message out
//! to zero or more [`ReportSink`]s. Delivery never fails from the caller's
//! point of view: a sink that errors is traced and skipped, and the other
//! sinks still receive the message.
//!
//! ```rust
//! use ddns_core::reporter::{MemorySink, Reporter};
//!
//! let sink = MemorySink::new();
//! let reporter = Reporter::new().with_sink(sink.clone());
//! reporter.log("router wan ip is 203.0.113.5");
//! assert_eq!(sink.logs(), vec!["router wan ip is 203.0.113.5"]);
//! ```

pub mod console;
pub mod memory;
pub mod syslog;

pub use console::ConsoleSink;
pub use memory::{MemorySink, Severity};
pub use syslog::SyslogSink;

use std::io;

/// Destination for report lines
pub trait ReportSink: Send + Sync {
    /// Deliver an informational line
    fn log(&self, message: &str) -> io::Result<()>;

    /// Deliver an error line
    fn error(&self, message: &str) -> io::Result<()>;

    /// Short sink name used in diagnostics
    fn name(&self) -> &'static str;
}

/// Fan-out reporter handed to the engine
#[derive(Default)]
pub struct Reporter {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Reporter {
    /// Create a reporter with no sinks (all messages are dropped)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Add a boxed sink
    pub fn add_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    /// Number of configured sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Report an informational line
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "ddns::report", "{}", message);
        for sink in &self.sinks {
            if let Err(e) = sink.log(message) {
                tracing::warn!("Report sink {} failed: {}", sink.name(), e);
            }
        }
    }

    /// Report an error line
    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::error!(target: "ddns::report", "{}", message);
        for sink in &self.sinks {
            if let Err(e) = sink.error(message) {
                tracing::warn!("Report sink {} failed: {}", sink.name(), e);
            }
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("Reporter").field("sinks", &names).finish()
    }
}
