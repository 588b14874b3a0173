// # System Log Sink
//
// Sends report lines to the local syslog daemon under a fixed identifier
// with facility LOG_USER. Informational lines go out at LOG_NOTICE, errors
// at LOG_ERR.
//
// Each sink owns its own connection to the log socket, so sinks can be
// opened and dropped independently.
//
// Only available on Unix; `SyslogSink::open` fails elsewhere.

use super::ReportSink;
use std::io;

#[cfg(unix)]
use std::sync::Mutex;
#[cfg(unix)]
use syslog::{Facility, Formatter3164, Logger, LoggerBackend};

/// syslog(3)-style sink
pub struct SyslogSink {
    /// Program identifier shown in each log line
    ident: String,

    #[cfg(unix)]
    logger: Mutex<Logger<LoggerBackend, Formatter3164>>,
}

impl std::fmt::Debug for SyslogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyslogSink")
            .field("ident", &self.ident)
            .finish()
    }
}

impl SyslogSink {
    /// The identifier the sink logs under
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

/// RFC 3164 header fields for `ident`
#[cfg(unix)]
fn formatter(ident: &str) -> Formatter3164 {
    Formatter3164 {
        facility: Facility::LOG_USER,
        hostname: None,
        process: ident.to_string(),
        pid: std::process::id(),
    }
}

#[cfg(unix)]
fn to_io(e: syslog::Error) -> io::Error {
    io::Error::other(e.to_string())
}

#[cfg(unix)]
impl SyslogSink {
    /// Connect to the local syslog socket with `ident` as the program identifier
    pub fn open(ident: &str) -> io::Result<Self> {
        let logger = syslog::unix(formatter(ident)).map_err(to_io)?;

        tracing::debug!("Opened syslog with ident {}", ident);
        Ok(Self {
            ident: ident.to_string(),
            logger: Mutex::new(logger),
        })
    }

    fn with_logger(
        &self,
        write: impl FnOnce(&mut Logger<LoggerBackend, Formatter3164>) -> syslog::Result<()>,
    ) -> io::Result<()> {
        let mut logger = self
            .logger
            .lock()
            .map_err(|_| io::Error::other("syslog logger lock poisoned"))?;
        write(&mut logger).map_err(to_io)
    }
}

#[cfg(unix)]
impl ReportSink for SyslogSink {
    fn log(&self, message: &str) -> io::Result<()> {
        self.with_logger(|logger| logger.notice(message))
    }

    fn error(&self, message: &str) -> io::Result<()> {
        self.with_logger(|logger| logger.err(message))
    }

    fn name(&self) -> &'static str {
        "syslog"
    }
}

#[cfg(not(unix))]
impl SyslogSink {
    /// The system log is not available on this platform
    pub fn open(_ident: &str) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "syslog is only available on unix platforms",
        ))
    }
}

#[cfg(not(unix))]
impl ReportSink for SyslogSink {
    fn log(&self, _message: &str) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn error(&self, _message: &str) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn name(&self) -> &'static str {
        "syslog"
    }
}
