//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Point the A records of your domains at this host's public address
#[derive(Debug, Parser)]
#[command(name = "ddns", version, about)]
pub struct Args {
    /// DNS provider to update (godaddy | cloudflare)
    pub provider: String,

    /// Print run lines to stdout/stderr
    #[arg(short = 'l', long = "log")]
    pub log: bool,

    /// Send run lines to the system log, optionally under IDENT
    /// (default: ddns_<provider>)
    #[arg(
        short = 'L',
        long = "syslog",
        value_name = "IDENT",
        num_args = 0..=1
    )]
    pub syslog: Option<Option<String>>,

    /// Configuration file (default: ~/.ddns_<provider>rc)
    #[arg(short = 'c', long = "confpath", value_name = "PATH")]
    pub confpath: Option<PathBuf>,

    /// Compare records but do not change them
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Address discovery page to query
    #[arg(long = "ip-url", value_name = "URL")]
    pub ip_url: Option<String>,
}

impl Args {
    /// Syslog identifier to use, if syslog output was requested
    pub fn syslog_ident(&self, default: &str) -> Option<String> {
        self.syslog
            .as_ref()
            .map(|ident| ident.clone().unwrap_or_else(|| default.to_string()))
    }
}
