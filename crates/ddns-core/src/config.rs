//! Configuration types for the DDNS synchronizer
//!
//! A run is configured from a small line-oriented `key=value` file:
//!
//! ```text
//! # ~/.ddns_godaddyrc
//! username=myuser
//! key=mykey        # or password=...
//! domains=example.com,example.org
//! ```
//!
//! `#` starts a comment, blank lines are ignored, and every other line must
//! contain exactly one `=`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported DNS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// GoDaddy REST API
    GoDaddy,
    /// Cloudflare API v4
    Cloudflare,
}

impl ProviderKind {
    /// All supported providers, in CLI help order
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Cloudflare, ProviderKind::GoDaddy];

    /// Canonical lowercase name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::GoDaddy => "godaddy",
            ProviderKind::Cloudflare => "cloudflare",
        }
    }

    /// Default system-log identifier (`ddns_<provider>`)
    pub fn syslog_ident(&self) -> String {
        format!("ddns_{}", self.name())
    }

    /// Default config file name, relative to the home directory
    pub fn config_file_name(&self) -> String {
        format!(".ddns_{}rc", self.name())
    }

    /// Default config path (`$HOME/.ddns_<provider>rc`)
    pub fn default_config_path(&self) -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::config("cannot determine home directory; pass --confpath"))?;
        Ok(home.join(self.config_file_name()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::config(format!("unknown dns provider: {}", s)))
    }
}

/// Provider login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name, account email or API key id
    pub identity: String,
    /// Password, API key or API secret
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

// Custom Debug implementation that hides the secret
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// Main DDNS configuration, built once per run
#[derive(Debug, Clone)]
pub struct DdnsConfig {
    /// Provider the credentials belong to
    pub provider: ProviderKind,

    /// Provider credentials
    pub credentials: Credentials,

    /// Domains to synchronize, in file order
    pub domains: Vec<String>,
}

/// Outcome of parsing one config line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine<'a> {
    /// Blank or comment-only line
    Blank,
    /// A `key=value` pair, both sides trimmed
    Entry { key: &'a str, value: &'a str },
}

impl<'a> ConfigLine<'a> {
    /// Parse a single line; `line_no` is 1-based and only used for errors
    pub fn parse(raw: &'a str, line_no: usize) -> Result<Self> {
        let line = raw.trim();
        let line = match line.find('#') {
            Some(i) => line[..i].trim_end(),
            None => line,
        };
        if line.is_empty() {
            return Ok(ConfigLine::Blank);
        }

        let mut parts = line.split('=');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Ok(ConfigLine::Entry {
                key: key.trim(),
                value: value.trim(),
            }),
            _ => Err(Error::ConfigLine {
                line: line_no,
                content: line.to_string(),
            }),
        }
    }
}

impl DdnsConfig {
    /// Create a configuration directly
    pub fn new(provider: ProviderKind, credentials: Credentials, domains: Vec<String>) -> Self {
        Self {
            provider,
            credentials,
            domains,
        }
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>, provider: ProviderKind) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config_with(format!("error reading {} ({})", path.display(), e), e)
        })?;
        tracing::debug!("Loaded config file {}", path.display());
        Self::parse(&text, provider)
    }

    /// Parse configuration from `key=value` text
    pub fn parse(text: &str, provider: ProviderKind) -> Result<Self> {
        let mut props: HashMap<&str, &str> = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            if let ConfigLine::Entry { key, value } = ConfigLine::parse(raw, idx + 1)? {
                props.insert(key, value);
            }
        }

        for key in props.keys() {
            if !matches!(*key, "username" | "key" | "password" | "domains") {
                tracing::debug!("Ignoring unknown config key: {}", key);
            }
        }

        let identity = props
            .get("username")
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("no username configured"))?;

        let secret = ["key", "password"]
            .iter()
            .filter_map(|k| props.get(k).copied())
            .find(|v| !v.is_empty())
            .ok_or_else(|| Error::config("no key configured"))?;

        let domains = parse_domains(props.get("domains").copied().unwrap_or_default());
        if domains.is_empty() {
            return Err(Error::config("no domains configured"));
        }

        Ok(Self::new(provider, Credentials::new(identity, secret), domains))
    }
}

/// Split a comma-separated domain list, dropping empty entries
fn parse_domains(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
