//! Error types for the DDNS synchronizer
//!
//! Every failure is fatal to a run: the engine reports it and hands it back
//! to the entry point, which prints it and exits non-zero.

use thiserror::Error;

/// Boxed underlying cause carried by some variants
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing keys, unreadable file, unknown provider)
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Cause>,
    },

    /// A config line that could not be split into one `key=value` pair
    #[error("invalid config value [line {line}]: {content}")]
    ConfigLine {
        /// 1-based line number
        line: usize,
        /// The offending line, comment stripped
        content: String,
    },

    /// The provider rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message, including the provider's own message when present
        message: String,
    },

    /// Address discovery failures (unreachable service, unparseable page)
    #[error("Network error: {message}")]
    Network {
        /// Human-readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Cause>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a configuration error wrapping an underlying cause
    pub fn config_with(msg: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(source.into()),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a network error wrapping an underlying cause
    pub fn network_with(msg: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(source.into()),
        }
    }

    /// The message without the category prefix of `Display`
    pub fn message(&self) -> String {
        match self {
            Self::Config { message, .. } | Self::Network { message, .. } => message.clone(),
            Self::Provider { message, .. } => message.clone(),
            Self::Authentication(message) => message.clone(),
            Self::ConfigLine { .. } => self.to_string(),
        }
    }
}
