// # DNS Provider Trait
//
// Defines the capability set every supported DNS provider implements:
// authenticate, list the records of a domain, update one record.
//
// ## Implementations
//
// - GoDaddy: `ddns-provider-godaddy` crate
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let mut session = provider.authenticate(&credentials).await?;
// for record in provider.list_records(&mut session, "example.com").await? {
//     if provider.is_eligible(&record) && record.value != "203.0.113.5" {
//         provider.update_record(&mut session, "example.com", &record, "203.0.113.5").await?;
//     }
// }
// ```

use crate::config::Credentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A DNS record as reported by a provider, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-specific record identifier
    pub id: String,
    /// Record type ("A", "AAAA", "TXT", ...)
    pub record_type: String,
    /// Host label ("@") or fully-qualified name, as the provider reports it
    pub name: String,
    /// Current record content
    pub value: String,
    /// Time-to-live, if the provider reports one
    pub ttl: Option<u32>,
    /// Provider-specific fields that must be echoed back on update
    #[serde(default)]
    pub extra: serde_json::Value,
}

impl DnsRecord {
    /// Create a record with no TTL and no extra fields
    pub fn new(
        id: impl Into<String>,
        record_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            name: name.into(),
            value: value.into(),
            ttl: None,
            extra: serde_json::Value::Null,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set provider-specific extra fields
    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = extra;
        self
    }

    /// Whether the record already points at `address`
    pub fn points_to(&self, address: &IpAddr) -> bool {
        self.value == address.to_string()
    }
}

/// Trait for DNS provider implementations
///
/// Providers are thin adapters over a remote API. They execute exactly the
/// calls they are asked for and report failures; the engine decides what
/// to compare, when to update, and when to abort.
///
/// # Errors
///
/// - `authenticate` returns `Error::Authentication` when credentials are
///   rejected.
/// - `list_records` and `update_record` return `Error::Provider` on transport
///   errors or non-success responses, including the provider's own
///   status/message text when the response carries one.
///
/// Providers must not retry. A failed run is retried by the scheduler that
/// invoked it.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Authenticated context returned by [`DnsProvider::authenticate`]
    ///
    /// Owned by the engine for the duration of one run and passed back to
    /// every subsequent call. Providers may cache lookups in it.
    type Session: Send;

    /// Log in with the configured credentials
    async fn authenticate(&self, credentials: &Credentials)
    -> Result<Self::Session, crate::Error>;

    /// List the records of `domain`, in the order the provider returns them
    async fn list_records(
        &self,
        session: &mut Self::Session,
        domain: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Point `record` at `new_value`
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The provider applied the change
    /// - `Ok(false)`: The provider declined without giving a reason
    /// - `Err(Error)`: The call failed
    async fn update_record(
        &self,
        session: &mut Self::Session,
        domain: &str,
        record: &DnsRecord,
        new_value: &str,
    ) -> Result<bool, crate::Error>;

    /// Whether `record` is a candidate for comparison and update
    ///
    /// Each provider keeps its own policy; they are deliberately not unified.
    fn is_eligible(&self, record: &DnsRecord) -> bool;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_compares_textual_address() {
        let record = DnsRecord::new("1", "A", "@", "203.0.113.5");
        assert!(record.points_to(&IpAddr::from([203, 0, 113, 5])));
        assert!(!record.points_to(&IpAddr::from([198, 51, 100, 1])));
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let record = DnsRecord::new("1", "A", "@", "203.0.113.5")
            .with_ttl(600)
            .with_extra(serde_json::json!({ "proxied": true }));

        assert_eq!(record.ttl, Some(600));
        assert_eq!(record.extra["proxied"], true);
    }
}
