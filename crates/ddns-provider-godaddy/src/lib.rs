// # GoDaddy DNS Provider
//
// This crate provides a GoDaddy DNS provider implementation for the DDNS
// synchronizer.
//
// ## Behaviour
//
// - Only the apex record (host label `@`) of each domain is eligible.
// - The existing TTL is kept on update.
// - One HTTP request per capability call; no retries.
//
// ## Credentials
//
// `username` is the API key and `key`/`password` is the API secret, sent as
// `Authorization: sso-key <key>:<secret>`. The secret never appears in logs
// or error messages.
//
// ## API Reference
//
// - GoDaddy Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - List domains: GET `/v1/domains?limit=1` (credential check)
// - List A records: GET `/v1/domains/:domain/records/A`
// - Replace records: PUT `/v1/domains/:domain/records/A/:name`

use async_trait::async_trait;
use ddns_core::config::Credentials;
use ddns_core::traits::{DnsProvider, DnsRecord};
use ddns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// GoDaddy API base URL
const GODADDY_API_BASE: &str = "https://api.godaddy.com";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Host label of the apex record
const APEX: &str = "@";

/// Record type this provider manages
const RECORD_TYPE: &str = "A";

/// GoDaddy DNS record as returned by the API
#[derive(Debug, Clone, Deserialize)]
struct GdRecord {
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    data: String,
    #[serde(default)]
    ttl: Option<u32>,
}

impl From<GdRecord> for DnsRecord {
    fn from(r: GdRecord) -> Self {
        let id = format!("{}/{}", r.record_type, r.name);
        let mut record = DnsRecord::new(id, r.record_type, r.name, r.data);
        record.ttl = r.ttl;
        record
    }
}

/// Body element of a record replacement request
#[derive(Debug, Serialize)]
struct GdRecordUpdate<'a> {
    data: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

/// GoDaddy error body (`{"code": "...", "message": "..."}`)
#[derive(Debug, Default, Deserialize)]
struct GdError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GdError {
    /// Render the error body for humans, falling back to the raw text
    fn describe(body: &str) -> String {
        match serde_json::from_str::<GdError>(body) {
            Ok(GdError {
                code: Some(code),
                message: Some(message),
            }) => format!("{}: {}", code, message),
            Ok(GdError {
                message: Some(message),
                ..
            }) => message,
            _ if body.trim().is_empty() => "no details".to_string(),
            _ => body.trim().to_string(),
        }
    }
}

/// Authenticated GoDaddy context
pub struct GoDaddySession {
    /// Value of the `Authorization` header
    authorization: String,
}

// Custom Debug implementation that hides the API secret
impl std::fmt::Debug for GoDaddySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddySession")
            .field("authorization", &"<REDACTED>")
            .finish()
    }
}

/// GoDaddy DNS provider
#[derive(Debug, Clone)]
pub struct GoDaddyProvider {
    /// API base URL
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl Default for GoDaddyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GoDaddyProvider {
    /// Create a provider against the production API
    pub fn new() -> Self {
        Self::with_base_url(GODADDY_API_BASE)
    }

    /// Create a provider against a different API root (OTE or tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to a provider error
    async fn status_error(response: reqwest::Response, context: &str) -> Error {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let detail = GdError::describe(&body);

        match status.as_u16() {
            429 => Error::provider(
                "godaddy",
                format!("{}. Rate limit exceeded ({}): {}", context, status, detail),
            ),
            500..=599 => Error::provider(
                "godaddy",
                format!("{}. GoDaddy server error ({}): {}", context, status, detail),
            ),
            _ => Error::provider("godaddy", format!("{}. Msg: {} ({})", context, detail, status)),
        }
    }
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    type Session = GoDaddySession;

    /// Check the API key pair against the domains endpoint
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/domains?limit=1
    /// Authorization: sso-key <key>:<secret>
    /// ```
    async fn authenticate(&self, credentials: &Credentials) -> Result<GoDaddySession> {
        let session = GoDaddySession {
            authorization: format!("sso-key {}:{}", credentials.identity, credentials.secret),
        };

        let response = self
            .client
            .get(self.url("/v1/domains"))
            .query(&[("limit", "1")])
            .header("Authorization", &session.authorization)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::provider("godaddy", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if matches!(status.as_u16(), 401 | 403) {
            tracing::debug!("GoDaddy rejected credentials: {}", status);
            return Err(Error::auth(format!(
                "godaddy login failure for {}",
                credentials.identity
            )));
        }
        if !status.is_success() {
            return Err(Self::status_error(response, "godaddy login check failed").await);
        }

        Ok(session)
    }

    /// List the A records of `domain`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/domains/example.com/records/A
    /// ```
    async fn list_records(
        &self,
        session: &mut GoDaddySession,
        domain: &str,
    ) -> Result<Vec<DnsRecord>> {
        let context = format!("failed to load dns records for {}", domain);
        let url = self.url(&format!("/v1/domains/{}/records/{}", domain, RECORD_TYPE));
        tracing::debug!("Listing GoDaddy records: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &session.authorization)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                Error::provider("godaddy", format!("{}. HTTP request failed: {}", context, e))
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &context).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                Error::provider(
                    "godaddy",
                    format!("{}. Failed to read response: {}", context, e),
                )
            })?;

        let items: Vec<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(
                "godaddy",
                format!("{}. Invalid response format: {}", context, e),
            )
        })?;

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<GdRecord>(item.clone())
                    .map(DnsRecord::from)
                    .map_err(|_| {
                        Error::provider(
                            "godaddy",
                            format!("could not interpret godaddy response\n{}\n", item),
                        )
                    })
            })
            .collect()
    }

    /// Replace the record's data, keeping its TTL
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v1/domains/example.com/records/A/@
    /// [{ "data": "203.0.113.5", "ttl": 600 }]
    /// ```
    async fn update_record(
        &self,
        session: &mut GoDaddySession,
        domain: &str,
        record: &DnsRecord,
        new_value: &str,
    ) -> Result<bool> {
        let context = format!("failed to update {} dns record", domain);
        let url = self.url(&format!(
            "/v1/domains/{}/records/{}/{}",
            domain, record.record_type, record.name
        ));
        let payload = [GdRecordUpdate {
            data: new_value,
            ttl: record.ttl,
        }];

        let response = self
            .client
            .put(&url)
            .header("Authorization", &session.authorization)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                Error::provider("godaddy", format!("{}. HTTP request failed: {}", context, e))
            })?;

        if !response.status().is_success() {
            return Err(Self::status_error(response, &context).await);
        }

        tracing::debug!("GoDaddy record {} of {} now {}", record.name, domain, new_value);
        Ok(true)
    }

    fn is_eligible(&self, record: &DnsRecord) -> bool {
        record.name == APEX
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}
