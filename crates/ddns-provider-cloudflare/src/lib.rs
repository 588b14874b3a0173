// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the DDNS
// synchronizer.
//
// ## Behaviour
//
// - Every record of type `A` is eligible, whatever its host label.
// - Zone ids are looked up once per domain and cached in the session.
// - Record listing follows pagination until the last page.
// - Updates echo the existing name, TTL and proxied flag.
// - One HTTP request per capability call (plus pagination); no retries.
//
// ## Credentials
//
// `username` is the account email and `key`/`password` the global API key,
// sent as `X-Auth-Email` / `X-Auth-Key`. The key never appears in logs or
// error messages.
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify user: GET `/user`
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?per_page=100&page=N`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::config::Credentials;
use ddns_core::traits::{DnsProvider, DnsRecord};
use ddns_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per page
const PAGE_SIZE: u32 = 100;

/// Record type this provider manages
const RECORD_TYPE: &str = "A";

/// Standard v4 response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
}

/// DNS record as returned by the API
#[derive(Debug, Deserialize)]
struct CfRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    proxied: Option<bool>,
}

impl From<CfRecord> for DnsRecord {
    fn from(r: CfRecord) -> Self {
        let mut record = DnsRecord::new(r.id, r.record_type, r.name, r.content);
        record.ttl = r.ttl;
        if let Some(proxied) = r.proxied {
            record.extra = serde_json::json!({ "proxied": proxied });
        }
        record
    }
}

/// Body of a record update request
#[derive(Debug, Serialize)]
struct CfRecordUpdate<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

/// Render the envelope's error list
fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no details".to_string();
    }
    errors
        .iter()
        .map(|e| match e.code {
            Some(code) => format!("{} ({})", e.message, code),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decode one listed record
///
/// Records of other types are only passed through when they decode; one
/// that does not is skipped. An `A` record that does not decode is an error.
fn decode_record(item: Value) -> Result<Option<DnsRecord>> {
    let is_a = item.get("type").and_then(Value::as_str) == Some(RECORD_TYPE);

    match serde_json::from_value::<CfRecord>(item.clone()) {
        Ok(record) => Ok(Some(record.into())),
        Err(e) if !is_a && item.get("type").is_some() => {
            tracing::debug!("Skipping undecodable non-A record: {}", e);
            Ok(None)
        }
        Err(_) => Err(Error::provider(
            "cloudflare",
            format!("could not interpret cloudflare response\n{}\n", item),
        )),
    }
}

/// Authenticated Cloudflare context
pub struct CloudflareSession {
    email: String,
    api_key: String,

    /// Zone id per domain, filled on first listing
    zones: HashMap<String, String>,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareSession")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("zones", &self.zones)
            .finish()
    }
}

impl CloudflareSession {
    /// Cached zone id for `domain`, if it has been looked up
    pub fn zone_id(&self, domain: &str) -> Option<&str> {
        self.zones.get(domain).map(String::as_str)
    }
}

/// Cloudflare DNS provider
#[derive(Debug, Clone)]
pub struct CloudflareProvider {
    /// API base URL
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl Default for CloudflareProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CloudflareProvider {
    /// Create a provider against the production API
    pub fn new() -> Self {
        Self::with_base_url(CLOUDFLARE_API_BASE)
    }

    /// Create a provider against a different API root (tests)
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

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        email: &str,
        api_key: &str,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("X-Auth-Email", email)
            .header("X-Auth-Key", api_key)
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the v4 envelope
    ///
    /// Non-2xx responses and `success: false` envelopes become provider
    /// errors prefixed with `context`. The one exception is a 2xx
    /// `success: false` with no errors, which is returned as-is so the
    /// caller can decide.
    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Envelope<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| {
                Error::provider(
                    "cloudflare",
                    format!("{}. HTTP request failed: {}", context, e),
                )
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        let envelope = serde_json::from_str::<Envelope<T>>(&body);

        if !status.is_success() {
            let detail = match &envelope {
                Ok(env) => describe_errors(&env.errors),
                Err(_) => body.trim().to_string(),
            };
            return Err(match status.as_u16() {
                429 => Error::provider(
                    "cloudflare",
                    format!("{}. Rate limit exceeded ({}): {}", context, status, detail),
                ),
                500..=599 => Error::provider(
                    "cloudflare",
                    format!("{}. Cloudflare server error ({}): {}", context, status, detail),
                ),
                _ => Error::provider("cloudflare", format!("{}. Msg: {}", context, detail)),
            });
        }

        let envelope = envelope.map_err(|_| {
            Error::provider(
                "cloudflare",
                format!("could not interpret cloudflare response\n{}\n", body),
            )
        })?;

        if !envelope.success && !envelope.errors.is_empty() {
            return Err(Error::provider(
                "cloudflare",
                format!("{}. Msg: {}", context, describe_errors(&envelope.errors)),
            ));
        }

        Ok(envelope)
    }

    /// Zone id for `domain`, from the session cache or the zones endpoint
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// ```
    async fn zone_id(&self, session: &mut CloudflareSession, domain: &str) -> Result<String> {
        if let Some(id) = session.zones.get(domain) {
            tracing::debug!("Using cached zone ID for {}", domain);
            return Ok(id.clone());
        }

        let context = format!("failed to load dns records for {}", domain);
        let request = self
            .request(reqwest::Method::GET, "/zones", &session.email, &session.api_key)
            .query(&[("name", domain)]);

        let envelope: Envelope<Vec<Zone>> = Self::send(request, &context).await?;
        let zone = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::provider("cloudflare", format!("{}. Msg: zone not found", context))
            })?;

        tracing::debug!("Found zone ID for {}: {}", domain, zone.id);
        session.zones.insert(domain.to_string(), zone.id.clone());
        Ok(zone.id)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    type Session = CloudflareSession;

    /// Verify the email/key pair
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /user
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn authenticate(&self, credentials: &Credentials) -> Result<CloudflareSession> {
        let session = CloudflareSession {
            email: credentials.identity.clone(),
            api_key: credentials.secret.clone(),
            zones: HashMap::new(),
        };

        let response = self
            .request(reqwest::Method::GET, "/user", &session.email, &session.api_key)
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let success = response
            .json::<Envelope<Value>>()
            .await
            .map(|env| env.success)
            .unwrap_or(false);

        if !status.is_success() || !success {
            tracing::debug!("Cloudflare rejected credentials: {}", status);
            return Err(Error::auth(format!(
                "could not login to cloudflare with {}",
                credentials.identity
            )));
        }

        Ok(session)
    }

    /// List every DNS record of `domain`, across all pages
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?per_page=100&page=1
    /// ```
    async fn list_records(
        &self,
        session: &mut CloudflareSession,
        domain: &str,
    ) -> Result<Vec<DnsRecord>> {
        let zone_id = self.zone_id(session, domain).await?;
        let context = format!("failed to load dns records for {}", domain);
        let path = format!("/zones/{}/dns_records", zone_id);

        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self
                .request(reqwest::Method::GET, &path, &session.email, &session.api_key)
                .query(&[("per_page", PAGE_SIZE), ("page", page)]);

            let envelope: Envelope<Vec<Value>> = Self::send(request, &context).await?;
            if !envelope.success {
                return Err(Error::provider(
                    "cloudflare",
                    format!("{}. Msg: {}", context, describe_errors(&envelope.errors)),
                ));
            }

            let items = envelope.result.unwrap_or_default();
            if items.is_empty() {
                break;
            }
            for item in items {
                if let Some(record) = decode_record(item)? {
                    records.push(record);
                }
            }

            // Local counter; result_info.page may be absent
            match envelope.result_info {
                Some(info) if page < info.total_pages => page += 1,
                _ => break,
            }
        }

        tracing::debug!("Listed {} Cloudflare records for {}", records.len(), domain);
        Ok(records)
    }

    /// Point the record at `new_value`, echoing its other fields
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type": "A", "name": "example.com", "content": "203.0.113.5", "ttl": 1, "proxied": false}
    /// ```
    async fn update_record(
        &self,
        session: &mut CloudflareSession,
        domain: &str,
        record: &DnsRecord,
        new_value: &str,
    ) -> Result<bool> {
        let zone_id = self.zone_id(session, domain).await?;
        let context = format!("failed to update {} dns record", domain);
        let path = format!("/zones/{}/dns_records/{}", zone_id, record.id);

        let payload = CfRecordUpdate {
            record_type: RECORD_TYPE,
            name: &record.name,
            content: new_value,
            ttl: record.ttl,
            proxied: record.extra.get("proxied").and_then(Value::as_bool),
        };

        let request = self
            .request(reqwest::Method::PUT, &path, &session.email, &session.api_key)
            .json(&payload);

        let envelope: Envelope<Value> = Self::send(request, &context).await?;
        if envelope.success {
            tracing::debug!("Cloudflare record {} now {}", record.name, new_value);
        }
        Ok(envelope.success)
    }

    fn is_eligible(&self, record: &DnsRecord) -> bool {
        record.record_type == RECORD_TYPE
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMAIL: &str = "me@example.com";
    const KEY: &str = "global_key";

    fn credentials() -> Credentials {
        Credentials::new(EMAIL, KEY)
    }

    fn session_with_zone(domain: &str, zone: &str) -> CloudflareSession {
        let mut zones = HashMap::new();
        zones.insert(domain.to_string(), zone.to_string());
        CloudflareSession {
            email: EMAIL.to_string(),
            api_key: KEY.to_string(),
            zones,
        }
    }

    fn record_json(id: &str, kind: &str, name: &str, content: &str) -> Value {
        serde_json::json!({
            "id": id, "type": kind, "name": name, "content": content,
            "ttl": 1, "proxied": false
        })
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("X-Auth-Email", EMAIL))
            .and(header("X-Auth-Key", KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [], "result": { "id": "u1", "email": EMAIL }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let session = provider.authenticate(&credentials()).await.unwrap();
        assert!(session.zone_id("example.com").is_none());
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{ "code": 9103, "message": "Unknown X-Auth-Key or X-Auth-Email" }],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let err = provider.authenticate(&credentials()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Authentication failed: could not login to cloudflare with me@example.com"
        );
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn test_list_records_looks_up_zone_once_and_pages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .and(query_param("name", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [], "result": [{ "id": "zone-1", "name": "example.com" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [record_json("r1", "A", "example.com", "198.51.100.1")],
                "result_info": { "page": 1, "per_page": 100, "total_pages": 2 }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [record_json("r2", "TXT", "example.com", "v=spf1 -all")],
                "result_info": { "page": 2, "per_page": 100, "total_pages": 2 }
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let mut session = CloudflareSession {
            email: EMAIL.to_string(),
            api_key: KEY.to_string(),
            zones: HashMap::new(),
        };

        let records = provider.list_records(&mut session, "example.com").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[1].record_type, "TXT");
        assert_eq!(session.zone_id("example.com"), Some("zone-1"));

        // Second listing reuses the cached zone id
        provider.list_records(&mut session, "example.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_records_counts_pages_without_echoed_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [record_json("r1", "A", "example.com", "198.51.100.1")],
                "result_info": { "total_pages": 2 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [record_json("r2", "A", "vpn.example.com", "198.51.100.1")],
                "result_info": { "total_pages": 2 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let mut session = session_with_zone("example.com", "zone-1");
        let records = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            provider.list_records(&mut session, "example.com"),
        )
        .await
        .expect("listing terminates")
        .unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_list_records_stops_on_empty_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [], "result": [],
                "result_info": { "total_pages": 2 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let mut session = session_with_zone("example.com", "zone-1");
        let records = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            provider.list_records(&mut session, "example.com"),
        )
        .await
        .expect("listing terminates")
        .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_records_tolerates_odd_non_a_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [
                    {
                        "id": "s1", "type": "SRV", "name": "_sip._tcp.example.com",
                        "data": { "port": 5060 }
                    },
                    record_json("r1", "A", "example.com", "198.51.100.1")
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let records = provider
            .list_records(&mut session_with_zone("example.com", "zone-1"), "example.com")
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[0].record_type, "A");
    }

    #[tokio::test]
    async fn test_list_records_unsuccessful_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{ "code": 7003, "message": "Could not route to /zones/zone-1" }],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let err = provider
            .list_records(&mut session_with_zone("example.com", "zone-1"), "example.com")
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Provider error (cloudflare): failed to load dns records for example.com. \
             Msg: Could not route to /zones/zone-1 (7003)"
        );
    }

    #[tokio::test]
    async fn test_list_records_unknown_zone() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [], "result": []
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let mut session = CloudflareSession {
            email: EMAIL.to_string(),
            api_key: KEY.to_string(),
            zones: HashMap::new(),
        };
        let err = provider
            .list_records(&mut session, "nowhere.example")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to load dns records for nowhere.example"));
        assert!(err.to_string().contains("zone not found"));
    }

    #[tokio::test]
    async fn test_list_records_uninterpretable_record() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zones/zone-1/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [],
                "result": [{ "id": "r1", "type": "A" }]
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let err = provider
            .list_records(&mut session_with_zone("example.com", "zone-1"), "example.com")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("could not interpret cloudflare response\n"));
        assert!(err.to_string().contains(r#""id":"r1""#));
    }

    #[tokio::test]
    async fn test_update_record_echoes_existing_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone-1/dns_records/r1"))
            .and(header("X-Auth-Key", KEY))
            .and(body_json(serde_json::json!({
                "type": "A",
                "name": "vpn.example.com",
                "content": "203.0.113.5",
                "ttl": 120,
                "proxied": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true, "errors": [], "result": { "id": "r1" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let record = DnsRecord::new("r1", "A", "vpn.example.com", "198.51.100.1")
            .with_ttl(120)
            .with_extra(serde_json::json!({ "proxied": true }));

        let applied = provider
            .update_record(
                &mut session_with_zone("example.com", "zone-1"),
                "example.com",
                &record,
                "203.0.113.5",
            )
            .await
            .unwrap();
        assert!(applied);
    }

    #[tokio::test]
    async fn test_update_record_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone-1/dns_records/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "errors": [{ "code": 81058, "message": "An identical record already exists." }],
                "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let record = DnsRecord::new("r1", "A", "example.com", "198.51.100.1");
        let err = provider
            .update_record(
                &mut session_with_zone("example.com", "zone-1"),
                "example.com",
                &record,
                "203.0.113.5",
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains(
            "failed to update example.com dns record. Msg: An identical record already exists."
        ));
    }

    #[tokio::test]
    async fn test_update_record_declined_without_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/zones/zone-1/dns_records/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false, "errors": [], "result": null
            })))
            .mount(&mock_server)
            .await;

        let provider = CloudflareProvider::with_base_url(mock_server.uri());
        let record = DnsRecord::new("r1", "A", "example.com", "198.51.100.1");
        let applied = provider
            .update_record(
                &mut session_with_zone("example.com", "zone-1"),
                "example.com",
                &record,
                "203.0.113.5",
            )
            .await
            .unwrap();
        assert!(!applied);
    }
}
