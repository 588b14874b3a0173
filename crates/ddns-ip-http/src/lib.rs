// # HTTP Address Resolver
//
// This crate discovers the caller's public address by fetching a
// checkip-style HTML page and extracting the text between a marker and the
// next tag:
//
// ```text
// <html><head><title>Current IP Check</title></head>
// <body>Current IP Address: 203.0.113.5</body></html>
// ```
//
// One request per run, no retries, no caching.

use async_trait::async_trait;
use ddns_core::traits::AddressResolver;
use ddns_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;

/// Default discovery endpoint
pub const DEFAULT_DISCOVERY_URL: &str = "http://checkip.dyndns.org/";

/// Text that precedes the address in the discovery page
pub const ADDRESS_MARKER: &str = "IP Address: ";

/// Default HTTP timeout for the discovery request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolver backed by an HTTP discovery page
#[derive(Debug, Clone)]
pub struct HttpAddressResolver {
    /// URL to fetch the page from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressResolver {
    /// Create a resolver for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The URL this resolver fetches
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpAddressResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DISCOVERY_URL)
    }
}

/// Extract the address from a discovery page
///
/// The address is the text after [`ADDRESS_MARKER`] up to the next `<`, or
/// the end of the page when no tag follows.
pub fn parse_discovery_page(page: &str) -> Result<IpAddr> {
    let start = page
        .find(ADDRESS_MARKER)
        .map(|i| i + ADDRESS_MARKER.len())
        .ok_or_else(|| {
            Error::network(format!(
                "could not find '{}' in discovery response",
                ADDRESS_MARKER.trim_end()
            ))
        })?;

    let rest = &page[start..];
    let end = rest.find('<').unwrap_or(rest.len());
    let text = rest[..end].trim();

    if text.is_empty() {
        return Err(Error::network("discovery response contains no address"));
    }

    let ip: IpAddr = text.parse().map_err(|e| {
        Error::network_with(format!("invalid address in discovery response: {}", text), e)
    })?;

    // Only A records are managed
    if !ip.is_ipv4() {
        return Err(Error::network(format!(
            "discovery response holds a non-IPv4 address: {}",
            ip
        )));
    }

    Ok(ip)
}

#[async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        tracing::debug!("Fetching public address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network_with(format!("request to {} failed", self.url), e))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "discovery service {} returned {}",
                self.url,
                response.status()
            )));
        }

        let page = response
            .text()
            .await
            .map_err(|e| Error::network_with("failed to read discovery response", e))?;

        let ip = parse_discovery_page(&page)?;
        tracing::debug!("Discovery service reports {}", ip);
        Ok(ip)
    }
}
