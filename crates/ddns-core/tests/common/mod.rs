//! Test doubles and common utilities for workflow contract tests
//!
//! This module provides minimal test doubles that record what the engine
//! asks of them without talking to any network.

#![allow(dead_code)]

use ddns_core::config::{Credentials, DdnsConfig, ProviderKind};
use ddns_core::error::{Error, Result};
use ddns_core::reporter::{MemorySink, Reporter};
use ddns_core::traits::{AddressResolver, DnsProvider, DnsRecord};
use ddns_core::UpdateEngine;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A resolver that always returns the same address
pub struct FixedResolver {
    ip: IpAddr,
    calls: Arc<AtomicUsize>,
}

impl FixedResolver {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get a handle on the call counter
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl AddressResolver for FixedResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// A resolver whose discovery page never contains the marker
pub struct FailingResolver;

#[async_trait::async_trait]
impl AddressResolver for FailingResolver {
    async fn resolve(&self) -> Result<IpAddr> {
        Err(Error::network(
            "could not find 'IP Address: ' in discovery response",
        ))
    }
}

/// Which records a mock provider considers eligible
#[derive(Debug, Clone, Copy)]
pub enum Eligibility {
    /// Host label "@" only (GoDaddy policy)
    ApexOnly,
    /// Record type "A" only (Cloudflare policy)
    TypeA,
}

/// A provider call, as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate { identity: String },
    List { domain: String },
    Update { domain: String, record_id: String, new_value: String },
}

/// Session handed out by the mock; counts how often the engine touched it
#[derive(Debug, Default)]
pub struct MockSession {
    pub uses: usize,
}

/// A mock DnsProvider that tracks calls
pub struct MockDnsProvider {
    name: &'static str,
    eligibility: Eligibility,
    records: HashMap<String, Vec<DnsRecord>>,
    reject_login: bool,
    failing_list: Option<String>,
    failing_update: Option<String>,
    declining_update: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockDnsProvider {
    pub fn new(name: &'static str, eligibility: Eligibility) -> Self {
        Self {
            name,
            eligibility,
            records: HashMap::new(),
            reject_login: false,
            failing_list: None,
            failing_update: None,
            declining_update: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// GoDaddy-flavoured mock
    pub fn godaddy() -> Self {
        Self::new("godaddy", Eligibility::ApexOnly)
    }

    /// Cloudflare-flavoured mock
    pub fn cloudflare() -> Self {
        Self::new("cloudflare", Eligibility::TypeA)
    }

    /// Serve `records` for `domain`
    pub fn with_records(mut self, domain: &str, records: Vec<DnsRecord>) -> Self {
        self.records.insert(domain.to_string(), records);
        self
    }

    /// Reject every login
    pub fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    /// Fail listing for `domain`
    pub fn failing_list_for(mut self, domain: &str) -> Self {
        self.failing_list = Some(domain.to_string());
        self
    }

    /// Fail updates for `domain`
    pub fn failing_update_for(mut self, domain: &str) -> Self {
        self.failing_update = Some(domain.to_string());
        self
    }

    /// Return `Ok(false)` for updates on `domain`
    pub fn declining_update_for(mut self, domain: &str) -> Self {
        self.declining_update = Some(domain.to_string());
        self
    }

    /// Get a handle on the call log
    pub fn call_log(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    type Session = MockSession;

    async fn authenticate(&self, credentials: &Credentials) -> Result<MockSession> {
        self.record(Call::Authenticate {
            identity: credentials.identity.clone(),
        });
        if self.reject_login {
            return Err(Error::auth(format!(
                "{} login failure for {}",
                self.name, credentials.identity
            )));
        }
        Ok(MockSession::default())
    }

    async fn list_records(
        &self,
        session: &mut MockSession,
        domain: &str,
    ) -> Result<Vec<DnsRecord>> {
        session.uses += 1;
        self.record(Call::List {
            domain: domain.to_string(),
        });
        if self.failing_list.as_deref() == Some(domain) {
            return Err(Error::provider(
                self.name,
                format!("failed to load dns records for {}. Msg: boom", domain),
            ));
        }
        Ok(self.records.get(domain).cloned().unwrap_or_default())
    }

    async fn update_record(
        &self,
        session: &mut MockSession,
        domain: &str,
        record: &DnsRecord,
        new_value: &str,
    ) -> Result<bool> {
        session.uses += 1;
        self.record(Call::Update {
            domain: domain.to_string(),
            record_id: record.id.clone(),
            new_value: new_value.to_string(),
        });
        if self.failing_update.as_deref() == Some(domain) {
            return Err(Error::provider(
                self.name,
                format!("failed to update {} dns record. Msg: denied", domain),
            ));
        }
        Ok(self.declining_update.as_deref() != Some(domain))
    }

    fn is_eligible(&self, record: &DnsRecord) -> bool {
        match self.eligibility {
            Eligibility::ApexOnly => record.name == "@",
            Eligibility::TypeA => record.record_type == "A",
        }
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn config_for(domains: &[&str]) -> DdnsConfig {
    DdnsConfig::new(
        ProviderKind::GoDaddy,
        Credentials::new("tester", "test-secret"),
        domains.iter().map(|d| d.to_string()).collect(),
    )
}

/// Build an engine wired to an in-memory reporter sink
pub fn engine_with<R>(
    resolver: R,
    provider: MockDnsProvider,
    domains: &[&str],
) -> (UpdateEngine<MockDnsProvider>, MemorySink)
where
    R: AddressResolver + 'static,
{
    let sink = MemorySink::new();
    let reporter = Reporter::new().with_sink(sink.clone());
    let engine = UpdateEngine::new(Box::new(resolver), provider, config_for(domains), reporter);
    (engine, sink)
}

/// Snapshot of the calls made so far
pub fn calls(log: &Arc<Mutex<Vec<Call>>>) -> Vec<Call> {
    log.lock().unwrap().clone()
}

/// Only the update calls
pub fn updates(log: &Arc<Mutex<Vec<Call>>>) -> Vec<Call> {
    calls(log)
        .into_iter()
        .filter(|c| matches!(c, Call::Update { .. }))
        .collect()
}

pub const WAN_IP: [u8; 4] = [203, 0, 113, 5];
pub const OLD_IP: &str = "198.51.100.1";

pub fn wan_ip() -> IpAddr {
    IpAddr::from(WAN_IP)
}
