//! Core DDNS engine
//!
//! The UpdateEngine runs one synchronization pass:
//! - Resolve the current public address via AddressResolver
//! - Authenticate with the DnsProvider
//! - For every configured domain, list records and update the eligible ones
//!   whose value differs from the address
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ AddressResolver │─── IpAddr ───┐
//! └─────────────────┘              │
//!                                  ▼
//!                         ┌──────────────┐
//!                         │ UpdateEngine │
//!                         └──────────────┘
//!                                  │
//!              ┌───────────────────┴───────────────────┐
//!              │                                       │
//!              ▼                                       ▼
//!      ┌──────────────┐                        ┌─────────────┐
//!      │ DnsProvider  │                        │  Reporter   │
//!      │ (list/update)│                        │ (log/error) │
//!      └──────────────┘                        └─────────────┘
//! ```
//!
//! ## Failure Model
//!
//! The first error ends the run. Nothing is retried and later domains are
//! not attempted; the scheduler that started the run will start the next.

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::traits::{AddressResolver, DnsProvider, DnsRecord};
use std::net::IpAddr;
use tracing::debug;

/// What happened to one eligible record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Record already pointed at the current address
    Unchanged {
        current: String,
    },

    /// Record was updated
    Updated {
        previous: String,
        new: String,
    },

    /// Dry-run: record would have been updated
    WouldUpdate {
        previous: String,
        new: String,
    },
}

/// Outcome for one record, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub domain: String,
    pub record_name: String,
    pub outcome: UpdateOutcome,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The address every eligible record was compared against
    pub address: IpAddr,
    /// Per-record outcomes, in processing order
    pub records: Vec<RecordOutcome>,
}

impl RunSummary {
    /// Number of records that were updated
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, UpdateOutcome::Updated { .. }))
    }

    /// Number of records that already held the address
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, UpdateOutcome::Unchanged { .. }))
    }

    /// Number of records a dry run would have updated
    pub fn would_update(&self) -> usize {
        self.count(|o| matches!(o, UpdateOutcome::WouldUpdate { .. }))
    }

    fn count(&self, pred: impl Fn(&UpdateOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`UpdateEngine::new()`]
/// 2. Optionally enable dry-run with [`UpdateEngine::with_dry_run()`]
/// 3. Call [`UpdateEngine::run()`] once
///
/// The engine owns the provider session for the length of the run and never
/// shares it.
pub struct UpdateEngine<P: DnsProvider> {
    /// Public address discovery
    resolver: Box<dyn AddressResolver>,

    /// DNS provider for listing and updating records
    provider: P,

    /// Credentials and domains
    config: DdnsConfig,

    /// Operator-facing output
    reporter: Reporter,

    /// Log intended updates without performing them
    dry_run: bool,
}

impl<P: DnsProvider> UpdateEngine<P> {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Public address discovery implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Loaded configuration
    /// - `reporter`: Where run lines go
    pub fn new(
        resolver: Box<dyn AddressResolver>,
        provider: P,
        config: DdnsConfig,
        reporter: Reporter,
    ) -> Self {
        Self {
            resolver,
            provider,
            config,
            reporter,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The reporter this engine writes to
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Run one synchronization pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunSummary)`: Every domain was processed
    /// - `Err(Error)`: The first failure; it has already been reported
    pub async fn run(&self) -> Result<RunSummary> {
        let address = self.resolver.resolve().await.map_err(|e| self.fail(e))?;
        self.reporter.log(format!("router wan ip is {}", address));

        let credentials = &self.config.credentials;
        let mut session = self
            .provider
            .authenticate(credentials)
            .await
            .map_err(|e| self.fail(e))?;
        self.reporter.log(format!(
            "logged into {} as {}",
            self.provider.provider_name(),
            credentials.identity
        ));

        let mut summary = RunSummary {
            address,
            records: Vec::new(),
        };

        for domain in &self.config.domains {
            self.sync_domain(&mut session, domain, &address, &mut summary)
                .await
                .map_err(|e| self.fail(e))?;
        }

        if self.dry_run {
            self.reporter.log(format!(
                "dry run: {} record(s) would be updated, {} already current",
                summary.would_update(),
                summary.unchanged()
            ));
        } else {
            self.reporter.log(format!(
                "{} record(s) updated, {} already current",
                summary.updated(),
                summary.unchanged()
            ));
        }

        Ok(summary)
    }

    /// Compare and update the eligible records of one domain
    async fn sync_domain(
        &self,
        session: &mut P::Session,
        domain: &str,
        address: &IpAddr,
        summary: &mut RunSummary,
    ) -> Result<()> {
        self.reporter.log(format!("checking domain {}", domain));

        let records = self.provider.list_records(session, domain).await?;
        debug!(
            "{} returned {} record(s) for {}",
            self.provider.provider_name(),
            records.len(),
            domain
        );

        for record in records.iter().filter(|r| self.provider.is_eligible(r)) {
            let outcome = self.sync_record(session, domain, record, address).await?;
            summary.records.push(RecordOutcome {
                domain: domain.to_string(),
                record_name: record.name.clone(),
                outcome,
            });
        }

        Ok(())
    }

    /// Compare one eligible record and update it if needed
    async fn sync_record(
        &self,
        session: &mut P::Session,
        domain: &str,
        record: &DnsRecord,
        address: &IpAddr,
    ) -> Result<UpdateOutcome> {
        let label = record_label(domain, record);
        let new_value = address.to_string();

        if record.points_to(address) {
            self.reporter
                .log(format!("{}: already set to {}", label, new_value));
            return Ok(UpdateOutcome::Unchanged { current: new_value });
        }

        if self.dry_run {
            self.reporter.log(format!(
                "{}: would update from {} to {}",
                label, record.value, new_value
            ));
            return Ok(UpdateOutcome::WouldUpdate {
                previous: record.value.clone(),
                new: new_value,
            });
        }

        self.reporter.log(format!(
            "{}: updating from {} to {}",
            label, record.value, new_value
        ));

        let applied = self
            .provider
            .update_record(session, domain, record, &new_value)
            .await?;
        if !applied {
            return Err(Error::provider(
                self.provider.provider_name(),
                format!("failed to update {} dns record", domain),
            ));
        }

        Ok(UpdateOutcome::Updated {
            previous: record.value.clone(),
            new: new_value,
        })
    }

    /// Report an error on the way out
    fn fail(&self, error: Error) -> Error {
        self.reporter.error(error.to_string());
        error
    }
}

/// Name used in run lines: the domain for apex records, otherwise the host
fn record_label(domain: &str, record: &DnsRecord) -> String {
    if record.name == "@" || record.name.is_empty() || record.name == domain {
        domain.to_string()
    } else {
        record.name.clone()
    }
}
