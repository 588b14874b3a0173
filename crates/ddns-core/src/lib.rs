// # ddns-core
//
// Core library for the one-shot DDNS synchronizer.
//
// ## Architecture Overview
//
// This library provides the functionality shared by every provider:
// - **AddressResolver**: Trait for discovering the current public address
// - **DnsProvider**: Trait for authenticating, listing and updating DNS records
// - **UpdateEngine**: Drives the resolve → authenticate → compare → update pass
// - **Reporter**: Fans operator-facing run lines out to console/syslog sinks
// - **DdnsConfig**: Credentials and domains loaded from a `key=value` file
//
// ## Design Principles
//
// 1. **Separation of Concerns**: The workflow lives here; provider crates only speak HTTP
// 2. **Closed Provider Set**: Providers are selected by `ProviderKind`, matched exhaustively
// 3. **Fail Fast**: The first error ends the run; the scheduler provides the retry
// 4. **Library-First**: The binary is a thin wrapper around this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod reporter;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, DdnsConfig, ProviderKind};
pub use engine::{RecordOutcome, RunSummary, UpdateEngine, UpdateOutcome};
pub use error::{Error, Result};
pub use reporter::{ReportSink, Reporter};
pub use traits::{AddressResolver, DnsProvider, DnsRecord};
