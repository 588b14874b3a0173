//! Core traits for the DDNS synchronizer
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`AddressResolver`]: Discover the current public address
//! - [`DnsProvider`]: List and update DNS records via provider APIs

pub mod address_resolver;
pub mod dns_provider;

pub use address_resolver::AddressResolver;
pub use dns_provider::{DnsProvider, DnsRecord};
