// # Address Resolver Trait
//
// Defines the interface for discovering the caller's current public address.
//
// ## Implementations
//
// - HTTP discovery page (checkip.dyndns.org): `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::AddressResolver;
//
// async fn show(resolver: &dyn AddressResolver) -> ddns_core::Result<()> {
//     let ip = resolver.resolve().await?;
//     println!("wan ip: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-address discovery
///
/// One call per run. Implementations must not retry or cache: a failed
/// lookup aborts the run and the next scheduled invocation tries again.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Fetch the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The address as seen by the discovery service
    /// - `Err(Error::Network)`: Service unreachable or response unparseable
    async fn resolve(&self) -> Result<IpAddr, crate::Error>;
}
