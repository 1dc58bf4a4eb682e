use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};

pub use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::Resolver;

use super::{super::AddressResolver, ResolveError};

/// The options used to construct a [`DnsResolver`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DnsResolverOptions {
  resolver_opts: ResolverOpts,
  resolver_config: ResolverConfig,
}

impl DnsResolverOptions {
  /// Create a new [`DnsResolverOptions`] with the default DNS configurations.
  pub fn new() -> Self {
    Self {
      resolver_opts: ResolverOpts::default(),
      resolver_config: ResolverConfig::default(),
    }
  }

  /// Set the default dns configuration in builder pattern
  pub fn with_resolver_config(mut self, c: ResolverConfig) -> Self {
    self.resolver_config = c;
    self
  }

  /// Set the default dns configuration
  pub fn set_resolver_config(&mut self, c: ResolverConfig) {
    self.resolver_config = c;
  }

  /// Returns the resolver configuration
  pub fn resolver_config(&self) -> &ResolverConfig {
    &self.resolver_config
  }

  /// Set the default resolver options in builder pattern
  pub fn with_resolver_opts(mut self, o: ResolverOpts) -> Self {
    self.resolver_opts = o;
    self
  }

  /// Set the default resolver options
  pub fn set_resolver_opts(&mut self, o: ResolverOpts) {
    self.resolver_opts = o;
  }

  /// Returns the resolver options
  pub fn resolver_opts(&self) -> &ResolverOpts {
    &self.resolver_opts
  }
}

impl Default for DnsResolverOptions {
  fn default() -> Self {
    Self::new()
  }
}

/// A resolver sending its own DNS queries through `hickory-resolver`.
///
/// Only `A` answers are used. IPv4 literals are returned without a query.
///
/// **N.B.** If a name has several addresses, the first answer wins. Pair this
/// resolver with a [`ThroughputResolver`](crate::ThroughputResolver) to spread
/// load across re-resolutions instead.
pub struct DnsResolver {
  dns: Resolver,
}

impl core::fmt::Debug for DnsResolver {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("DnsResolver").finish_non_exhaustive()
  }
}

impl DnsResolver {
  /// Create a new [`DnsResolver`] with the given options.
  pub fn new(opts: DnsResolverOptions) -> Result<Self, ResolveError> {
    Ok(Self {
      dns: Resolver::new(opts.resolver_config, opts.resolver_opts)?,
    })
  }

  /// Create a new [`DnsResolver`] from the system configuration
  /// (e.g. `/etc/resolv.conf`).
  pub fn from_system_conf() -> Result<Self, ResolveError> {
    Ok(Self {
      dns: Resolver::from_system_conf()?,
    })
  }
}

impl AddressResolver for DnsResolver {
  type Error = ResolveError;

  fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, Self::Error> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
      return Ok(SocketAddrV4::new(ip, port));
    }

    self
      .dns
      .lookup_ip(host)?
      .iter()
      .find_map(|ip| match ip {
        IpAddr::V4(ip) => Some(SocketAddrV4::new(ip, port)),
        IpAddr::V6(_) => None,
      })
      .ok_or_else(|| ResolveError::not_found(host, port))
  }
}
