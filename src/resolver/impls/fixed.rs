use std::net::{Ipv4Addr, SocketAddrV4};

use crossbeam_skiplist::SkipMap;
use smol_str_0_3::SmolStr;

use super::{super::AddressResolver, ResolveError};

/// A resolver answering from a fixed table of host to IPv4 mappings.
///
/// IPv4 literals always resolve to themselves. The table can be changed while
/// the resolver is in use, which makes it handy for pinning endpoints or for
/// simulating DNS changes.
#[derive(Debug, Default)]
pub struct StaticResolver {
  hosts: SkipMap<SmolStr, Ipv4Addr>,
}

impl StaticResolver {
  /// Creates an empty [`StaticResolver`].
  pub fn new() -> Self {
    Self::default()
  }

  /// Maps `host` to `ip` in builder pattern
  pub fn with_host(self, host: impl Into<SmolStr>, ip: Ipv4Addr) -> Self {
    self.insert(host, ip);
    self
  }

  /// Maps `host` to `ip`, replacing any previous mapping.
  pub fn insert(&self, host: impl Into<SmolStr>, ip: Ipv4Addr) {
    self.hosts.insert(host.into(), ip);
  }

  /// Drops the mapping for `host`, returns the previous address if any.
  pub fn remove(&self, host: &str) -> Option<Ipv4Addr> {
    self.hosts.remove(host).map(|ent| *ent.value())
  }

  /// Returns the number of mapped hosts.
  pub fn len(&self) -> usize {
    self.hosts.len()
  }

  /// Returns `true` if no host is mapped.
  pub fn is_empty(&self) -> bool {
    self.hosts.is_empty()
  }
}

impl AddressResolver for StaticResolver {
  type Error = ResolveError;

  fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, Self::Error> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
      return Ok(SocketAddrV4::new(ip, port));
    }

    self
      .hosts
      .get(host)
      .map(|ent| SocketAddrV4::new(*ent.value(), port))
      .ok_or_else(|| ResolveError::not_found(host, port))
  }
}
