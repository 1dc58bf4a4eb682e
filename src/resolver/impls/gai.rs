use std::net::{SocketAddr, SocketAddrV4, ToSocketAddrs};

use super::{super::AddressResolver, ResolveError};

/// Resolves names through the system resolver (`getaddrinfo`) by way of
/// [`ToSocketAddrs`], keeping the first IPv4 answer.
///
/// Every call blocks the current thread until the lookup completes.
///
/// - If you want to send DNS queries yourself, you may want to use
///   [`DnsResolver`](crate::resolver::dns::DnsResolver).
/// - If the addresses are known up front, see [`StaticResolver`](super::StaticResolver).
#[derive(Debug, Default, Clone, Copy)]
pub struct GaiResolver;

impl GaiResolver {
  /// Creates a new [`GaiResolver`].
  #[inline]
  pub const fn new() -> Self {
    Self
  }
}

impl AddressResolver for GaiResolver {
  type Error = ResolveError;

  fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, Self::Error> {
    ToSocketAddrs::to_socket_addrs(&(host, port))?
      .find_map(|addr| match addr {
        SocketAddr::V4(addr) => Some(addr),
        SocketAddr::V6(_) => None,
      })
      .ok_or_else(|| ResolveError::not_found(host, port))
  }
}

#[cfg(test)]
mod tests {
  use std::net::Ipv4Addr;

  use super::*;

  #[test]
  fn test_ipv4_literal() {
    let addr = GaiResolver.resolve("127.0.0.1", 8080).unwrap();
    assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));
  }

  #[test]
  fn test_ipv6_literal_is_not_found() {
    let err = GaiResolver::new().resolve("::1", 80).unwrap_err();
    assert!(err.is_not_found());
  }
}
