use std::net::SocketAddrV4;

mod impls;
pub use impls::*;

/// Used to resolve a `host:port` pair into an IPv4 socket address.
///
/// This is the collaborator a [`ThroughputResolver`](crate::ThroughputResolver)
/// calls whenever a slot needs a fresh resolution. Implementations may block.
pub trait AddressResolver: Send + Sync + 'static {
  /// The error type returned by the resolver.
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolves `host` and `port` to a TCP capable IPv4 socket address.
  fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, Self::Error>;
}

impl<R: AddressResolver> AddressResolver for std::sync::Arc<R> {
  type Error = R::Error;

  #[inline]
  fn resolve(&self, host: &str, port: u16) -> Result<SocketAddrV4, Self::Error> {
    (**self).resolve(host, port)
  }
}
