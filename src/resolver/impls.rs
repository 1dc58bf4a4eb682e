use smol_str_0_3::SmolStr;

/// System resolver
pub mod gai;

/// Fixed host to address resolver
pub mod fixed;

/// DNS resolver
#[cfg(feature = "dns")]
#[cfg_attr(docsrs, doc(cfg(feature = "dns")))]
pub mod dns;

pub use fixed::StaticResolver;
pub use gai::GaiResolver;

#[cfg(feature = "dns")]
pub use dns::{DnsResolver, DnsResolverOptions};

#[derive(Debug, thiserror::Error)]
enum ResolveErrorKind {
  #[error("cannot resolve an ipv4 address for {0}")]
  NotFound(SmolStr),
  #[error("{0}")]
  Io(#[from] std::io::Error),
  #[cfg(feature = "dns")]
  #[error("{0}")]
  Dns(#[from] hickory_resolver::error::ResolveError),
}

/// The error type for errors that get returned when resolving fails
#[derive(Debug)]
#[repr(transparent)]
pub struct ResolveError(ResolveErrorKind);

impl core::fmt::Display for ResolveError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Display::fmt(&self.0, f)
  }
}

impl std::error::Error for ResolveError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.0 {
      ResolveErrorKind::NotFound(_) => None,
      ResolveErrorKind::Io(e) => Some(e),
      #[cfg(feature = "dns")]
      ResolveErrorKind::Dns(e) => Some(e),
    }
  }
}

impl From<ResolveErrorKind> for ResolveError {
  fn from(value: ResolveErrorKind) -> Self {
    Self(value)
  }
}

impl ResolveError {
  pub(crate) fn not_found(host: &str, port: u16) -> Self {
    Self(ResolveErrorKind::NotFound(smol_str_0_3::format_smolstr!(
      "{host}:{port}"
    )))
  }

  /// Returns `true` if the name resolved, but not to any IPv4 address.
  #[inline]
  pub const fn is_not_found(&self) -> bool {
    matches!(self.0, ResolveErrorKind::NotFound(_))
  }
}

impl From<std::io::Error> for ResolveError {
  fn from(value: std::io::Error) -> Self {
    Self(ResolveErrorKind::Io(value))
  }
}

#[cfg(feature = "dns")]
impl From<hickory_resolver::error::ResolveError> for ResolveError {
  fn from(value: hickory_resolver::error::ResolveError) -> Self {
    Self(ResolveErrorKind::Dns(value))
  }
}
