/// Counters describing what a [`ThroughputResolver`](crate::ThroughputResolver)
/// has done so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
  pub(crate) fresh: u64,
  pub(crate) reused: u64,
  pub(crate) failures: u64,
  pub(crate) rewards: u64,
  pub(crate) credit_granted: i64,
  pub(crate) invalidations: u64,
  pub(crate) discarded: u64,
}

impl ResolverStats {
  /// Returns how many lookups went to the name resolver and succeeded.
  #[inline]
  pub const fn fresh(&self) -> u64 {
    self.fresh
  }

  /// Returns how many lookups were served from a cached slot.
  #[inline]
  pub const fn reused(&self) -> u64 {
    self.reused
  }

  /// Returns how many fresh resolutions failed.
  #[inline]
  pub const fn failures(&self) -> u64 {
    self.failures
  }

  /// Returns how many completed connections earned credit.
  #[inline]
  pub const fn rewards(&self) -> u64 {
    self.rewards
  }

  /// Returns the total credit granted to slots.
  #[inline]
  pub const fn credit_granted(&self) -> i64 {
    self.credit_granted
  }

  /// Returns how many slots were invalidated by failed sockets.
  #[inline]
  pub const fn invalidations(&self) -> u64 {
    self.invalidations
  }

  /// Returns how many throughput samples were dropped for degenerate timing.
  #[inline]
  pub const fn discarded(&self) -> u64 {
    self.discarded
  }

  /// Returns the number of successful lookups.
  #[inline]
  pub const fn total_resolutions(&self) -> u64 {
    self.fresh + self.reused
  }

  /// Returns the share of successful lookups served from cache, in `[0, 1]`.
  pub fn reuse_rate(&self) -> f64 {
    let total = self.total_resolutions();
    if total == 0 {
      0.0
    } else {
      self.reused as f64 / total as f64
    }
  }

  /// Check if the resolver has processed any lookups
  #[inline]
  pub const fn has_activity(&self) -> bool {
    self.total_resolutions() + self.failures > 0
  }
}
