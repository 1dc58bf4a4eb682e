use core::time::Duration;
use std::{
  sync::atomic::{AtomicU64, Ordering},
  time::Instant,
};

/// A monotonic time source used to measure how long a socket was in use.
pub trait Clock: Send + Sync + 'static {
  /// Returns the current instant.
  fn now(&self) -> Instant;
}

/// The system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
  #[inline]
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// A clock that only moves when told to.
///
/// Useful to drive a [`ThroughputResolver`](crate::ThroughputResolver)
/// deterministically, e.g. in tests or simulations.
#[derive(Debug)]
pub struct ManualClock {
  origin: Instant,
  offset_nanos: AtomicU64,
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl ManualClock {
  /// Creates a clock frozen at the current instant.
  pub fn new() -> Self {
    Self {
      origin: Instant::now(),
      offset_nanos: AtomicU64::new(0),
    }
  }

  /// Moves the clock forward by `by`.
  pub fn advance(&self, by: Duration) {
    let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
    self.offset_nanos.fetch_add(nanos, Ordering::AcqRel);
  }

  /// Returns how far the clock has moved since it was created.
  pub fn elapsed(&self) -> Duration {
    Duration::from_nanos(self.offset_nanos.load(Ordering::Acquire))
  }
}

impl Clock for ManualClock {
  #[inline]
  fn now(&self) -> Instant {
    self.origin + self.elapsed()
  }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
  #[inline]
  fn now(&self) -> Instant {
    (**self).now()
  }
}
