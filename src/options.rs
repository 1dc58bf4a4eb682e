use core::time::Duration;

use crate::{DEFAULT_REWARD_TIERS, RewardTier};

const fn default_slots() -> usize {
  8
}

const fn default_spread() -> usize {
  8
}

const fn default_window() -> usize {
  10
}

const fn default_seed_credit() -> i64 {
  2
}

const fn default_advance_on_resolve() -> bool {
  true
}

const fn default_min_elapsed() -> Duration {
  Duration::from_micros(1)
}

fn default_reward_tiers() -> Vec<RewardTier> {
  DEFAULT_REWARD_TIERS.to_vec()
}

/// The options used to construct a [`ThroughputResolver`](crate::ThroughputResolver).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThroughputResolverOptions {
  #[cfg_attr(feature = "serde", serde(default = "default_slots"))]
  slots: usize,
  #[cfg_attr(feature = "serde", serde(default = "default_spread"))]
  spread: usize,
  #[cfg_attr(feature = "serde", serde(default = "default_window"))]
  window: usize,
  #[cfg_attr(feature = "serde", serde(default = "default_seed_credit"))]
  seed_credit: i64,
  #[cfg_attr(feature = "serde", serde(default = "default_advance_on_resolve"))]
  advance_on_resolve: bool,
  #[cfg_attr(
    feature = "serde",
    serde(with = "humantime_serde", default = "default_min_elapsed")
  )]
  min_elapsed: Duration,
  #[cfg_attr(feature = "serde", serde(default = "default_reward_tiers"))]
  reward_tiers: Vec<RewardTier>,
}

impl Default for ThroughputResolverOptions {
  fn default() -> Self {
    Self {
      slots: default_slots(),
      spread: default_spread(),
      window: default_window(),
      seed_credit: default_seed_credit(),
      advance_on_resolve: default_advance_on_resolve(),
      min_elapsed: default_min_elapsed(),
      reward_tiers: default_reward_tiers(),
    }
  }
}

impl ThroughputResolverOptions {
  /// Create a new [`ThroughputResolverOptions`] with the default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the number of address slots in builder pattern
  pub const fn with_slots(mut self, val: usize) -> Self {
    self.slots = val;
    self
  }

  /// Set the number of address slots
  pub fn set_slots(&mut self, val: usize) {
    self.slots = val;
  }

  /// Returns the number of address slots.
  ///
  /// Default is `8`; zero is treated as one.
  pub const fn slots(&self) -> usize {
    self.slots
  }

  /// Set how many slots the round-robin walks over in builder pattern
  pub const fn with_spread(mut self, val: usize) -> Self {
    self.spread = val;
    self
  }

  /// Set how many slots the round-robin walks over
  pub fn set_spread(&mut self, val: usize) {
    self.spread = val;
  }

  /// Returns the upper bound on the round-robin modulus.
  ///
  /// The modulus is `min(slots, spread)`, default `8`.
  pub const fn spread(&self) -> usize {
    self.spread
  }

  /// Set the throughput window size in builder pattern
  pub const fn with_window(mut self, val: usize) -> Self {
    self.window = val;
    self
  }

  /// Set the throughput window size
  pub fn set_window(&mut self, val: usize) {
    self.window = val;
  }

  /// Returns how many recent throughput samples are ranked against.
  ///
  /// Default is `10`; zero is treated as one.
  pub const fn window(&self) -> usize {
    self.window
  }

  /// Set the credit a slot starts with after a fresh resolution in builder pattern
  pub const fn with_seed_credit(mut self, val: i64) -> Self {
    self.seed_credit = val;
    self
  }

  /// Set the credit a slot starts with after a fresh resolution
  pub fn set_seed_credit(&mut self, val: i64) {
    self.seed_credit = val;
  }

  /// Returns the credit a slot starts with after a fresh resolution, default `2`.
  pub const fn seed_credit(&self) -> i64 {
    self.seed_credit
  }

  /// Set whether every resolve moves the round-robin counter in builder pattern
  pub const fn with_advance_on_resolve(mut self, val: bool) -> Self {
    self.advance_on_resolve = val;
    self
  }

  /// Set whether every resolve moves the round-robin counter
  pub fn set_advance_on_resolve(&mut self, val: bool) {
    self.advance_on_resolve = val;
  }

  /// Returns whether every resolve moves the round-robin counter.
  ///
  /// Default is `true`. When `false`, the embedding client moves it through
  /// [`ThroughputResolver::advance`](crate::ThroughputResolver::advance),
  /// typically once per request.
  pub const fn advance_on_resolve(&self) -> bool {
    self.advance_on_resolve
  }

  /// Set the shortest socket lifetime that yields a throughput sample in builder pattern
  pub const fn with_min_elapsed(mut self, val: Duration) -> Self {
    self.min_elapsed = val;
    self
  }

  /// Set the shortest socket lifetime that yields a throughput sample
  pub fn set_min_elapsed(&mut self, val: Duration) {
    self.min_elapsed = val;
  }

  /// Returns the shortest socket lifetime that yields a throughput sample.
  ///
  /// Shorter lifetimes are discarded. Default is `1µs`; zero is treated as `1ns`.
  pub const fn min_elapsed(&self) -> Duration {
    self.min_elapsed
  }

  /// Set the reward ladder in builder pattern
  pub fn with_reward_tiers(mut self, val: impl Into<Vec<RewardTier>>) -> Self {
    self.reward_tiers = val.into();
    self
  }

  /// Set the reward ladder
  pub fn set_reward_tiers(&mut self, val: impl Into<Vec<RewardTier>>) {
    self.reward_tiers = val.into();
  }

  /// Returns the reward ladder, see [`DEFAULT_REWARD_TIERS`].
  pub fn reward_tiers(&self) -> &[RewardTier] {
    &self.reward_tiers
  }
}
