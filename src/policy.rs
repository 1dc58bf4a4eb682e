use crate::ThroughputHistory;

/// One rung of the reward ladder.
///
/// With `n` samples in the window, a tier applies once `n > divisor` and
/// grants `credit` when the connection's throughput is at least the sample at
/// order `n / divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTier {
  divisor: usize,
  credit: i64,
}

impl RewardTier {
  /// Creates a new tier. A divisor of zero is treated as one.
  #[inline]
  pub const fn new(divisor: usize, credit: i64) -> Self {
    Self {
      divisor: if divisor == 0 { 1 } else { divisor },
      credit,
    }
  }

  /// Returns the divisor of the window size that selects the bar.
  #[inline]
  pub const fn divisor(&self) -> usize {
    self.divisor
  }

  /// Returns the credit granted when the bar is met.
  #[inline]
  pub const fn credit(&self) -> i64 {
    self.credit
  }
}

/// The default reward ladder: `+1` at order `n/3`, a further `+2` at order `n/6`.
pub const DEFAULT_REWARD_TIERS: [RewardTier; 2] = [RewardTier::new(3, 1), RewardTier::new(6, 2)];

/// Ranks a connection's throughput against the recent window.
#[derive(Debug, Clone)]
pub(crate) struct ScoringPolicy {
  tiers: Box<[RewardTier]>,
}

impl ScoringPolicy {
  pub(crate) fn new(tiers: &[RewardTier]) -> Self {
    let mut tiers: Box<[RewardTier]> = tiers
      .iter()
      .map(|t| RewardTier::new(t.divisor, t.credit))
      .collect();
    tiers.sort_by_key(|t| t.divisor);
    Self { tiers }
  }

  /// Returns the credit `throughput` earns. It must already be recorded in
  /// `history`.
  ///
  /// Tiers are walked in ascending divisor order; the first tier that does
  /// not apply or is not met ends the walk.
  pub(crate) fn score(&self, history: &ThroughputHistory, throughput: f64) -> i64 {
    let n = history.len();
    let mut credit = 0;
    for tier in self.tiers.iter() {
      if n <= tier.divisor {
        break;
      }
      match history.percentile_at_order(n / tier.divisor) {
        Some(bar) if throughput >= bar => credit += tier.credit,
        _ => break,
      }
    }
    credit
  }
}

impl Default for ScoringPolicy {
  fn default() -> Self {
    Self::new(&DEFAULT_REWARD_TIERS)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn history(samples: &[f64], capacity: usize) -> ThroughputHistory {
    let mut h = ThroughputHistory::new(capacity);
    for s in samples {
      h.record(*s);
    }
    h
  }

  #[test]
  fn test_both_tiers() {
    let h = history(&[10., 20., 30., 40., 50., 60., 70., 65.], 10);
    assert_eq!(ScoringPolicy::default().score(&h, 65.), 3);
  }

  #[test]
  fn test_below_first_bar() {
    // n = 8, order 2 is 20
    let h = history(&[10., 20., 30., 40., 50., 60., 70., 15.], 10);
    assert_eq!(ScoringPolicy::default().score(&h, 15.), 0);
  }

  #[test]
  fn test_small_window_earns_nothing() {
    let h = history(&[10., 20., 30.], 10);
    assert_eq!(ScoringPolicy::default().score(&h, 30.), 0);
  }

  #[test]
  fn test_first_tier_only() {
    // n = 5: the second tier needs more than six samples
    let h = history(&[10., 20., 30., 40., 50.], 10);
    assert_eq!(ScoringPolicy::default().score(&h, 50.), 1);
  }

  #[test]
  fn test_tiers_are_sorted() {
    let policy = ScoringPolicy::new(&[
      RewardTier::new(6, 2),
      RewardTier::new(0, 4),
      RewardTier::new(3, 1),
    ]);
    let divisors: Vec<_> = policy.tiers.iter().map(|t| t.divisor()).collect();
    assert_eq!(divisors, [1, 3, 6]);
  }

  #[test]
  fn test_monotonic_with_performance() {
    let h = history(&[10., 20., 30., 40., 50., 60., 70.], 10);
    let mut slow = h.clone();
    slow.record(5.);
    let mut fast = h;
    fast.record(35.);

    let policy = ScoringPolicy::default();
    let slow = policy.score(&slow, 5.);
    let fast = policy.score(&fast, 35.);
    assert_eq!(slow, 0);
    assert!(fast > slow);
  }
}
