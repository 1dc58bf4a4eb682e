use crate::OrderStatTree;

/// A bounded sliding window of throughput samples (bytes per second).
///
/// Samples live in a circular array of fixed capacity and are mirrored into an
/// [`OrderStatTree`], so rank queries over the current window cost `O(log W)`.
#[derive(Debug, Clone)]
pub struct ThroughputHistory {
  samples: Vec<f64>,
  capacity: usize,
  cursor: usize,
  index: OrderStatTree,
}

impl ThroughputHistory {
  /// Creates an empty history holding at most `capacity` samples.
  ///
  /// A capacity of zero is treated as one.
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      samples: Vec::with_capacity(capacity),
      capacity,
      cursor: 0,
      index: OrderStatTree::with_capacity(capacity),
    }
  }

  /// Records a sample, evicting the oldest one once the window is full.
  ///
  /// Returns the number of samples currently held.
  pub fn record(&mut self, sample: f64) -> usize {
    if self.samples.len() < self.capacity {
      self.samples.push(sample);
    } else {
      let evicted = core::mem::replace(&mut self.samples[self.cursor], sample);
      let removed = self.index.remove(evicted);
      assert!(
        removed,
        "throughput index lost track of evicted sample {evicted}"
      );
    }
    self.index.insert(sample);
    self.cursor = (self.cursor + 1) % self.capacity;

    debug_assert_eq!(self.index.len(), self.samples.len());
    self.samples.len()
  }

  /// Returns the `k`-th smallest sample in the window (0-based).
  ///
  /// The order among equal samples is unspecified.
  #[inline]
  pub fn percentile_at_order(&self, k: usize) -> Option<f64> {
    self.index.select(k)
  }

  /// Returns the number of samples currently held.
  #[inline]
  pub fn len(&self) -> usize {
    self.samples.len()
  }

  /// Returns `true` if no sample has been recorded yet.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  /// Returns the window capacity.
  #[inline]
  pub const fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the samples in the window, in storage order.
  #[inline]
  pub fn samples(&self) -> &[f64] {
    &self.samples
  }

  /// Drops every sample.
  pub fn clear(&mut self) {
    self.samples.clear();
    self.index.clear();
    self.cursor = 0;
  }
}
