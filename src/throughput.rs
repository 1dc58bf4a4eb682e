use core::time::Duration;
use std::net::SocketAddrV4;

use parking_lot::{Mutex, MutexGuard};

use crate::{
  AddressResolver, Clock, MonotonicClock, ResolverStats, SlotSnapshot, SocketId, ThroughputHistory,
  ThroughputResolverOptions,
  policy::ScoringPolicy,
  slots::{Probe, SlotTable},
  tracker::SocketTracker,
};

/// The outcome of [`ThroughputResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
  slot: usize,
  address: SocketAddrV4,
  reused: bool,
}

impl Resolved {
  /// Returns the slot that served the lookup. Pass it to
  /// [`ThroughputResolver::start_socket`] once a connection is opened.
  #[inline]
  pub const fn slot(&self) -> usize {
    self.slot
  }

  /// Returns the address to connect to.
  #[inline]
  pub const fn address(&self) -> SocketAddrV4 {
    self.address
  }

  /// Returns `true` if the cached address was reused, `false` after a fresh resolution.
  #[inline]
  pub const fn reused(&self) -> bool {
    self.reused
  }
}

#[derive(Debug)]
struct State {
  slots: SlotTable,
  history: ThroughputHistory,
  stats: ResolverStats,
}

/// An adaptive resolver that caches addresses in a small table of slots and
/// hands out extra reuse credit to slots whose connections perform well.
///
/// The typical request path is:
///
/// 1. [`resolve`](Self::resolve) a `host:port`, connect to the returned address;
/// 2. [`start_socket`](Self::start_socket) with the socket handle and slot;
/// 3. [`stop_socket`](Self::stop_socket) with the bytes moved when the socket
///    finishes normally, or [`shutdown_socket`](Self::shutdown_socket) when it
///    fails, which forces every slot cached at the same address to re-resolve.
///
/// A single instance is meant to be shared by all request workers, e.g. behind
/// an [`Arc`](std::sync::Arc). Slot table, throughput window, stats and socket
/// bookkeeping are only touched under one lock; fresh resolutions run while
/// holding it.
pub struct ThroughputResolver<R, C = MonotonicClock> {
  resolver: R,
  clock: C,
  sockets: SocketTracker,
  policy: ScoringPolicy,
  min_elapsed: Duration,
  advance_on_resolve: bool,
  state: Mutex<State>,
}

impl<R: core::fmt::Debug, C: core::fmt::Debug> core::fmt::Debug for ThroughputResolver<R, C> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ThroughputResolver")
      .field("resolver", &self.resolver)
      .field("clock", &self.clock)
      .field("sockets", &self.sockets.len())
      .field("stats", &self.state.lock().stats)
      .finish_non_exhaustive()
  }
}

impl<R: AddressResolver> ThroughputResolver<R> {
  /// Create a new [`ThroughputResolver`] measuring time with the system
  /// monotonic clock.
  pub fn new(resolver: R, opts: ThroughputResolverOptions) -> Self {
    Self::with_clock(resolver, MonotonicClock, opts)
  }
}

impl<R: AddressResolver, C: Clock> ThroughputResolver<R, C> {
  /// Create a new [`ThroughputResolver`] with the given clock.
  pub fn with_clock(resolver: R, clock: C, opts: ThroughputResolverOptions) -> Self {
    Self {
      resolver,
      clock,
      sockets: SocketTracker::default(),
      policy: ScoringPolicy::new(opts.reward_tiers()),
      min_elapsed: opts.min_elapsed().max(Duration::from_nanos(1)),
      advance_on_resolve: opts.advance_on_resolve(),
      state: Mutex::new(State {
        slots: SlotTable::new(opts.slots(), opts.spread(), opts.seed_credit()),
        history: ThroughputHistory::new(opts.window()),
        stats: ResolverStats::default(),
      }),
    }
  }

  /// Returns the underlying name resolver.
  #[inline]
  pub const fn resolver(&self) -> &R {
    &self.resolver
  }

  /// Returns the clock used to time sockets.
  #[inline]
  pub const fn clock(&self) -> &C {
    &self.clock
  }

  /// Picks the next slot and either reuses its cached address or resolves
  /// `host:port` afresh through the underlying resolver.
  ///
  /// A failed resolution is returned unchanged and leaves the slot untouched.
  pub fn resolve(&self, host: &str, port: u16) -> Result<Resolved, R::Error> {
    let key = SlotTable::key_for(host, port);
    let mut state = self.lock();
    let slot = state.slots.current();
    if self.advance_on_resolve {
      state.slots.advance();
    }

    if let Probe::Reuse(address) = state.slots.probe(slot, &key) {
      state.slots.spend(slot);
      state.stats.reused += 1;
      #[cfg(feature = "tracing")]
      tracing::trace!(
        target = "throughput_resolver.resolve",
        slot,
        key = %key,
        address = %address,
        "reusing cached address"
      );
      return Ok(Resolved {
        slot,
        address,
        reused: true,
      });
    }

    match self.resolver.resolve(host, port) {
      Ok(address) => {
        state.slots.install(slot, &key, address);
        state.stats.fresh += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(
          target = "throughput_resolver.resolve",
          slot,
          key = %key,
          address = %address,
          "resolved fresh address"
        );
        Ok(Resolved {
          slot,
          address,
          reused: false,
        })
      }
      Err(e) => {
        state.stats.failures += 1;
        #[cfg(feature = "tracing")]
        tracing::warn!(
          target = "throughput_resolver.resolve",
          slot,
          key = %key,
          err = %e,
          "failed to resolve address"
        );
        Err(e)
      }
    }
  }

  /// Moves the round-robin counter to the next slot.
  ///
  /// Only needed when [`advance_on_resolve`](ThroughputResolverOptions::advance_on_resolve)
  /// is off.
  pub fn advance(&self) {
    self.lock().slots.advance();
  }

  /// Starts timing socket `fd`, opened for `slot`.
  ///
  /// A handle that is still tracked (e.g. reused by the OS) is overwritten.
  pub fn start_socket(&self, fd: SocketId, slot: usize) {
    let _state = self.lock();
    self.sockets.start(fd, slot, self.clock.now());
  }

  /// Reports that socket `fd` finished normally after moving `bytes` bytes.
  ///
  /// The throughput is recorded into the window and ranked against it; good
  /// connections earn their slot extra reuse credit. Untracked sockets are
  /// ignored, as are sockets that lived too short to yield a meaningful rate.
  pub fn stop_socket(&self, fd: SocketId, bytes: u64) {
    let now = self.clock.now();
    let mut state = self.lock();
    let Some(record) = self.sockets.take(fd) else {
      #[cfg(feature = "tracing")]
      tracing::trace!(
        target = "throughput_resolver.socket",
        fd,
        "ignoring stop of untracked socket"
      );
      return;
    };

    let elapsed = now.saturating_duration_since(record.started);
    let throughput = bytes as f64 / elapsed.as_secs_f64();
    if elapsed < self.min_elapsed || !throughput.is_finite() {
      state.stats.discarded += 1;
      #[cfg(feature = "tracing")]
      tracing::warn!(
        target = "throughput_resolver.socket",
        fd,
        slot = record.slot,
        elapsed = ?elapsed,
        bytes,
        "discarding throughput sample with degenerate timing"
      );
      return;
    }

    let State {
      slots,
      history,
      stats,
    } = &mut *state;
    history.record(throughput);
    let credit = self.policy.score(history, throughput);
    if credit != 0 {
      slots.reward(record.slot, credit);
      stats.rewards += 1;
      stats.credit_granted = stats.credit_granted.saturating_add(credit);
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
      target = "throughput_resolver.socket",
      fd,
      slot = record.slot,
      throughput,
      credit,
      "scored socket throughput"
    );
  }

  /// Reports that socket `fd` terminated abnormally.
  ///
  /// Every slot cached at the same address as the socket's slot loses its
  /// credit, so its next lookup resolves afresh. Untracked sockets are ignored.
  pub fn shutdown_socket(&self, fd: SocketId) {
    let mut state = self.lock();
    let Some(record) = self.sockets.take(fd) else {
      #[cfg(feature = "tracing")]
      tracing::trace!(
        target = "throughput_resolver.socket",
        fd,
        "ignoring shutdown of untracked socket"
      );
      return;
    };

    let Some(address) = state.slots.address(record.slot) else {
      return;
    };
    let hits = state.slots.invalidate_matching(address);
    state.stats.invalidations += hits as u64;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      target = "throughput_resolver.socket",
      fd,
      slot = record.slot,
      address = %address,
      invalidated = hits,
      "invalidated slots after socket failure"
    );
  }

  /// Returns the address currently cached in `slot`.
  pub fn address(&self, slot: usize) -> Option<SocketAddrV4> {
    self.lock().slots.address(slot)
  }

  /// Returns a copy of `slot`, `None` if out of range.
  pub fn slot(&self, slot: usize) -> Option<SlotSnapshot> {
    self.lock().slots.snapshot(slot)
  }

  /// Returns the number of address slots.
  pub fn slots(&self) -> usize {
    self.lock().slots.len()
  }

  /// Returns the number of sockets started but not yet stopped or shut down.
  pub fn tracked_sockets(&self) -> usize {
    self.sockets.len()
  }

  /// Returns the `k`-th smallest throughput (bytes per second) in the window.
  pub fn throughput_percentile(&self, k: usize) -> Option<f64> {
    self.lock().history.percentile_at_order(k)
  }

  /// Returns the number of throughput samples in the window.
  pub fn history_len(&self) -> usize {
    self.lock().history.len()
  }

  /// Returns a snapshot of the counters.
  pub fn stats(&self) -> ResolverStats {
    self.lock().stats
  }

  #[inline]
  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock()
  }
}
