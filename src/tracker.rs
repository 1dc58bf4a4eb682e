use std::time::Instant;

use crossbeam_skiplist::SkipMap;

/// The handle a socket is tracked under, usually its raw descriptor.
pub type SocketId = u64;

/// Which slot a socket was opened for, and when it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SocketRecord {
  pub(crate) slot: usize,
  pub(crate) started: Instant,
}

/// Live sockets, keyed by [`SocketId`].
///
/// Every record is handed out at most once by [`SocketTracker::take`].
#[derive(Debug, Default)]
pub(crate) struct SocketTracker {
  sockets: SkipMap<SocketId, SocketRecord>,
}

impl SocketTracker {
  /// Tracks `fd`, replacing any stale record left under the same handle.
  #[inline]
  pub(crate) fn start(&self, fd: SocketId, slot: usize, started: Instant) {
    self.sockets.insert(fd, SocketRecord { slot, started });
  }

  #[inline]
  pub(crate) fn take(&self, fd: SocketId) -> Option<SocketRecord> {
    self.sockets.remove(&fd).map(|ent| *ent.value())
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.sockets.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_take_once() {
    let tracker = SocketTracker::default();
    let now = Instant::now();
    tracker.start(3, 1, now);
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.take(3), Some(SocketRecord { slot: 1, started: now }));
    assert_eq!(tracker.take(3), None);
    assert_eq!(tracker.len(), 0);
  }

  #[test]
  fn test_restart_overwrites() {
    let tracker = SocketTracker::default();
    let now = Instant::now();
    tracker.start(3, 1, now);
    tracker.start(3, 5, now);
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.take(3).map(|r| r.slot), Some(5));
  }

  #[test]
  fn test_untracked() {
    let tracker = SocketTracker::default();
    assert!(tracker.take(42).is_none());
  }
}
