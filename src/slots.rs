use std::net::SocketAddrV4;

use cheap_clone::CheapClone;
use smol_str_0_3::{SmolStr, format_smolstr};

/// A point-in-time copy of one address slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSnapshot {
  key: SmolStr,
  remaining: i64,
  address: Option<SocketAddrV4>,
}

impl SlotSnapshot {
  /// Returns the `host:port` the slot is bound to, empty if never resolved.
  #[inline]
  pub fn key(&self) -> &str {
    self.key.as_str()
  }

  /// Returns the reuse credit left on the slot.
  #[inline]
  pub const fn remaining(&self) -> i64 {
    self.remaining
  }

  /// Returns the cached address, `None` if the slot was never resolved.
  #[inline]
  pub const fn address(&self) -> Option<SocketAddrV4> {
    self.address
  }
}

#[derive(Debug, Default)]
pub(crate) struct Slot {
  key: SmolStr,
  remaining: i64,
  address: Option<SocketAddrV4>,
}

/// What [`SlotTable::probe`] decided for one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
  /// The slot is still bound to the target and has credit left.
  Reuse(SocketAddrV4),
  /// The slot needs a fresh resolution.
  Stale,
}

/// Fixed-capacity arena of resolved address slots.
#[derive(Debug)]
pub(crate) struct SlotTable {
  slots: Box<[Slot]>,
  modulus: usize,
  counter: usize,
  seed_credit: i64,
}

impl SlotTable {
  pub(crate) fn new(capacity: usize, spread: usize, seed_credit: i64) -> Self {
    let capacity = capacity.max(1);
    Self {
      slots: (0..capacity).map(|_| Slot::default()).collect(),
      modulus: capacity.min(spread.max(1)),
      counter: 0,
      seed_credit,
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.slots.len()
  }

  /// Returns the slot the round-robin counter currently points at.
  #[inline]
  pub(crate) fn current(&self) -> usize {
    self.counter % self.modulus
  }

  #[inline]
  pub(crate) fn advance(&mut self) {
    self.counter = self.counter.wrapping_add(1);
  }

  #[inline]
  pub(crate) fn key_for(host: &str, port: u16) -> SmolStr {
    format_smolstr!("{host}:{port}")
  }

  /// Spends one credit of slot `index` and decides whether it can serve `key`.
  ///
  /// Nothing is written; the caller commits the outcome with
  /// [`SlotTable::spend`] or [`SlotTable::install`].
  pub(crate) fn probe(&self, index: usize, key: &str) -> Probe {
    let slot = &self.slots[index];
    match slot.address {
      Some(addr) if slot.key == key && slot.remaining > 1 => Probe::Reuse(addr),
      _ => Probe::Stale,
    }
  }

  #[inline]
  pub(crate) fn spend(&mut self, index: usize) {
    self.slots[index].remaining -= 1;
  }

  /// Binds slot `index` to a freshly resolved address, releasing the old one.
  pub(crate) fn install(&mut self, index: usize, key: &SmolStr, address: SocketAddrV4) {
    let slot = &mut self.slots[index];
    slot.key = key.cheap_clone();
    slot.address = Some(address);
    slot.remaining = self.seed_credit;
  }

  #[inline]
  pub(crate) fn address(&self, index: usize) -> Option<SocketAddrV4> {
    self.slots.get(index).and_then(|slot| slot.address)
  }

  #[inline]
  pub(crate) fn reward(&mut self, index: usize, credit: i64) {
    if let Some(slot) = self.slots.get_mut(index) {
      slot.remaining = slot.remaining.saturating_add(credit);
    }
  }

  /// Zeroes the credit of every slot cached at `address`, returns how many
  /// slots were hit.
  pub(crate) fn invalidate_matching(&mut self, address: SocketAddrV4) -> usize {
    let mut hits = 0;
    for slot in self.slots.iter_mut() {
      if slot.address == Some(address) {
        slot.remaining = 0;
        hits += 1;
      }
    }
    hits
  }

  pub(crate) fn snapshot(&self, index: usize) -> Option<SlotSnapshot> {
    self.slots.get(index).map(|slot| SlotSnapshot {
      key: slot.key.cheap_clone(),
      remaining: slot.remaining,
      address: slot.address,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::net::Ipv4Addr;

  use super::*;

  fn addr(last: u8) -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, last), 80)
  }

  #[test]
  fn test_modulus_follows_capacity() {
    let mut table = SlotTable::new(3, 8, 2);
    assert_eq!(table.len(), 3);
    let picks: Vec<_> = (0..6)
      .map(|_| {
        let cur = table.current();
        table.advance();
        cur
      })
      .collect();
    assert_eq!(picks, [0, 1, 2, 0, 1, 2]);

    let mut table = SlotTable::new(16, 8, 2);
    for _ in 0..8 {
      table.advance();
    }
    assert_eq!(table.current(), 0);
  }

  #[test]
  fn test_probe_lifecycle() {
    let mut table = SlotTable::new(1, 8, 2);
    let key = SlotTable::key_for("a", 80);
    assert_eq!(key, "a:80");
    assert_eq!(table.probe(0, &key), Probe::Stale);

    table.install(0, &key, addr(1));
    assert_eq!(table.snapshot(0).unwrap().remaining(), 2);

    assert_eq!(table.probe(0, &key), Probe::Reuse(addr(1)));
    table.spend(0);
    assert_eq!(table.snapshot(0).unwrap().remaining(), 1);

    // the last credit is spent on the probe itself
    assert_eq!(table.probe(0, &key), Probe::Stale);
    assert_eq!(table.probe(0, "b:80"), Probe::Stale);
  }

  #[test]
  fn test_probe_at_credit_floor() {
    let mut table = SlotTable::new(1, 8, i64::MIN);
    let key = SlotTable::key_for("a", 80);
    table.install(0, &key, addr(1));
    assert_eq!(table.probe(0, &key), Probe::Stale);
    assert_eq!(table.snapshot(0).unwrap().remaining(), i64::MIN);
  }

  #[test]
  fn test_invalidate_matching() {
    let mut table = SlotTable::new(4, 8, 2);
    table.install(0, &SlotTable::key_for("a", 80), addr(1));
    table.install(1, &SlotTable::key_for("b", 80), addr(1));
    table.install(2, &SlotTable::key_for("c", 80), addr(2));
    table.reward(0, 5);

    assert_eq!(table.invalidate_matching(addr(1)), 2);
    assert_eq!(table.snapshot(0).unwrap().remaining(), 0);
    assert_eq!(table.snapshot(1).unwrap().remaining(), 0);
    assert_eq!(table.snapshot(2).unwrap().remaining(), 2);
    // an empty slot never matches
    assert_eq!(table.snapshot(3).unwrap().address(), None);
    assert_eq!(table.invalidate_matching(addr(9)), 0);
  }

  #[test]
  fn test_out_of_range() {
    let mut table = SlotTable::new(2, 8, 2);
    table.reward(7, 1);
    assert!(table.snapshot(7).is_none());
    assert!(table.address(7).is_none());
  }
}
