use core::cmp::Ordering;

type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct Node {
  value: f64,
  /// Number of equal values folded into this node.
  count: usize,
  /// Sum of `count` over the whole subtree.
  size: usize,
  height: u8,
  left: Option<NodeId>,
  right: Option<NodeId>,
}

impl Node {
  #[inline]
  const fn leaf(value: f64) -> Self {
    Self {
      value,
      count: 1,
      size: 1,
      height: 1,
      left: None,
      right: None,
    }
  }
}

/// An order-statistics multiset of `f64` values.
///
/// Backed by an AVL tree stored in a flat arena, where every node carries the
/// size of its subtree. Equal values share a node, so [`OrderStatTree::len`]
/// counts duplicates.
///
/// Values are ordered by [`f64::total_cmp`].
#[derive(Debug, Clone, Default)]
pub struct OrderStatTree {
  nodes: Vec<Node>,
  free: Vec<NodeId>,
  root: Option<NodeId>,
}

impl OrderStatTree {
  /// Creates an empty tree.
  #[inline]
  pub const fn new() -> Self {
    Self {
      nodes: Vec::new(),
      free: Vec::new(),
      root: None,
    }
  }

  /// Creates an empty tree with room for `capacity` distinct values.
  #[inline]
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      nodes: Vec::with_capacity(capacity),
      free: Vec::new(),
      root: None,
    }
  }

  /// Returns the number of values, duplicates included.
  #[inline]
  pub fn len(&self) -> usize {
    self.size(self.root)
  }

  /// Returns `true` if the tree holds no values.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  /// Inserts one occurrence of `value`.
  pub fn insert(&mut self, value: f64) {
    let root = self.insert_at(self.root, value);
    self.root = Some(root);
  }

  /// Removes one occurrence of `value`, returns `false` if it was absent.
  pub fn remove(&mut self, value: f64) -> bool {
    let (root, removed) = self.remove_at(self.root, value);
    self.root = root;
    removed
  }

  /// Returns the `k`-th smallest value (0-based), or `None` if `k >= len`.
  pub fn select(&self, mut k: usize) -> Option<f64> {
    let mut cur = self.root;
    while let Some(idx) = cur {
      let node = &self.nodes[idx];
      let left = self.size(node.left);
      if k < left {
        cur = node.left;
      } else if k < left + node.count {
        return Some(node.value);
      } else {
        k -= left + node.count;
        cur = node.right;
      }
    }
    None
  }

  /// Returns how many values are strictly less than `value`.
  pub fn rank(&self, value: f64) -> usize {
    let mut rank = 0;
    let mut cur = self.root;
    while let Some(idx) = cur {
      let node = &self.nodes[idx];
      match value.total_cmp(&node.value) {
        Ordering::Less => cur = node.left,
        Ordering::Equal => return rank + self.size(node.left),
        Ordering::Greater => {
          rank += self.size(node.left) + node.count;
          cur = node.right;
        }
      }
    }
    rank
  }

  /// Returns the smallest value.
  #[inline]
  pub fn min(&self) -> Option<f64> {
    self.select(0)
  }

  /// Returns the largest value.
  #[inline]
  pub fn max(&self) -> Option<f64> {
    self.len().checked_sub(1).and_then(|k| self.select(k))
  }

  /// Removes every value, keeping the allocated arena.
  pub fn clear(&mut self) {
    self.nodes.clear();
    self.free.clear();
    self.root = None;
  }

  #[inline]
  fn size(&self, idx: Option<NodeId>) -> usize {
    idx.map_or(0, |i| self.nodes[i].size)
  }

  #[inline]
  fn height(&self, idx: Option<NodeId>) -> u8 {
    idx.map_or(0, |i| self.nodes[i].height)
  }

  fn alloc(&mut self, value: f64) -> NodeId {
    match self.free.pop() {
      Some(idx) => {
        self.nodes[idx] = Node::leaf(value);
        idx
      }
      None => {
        self.nodes.push(Node::leaf(value));
        self.nodes.len() - 1
      }
    }
  }

  fn update(&mut self, idx: NodeId) {
    let Node {
      left, right, count, ..
    } = self.nodes[idx];
    let height = 1 + self.height(left).max(self.height(right));
    let size = count + self.size(left) + self.size(right);
    let node = &mut self.nodes[idx];
    node.height = height;
    node.size = size;
  }

  fn rotate_right(&mut self, y: NodeId) -> NodeId {
    let Some(x) = self.nodes[y].left else {
      return y;
    };
    self.nodes[y].left = self.nodes[x].right;
    self.nodes[x].right = Some(y);
    self.update(y);
    self.update(x);
    x
  }

  fn rotate_left(&mut self, x: NodeId) -> NodeId {
    let Some(y) = self.nodes[x].right else {
      return x;
    };
    self.nodes[x].right = self.nodes[y].left;
    self.nodes[y].left = Some(x);
    self.update(x);
    self.update(y);
    y
  }

  fn rebalance(&mut self, idx: NodeId) -> NodeId {
    self.update(idx);
    let Node { left, right, .. } = self.nodes[idx];
    let balance = self.height(left) as i16 - self.height(right) as i16;

    if balance > 1 {
      if let Some(l) = left {
        if self.height(self.nodes[l].left) < self.height(self.nodes[l].right) {
          self.nodes[idx].left = Some(self.rotate_left(l));
        }
      }
      return self.rotate_right(idx);
    }

    if balance < -1 {
      if let Some(r) = right {
        if self.height(self.nodes[r].right) < self.height(self.nodes[r].left) {
          self.nodes[idx].right = Some(self.rotate_right(r));
        }
      }
      return self.rotate_left(idx);
    }

    idx
  }

  fn insert_at(&mut self, at: Option<NodeId>, value: f64) -> NodeId {
    let Some(idx) = at else {
      return self.alloc(value);
    };

    match value.total_cmp(&self.nodes[idx].value) {
      Ordering::Less => {
        let child = self.insert_at(self.nodes[idx].left, value);
        self.nodes[idx].left = Some(child);
      }
      Ordering::Greater => {
        let child = self.insert_at(self.nodes[idx].right, value);
        self.nodes[idx].right = Some(child);
      }
      Ordering::Equal => self.nodes[idx].count += 1,
    }
    self.rebalance(idx)
  }

  fn remove_at(&mut self, at: Option<NodeId>, value: f64) -> (Option<NodeId>, bool) {
    let Some(idx) = at else {
      return (None, false);
    };

    match value.total_cmp(&self.nodes[idx].value) {
      Ordering::Less => {
        let (child, removed) = self.remove_at(self.nodes[idx].left, value);
        if !removed {
          return (Some(idx), false);
        }
        self.nodes[idx].left = child;
      }
      Ordering::Greater => {
        let (child, removed) = self.remove_at(self.nodes[idx].right, value);
        if !removed {
          return (Some(idx), false);
        }
        self.nodes[idx].right = child;
      }
      Ordering::Equal if self.nodes[idx].count > 1 => self.nodes[idx].count -= 1,
      Ordering::Equal => match (self.nodes[idx].left, self.nodes[idx].right) {
        (None, None) => {
          self.free.push(idx);
          return (None, true);
        }
        (Some(child), None) | (None, Some(child)) => {
          self.free.push(idx);
          return (Some(child), true);
        }
        (Some(_), Some(right)) => {
          let (right, successor) = self.take_min(right);
          let Node { value, count, .. } = self.nodes[successor];
          self.free.push(successor);
          let node = &mut self.nodes[idx];
          node.value = value;
          node.count = count;
          node.right = right;
        }
      },
    }
    (Some(self.rebalance(idx)), true)
  }

  /// Detaches the leftmost node of the subtree, returning the new subtree root
  /// and the detached node.
  fn take_min(&mut self, idx: NodeId) -> (Option<NodeId>, NodeId) {
    match self.nodes[idx].left {
      None => (self.nodes[idx].right.take(), idx),
      Some(left) => {
        let (child, min) = self.take_min(left);
        self.nodes[idx].left = child;
        (Some(self.rebalance(idx)), min)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  impl OrderStatTree {
    fn check_invariants(&self) {
      fn walk(
        tree: &OrderStatTree,
        at: Option<NodeId>,
        lo: Option<f64>,
        hi: Option<f64>,
      ) -> (u8, usize) {
        let Some(idx) = at else { return (0, 0) };
        let node = &tree.nodes[idx];
        assert!(node.count > 0);
        if let Some(lo) = lo {
          assert!(node.value.total_cmp(&lo).is_gt());
        }
        if let Some(hi) = hi {
          assert!(node.value.total_cmp(&hi).is_lt());
        }
        let (lh, ls) = walk(tree, node.left, lo, Some(node.value));
        let (rh, rs) = walk(tree, node.right, Some(node.value), hi);
        assert!((lh as i16 - rh as i16).abs() <= 1, "unbalanced node");
        assert_eq!(node.height, 1 + lh.max(rh));
        assert_eq!(node.size, ls + rs + node.count);
        (node.height, node.size)
      }
      walk(self, self.root, None, None);
    }
  }

  fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
  }

  #[test]
  fn test_select_and_rank() {
    let mut tree = OrderStatTree::new();
    for v in [50.0, 10.0, 40.0, 20.0, 30.0] {
      tree.insert(v);
    }
    tree.check_invariants();
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.select(0), Some(10.0));
    assert_eq!(tree.select(2), Some(30.0));
    assert_eq!(tree.select(4), Some(50.0));
    assert_eq!(tree.select(5), None);
    assert_eq!(tree.rank(30.0), 2);
    assert_eq!(tree.rank(35.0), 3);
    assert_eq!(tree.rank(5.0), 0);
    assert_eq!(tree.min(), Some(10.0));
    assert_eq!(tree.max(), Some(50.0));
  }

  #[test]
  fn test_duplicates() {
    let mut tree = OrderStatTree::new();
    for v in [7.0, 7.0, 3.0, 7.0] {
      tree.insert(v);
    }
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.select(1), Some(7.0));
    assert_eq!(tree.select(3), Some(7.0));
    assert_eq!(tree.rank(7.0), 1);

    assert!(tree.remove(7.0));
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.select(2), Some(7.0));
    assert!(tree.remove(7.0));
    assert!(tree.remove(7.0));
    assert!(!tree.remove(7.0));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.select(0), Some(3.0));
    tree.check_invariants();
  }

  #[test]
  fn test_remove_missing() {
    let mut tree = OrderStatTree::new();
    assert!(!tree.remove(1.0));
    tree.insert(1.0);
    assert!(!tree.remove(2.0));
    assert_eq!(tree.len(), 1);
    assert!(tree.remove(1.0));
    assert!(tree.is_empty());
    assert_eq!(tree.max(), None);
  }

  #[test]
  fn test_ascending_inserts_stay_balanced() {
    let mut tree = OrderStatTree::with_capacity(1024);
    for i in 0..1024 {
      tree.insert(i as f64);
    }
    tree.check_invariants();
    // a balanced tree of 1024 nodes is at most ~1.44 * log2(n) high
    assert!(tree.height(tree.root) <= 15);

    for i in (0..1024).step_by(2) {
      assert!(tree.remove(i as f64));
    }
    tree.check_invariants();
    assert_eq!(tree.len(), 512);
    assert_eq!(tree.select(0), Some(1.0));
    assert_eq!(tree.select(511), Some(1023.0));
  }

  #[test]
  fn test_arena_reuse() {
    let mut tree = OrderStatTree::new();
    for round in 0..10 {
      for i in 0..16 {
        tree.insert((round * 16 + i) as f64);
      }
      for i in 0..16 {
        assert!(tree.remove((round * 16 + i) as f64));
      }
    }
    assert!(tree.is_empty());
    assert!(tree.nodes.len() <= 16);
  }

  #[test]
  fn test_clear() {
    let mut tree = OrderStatTree::new();
    tree.insert(1.0);
    tree.insert(2.0);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.select(0), None);
    tree.insert(3.0);
    assert_eq!(tree.select(0), Some(3.0));
  }

  #[quickcheck_macros::quickcheck]
  fn fuzzy_select_matches_sorted(values: Vec<u16>, removals: Vec<u16>) -> bool {
    let mut tree = OrderStatTree::new();
    let mut mirror: Vec<f64> = Vec::new();
    for v in &values {
      let v = f64::from(*v % 64);
      tree.insert(v);
      mirror.push(v);
    }
    for v in &removals {
      let v = f64::from(*v % 64);
      let expected = mirror.iter().position(|x| *x == v).map(|i| mirror.swap_remove(i));
      if tree.remove(v) != expected.is_some() {
        return false;
      }
    }
    tree.check_invariants();

    let mirror = sorted(&mirror);
    tree.len() == mirror.len()
      && mirror
        .iter()
        .enumerate()
        .all(|(k, v)| tree.select(k) == Some(*v) && tree.rank(*v) <= k)
  }
}
