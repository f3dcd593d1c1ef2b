//! Post-order pruning: collapses subtrees that ended up carrying no useful
//! information after masking.
//!
//! A node is dropped when it is a leaf (no children survived a deeper
//! prune) *and* `too_full` — i.e. it represents a k-mer so common, or so
//! thoroughly masked out, that its location list overflowed without ever
//! narrowing down to a small, specific set of sites. A too-full node that
//! still has surviving children is kept: its own overflowed list is
//! useless, but a longer, more specific suffix further down the path may
//! not be.

use crate::node::GTreeNode;

/// Prunes `node`'s subtree in place, post-order. Returns `true` if `node`
/// itself should be dropped by its parent (i.e. it is a `too_full` leaf
/// after its children have been pruned).
pub fn prune_node(node: &mut GTreeNode) -> bool {
  for child_slot in node.next.iter_mut() {
    if let Some(child) = child_slot {
      if prune_node(child) {
        *child_slot = None;
      }
    }
  }
  node.too_full && node.next.iter().all(Option::is_none)
}

/// Prunes an entire index in place. The root is never dropped even if it
/// satisfies the leaf/too-full condition, since there is nothing above it
/// to drop it.
pub fn prune(index: &mut crate::index::GTreeIndex) {
  prune_node(&mut index.root);
}
