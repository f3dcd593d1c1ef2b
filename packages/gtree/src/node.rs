//! The g-tree node itself: allocation, the bounded per-node location list,
//! child descent, and iterative teardown.

use crate::alphabet::BasePair;
use crate::consts::MAX_LOCS_PER_NODE;

/// A location recorded at some depth in the trie: the contig it occurred in
/// (as an index into the owning [`crate::index::GTreeIndex`]'s intern
/// table) and the 0-based byte offset within that contig.
///
/// `desc` is `None` for the sentinel locations written by the mask operator
/// (§4.E): masking must not grow the tree, so it cannot record a real
/// location, but it still needs to mark a node as "visited" so that a
/// subsequent prune does not collapse it. Following the design notes'
/// preferred alternative to pointer-identity interning, `desc` stores the
/// intern-table index directly rather than a pointer that needs to be
/// re-resolved against the table on every serialize.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Loc {
  pub desc: Option<u32>,
  pub pos: u64,
}

impl Loc {
  pub const fn sentinel() -> Self {
    Self { desc: None, pos: 0 }
  }
}

/// One node of the four-way prefix trie.
///
/// Invariants (spec §3):
/// - if `n_matches < MAX_LOCS_PER_NODE` then `too_full` is `false` and all
///   valid locations sit in `locs[..n_matches]`.
/// - once a node would receive its `(MAX_LOCS_PER_NODE + 1)`-th location, it
///   permanently sets `too_full = true`; `n_matches` stays at
///   `MAX_LOCS_PER_NODE` and further would-be locations are discarded *at
///   this node* but may still recurse into deeper nodes.
pub struct GTreeNode {
  pub too_full: bool,
  pub n_matches: u8,
  pub next: [Option<Box<GTreeNode>>; 4],
  pub locs: [Loc; MAX_LOCS_PER_NODE],
}

impl GTreeNode {
  pub fn new() -> Self {
    Self {
      too_full: false,
      n_matches: 0,
      next: [None, None, None, None],
      locs: [Loc::sentinel(); MAX_LOCS_PER_NODE],
    }
  }

  /// Returns the child along `bp`'s edge, or `None` if absent. Never
  /// allocates.
  pub fn descend(&self, bp: BasePair) -> Option<&GTreeNode> {
    let i = bp.child_index()?;
    self.next[i].as_deref()
  }

  pub fn descend_mut(&mut self, bp: BasePair) -> Option<&mut GTreeNode> {
    let i = bp.child_index()?;
    self.next[i].as_deref_mut()
  }

  /// Returns the existing child along `bp`'s edge, installing a new empty
  /// node first if one is not already present.
  ///
  /// # Panics
  /// Panics if `bp` is not one of `A`, `C`, `G`, `T` — callers are expected
  /// to have already rejected `N` via the window-reset policy before
  /// reaching this call.
  pub fn get_or_create_child(&mut self, bp: BasePair) -> &mut GTreeNode {
    let i = bp.child_index().expect("get_or_create_child called with a non-ACGT symbol");
    self.next[i].get_or_insert_with(|| Box::new(GTreeNode::new()))
  }

  /// Registers `loc` at this node per the build/mask policy (spec §4.D):
  /// append while there is room, set `too_full` exactly once when the
  /// `(K+1)`-th location would arrive, and otherwise discard silently.
  pub fn register_loc(&mut self, loc: Loc) {
    let n = self.n_matches as usize;
    if n < MAX_LOCS_PER_NODE {
      self.locs[n] = loc;
      self.n_matches += 1;
    } else if !self.too_full {
      self.too_full = true;
    }
  }

  /// Total number of nodes in the subtree rooted at `self`, `self` included.
  /// Recursion is bounded by `MAX_WINDOW_SIZE` (spec §9: safe without an
  /// explicit stack at this depth).
  pub fn count(&self) -> usize {
    1 + self
      .next
      .iter()
      .filter_map(|c| c.as_deref())
      .map(GTreeNode::count)
      .sum::<usize>()
  }
}

impl Default for GTreeNode {
  fn default() -> Self {
    Self::new()
  }
}

/// Iterative teardown (spec §4.B, §9): detach every child onto an explicit
/// work stack before it is dropped, so that tearing down a full-depth trie
/// never recurses through Rust's default field-by-field `Drop`. The legacy
/// C implementation anticipated needing this for safety at arbitrary
/// window sizes; at the canonical `MAX_WINDOW_SIZE = 32` plain recursion
/// would also be safe, but this keeps the property that changing the
/// window size constant cannot reintroduce a stack-depth hazard.
impl Drop for GTreeNode {
  fn drop(&mut self) {
    let mut stack: Vec<Box<GTreeNode>> = self.next.iter_mut().filter_map(Option::take).collect();
    while let Some(mut node) = stack.pop() {
      stack.extend(node.next.iter_mut().filter_map(Option::take));
      // `node` drops here with all of its children already detached, so no
      // recursive `Drop::drop` call happens.
    }
  }
}
