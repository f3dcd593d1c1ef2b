//! The top-level g-tree index: a root node plus the interned contig
//! description table every [`crate::node::Loc`] points into.

use std::collections::HashMap;

use crate::node::GTreeNode;

/// A built (or in-progress) g-tree index.
///
/// Contig descriptions are interned here rather than stored inline in every
/// [`crate::node::Loc`] (spec §3's "Design Notes", alternative (b)): each
/// distinct FASTA header seen by the builder or the masker is assigned a
/// stable `u32` index the first time it is seen, and every `Loc` after that
/// refers back to it by index.
pub struct GTreeIndex {
  pub root: GTreeNode,
  descs: Vec<String>,
  desc_ids: HashMap<String, u32>,
}

impl GTreeIndex {
  pub fn new() -> Self {
    Self {
      root: GTreeNode::new(),
      descs: Vec::new(),
      desc_ids: HashMap::new(),
    }
  }

  /// Returns the intern id for `desc`, assigning a new one if this is the
  /// first time this exact description has been seen.
  pub fn intern_desc(&mut self, desc: &str) -> u32 {
    if let Some(&id) = self.desc_ids.get(desc) {
      return id;
    }
    let id = self.descs.len() as u32;
    self.descs.push(desc.to_owned());
    self.desc_ids.insert(desc.to_owned(), id);
    id
  }

  /// Looks up an already-interned description by id. Every `Loc` produced
  /// by this crate carries an id obtained from [`Self::intern_desc`] on
  /// this same index, so a lookup miss indicates a corrupted index or a
  /// `Loc` moved across indexes.
  pub fn desc(&self, id: u32) -> eyre::Result<&str> {
    self
      .descs
      .get(id as usize)
      .map(String::as_str)
      .ok_or_else(|| crate::make_internal_report!("descriptor id {id} is not interned in this index"))
  }

  pub fn descs(&self) -> &[String] {
    &self.descs
  }

  /// Rebuilds the intern table from an ordered list of descriptions, e.g.
  /// after deserializing an index from disk (spec §4.G: the wire format
  /// stores the table once, up front, and every `Loc` after it refers back
  /// by position).
  pub fn set_descs(&mut self, descs: Vec<String>) {
    self.desc_ids = descs.iter().enumerate().map(|(i, d)| (d.clone(), i as u32)).collect();
    self.descs = descs;
  }

  /// Total number of nodes in the index, root included.
  pub fn node_count(&self) -> usize {
    self.root.count()
  }
}

impl Default for GTreeIndex {
  fn default() -> Self {
    Self::new()
  }
}
