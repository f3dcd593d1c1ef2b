//! Second-pass masking: intersects an already-built index against a second
//! FASTA without growing the trie, marking shared k-mers with a sentinel
//! location so a later prune can drop them.

use std::io::Read;

use crate::alphabet::BasePair;
use crate::index::GTreeIndex;
use crate::node::Loc;
use crate::scan::StepOutcome;

/// Walks every window of `mask_src` through `index`'s existing structure
/// and registers a sentinel [`Loc`] (`desc: None`) at every depth it
/// reaches.
///
/// No node is ever created by this pass (spec §4.E): a base that would need
/// a child the trie does not already have is reported as
/// [`StepOutcome::Blocked`], which tells the scan to abandon that window
/// without touching the structure and retry one position later, exactly as
/// if it had encountered an `N`. Which contig of `mask_src` a match came
/// from is irrelevant (masking answers "does this k-mer occur at all in
/// the mask genome", not "where"), so headers in `mask_src` only matter for
/// resetting the window at contig boundaries.
pub fn apply<R: Read>(index: &mut GTreeIndex, mask_src: R) -> eyre::Result<()> {
  let index_ref = &mut *index;
  crate::scan::scan_fasta(
    mask_src,
    |_desc| None,
    |window, _desc_id, _start| mark_step(index_ref, window),
  )
}

fn mark_step(index: &mut GTreeIndex, window: &[BasePair]) -> eyre::Result<StepOutcome> {
  let mut node = &mut index.root;
  for &bp in window {
    match node.descend_mut(bp) {
      Some(child) => node = child,
      None => return Ok(StepOutcome::Blocked),
    }
  }
  node.register_loc(Loc::sentinel());
  Ok(StepOutcome::Accepted)
}

#[cfg(test)]
mod mask_tests {
  use super::*;
  use crate::alphabet::char_to_bp;
  use crate::builder;
  use crate::consts::MAX_WINDOW_SIZE;
  use pretty_assertions::assert_eq;
  use rstest::rstest;
  use std::io::Cursor;

  fn walk<'a>(index: &'a GTreeIndex, kmer: &str) -> Option<&'a crate::node::GTreeNode> {
    let mut node = &index.root;
    for c in kmer.bytes() {
      node = node.descend(char_to_bp(c))?;
    }
    Some(node)
  }

  #[rstest]
  fn masking_a_shared_kmer_adds_a_sentinel_location() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let mut index = builder::build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;
    let before = walk(&index, &seq).unwrap().n_matches;

    apply(&mut index, Cursor::new(format!(">mask\n{seq}\n").into_bytes()))?;

    let node = walk(&index, &seq).unwrap();
    assert_eq!(node.n_matches, before + 1);
    assert!(node.locs[before as usize].desc.is_none());
    Ok(())
  }

  #[rstest]
  fn masking_also_marks_every_shorter_shared_prefix() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let mut index = builder::build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;

    apply(&mut index, Cursor::new(format!(">mask\n{seq}\n").into_bytes()))?;

    for depth in 1..MAX_WINDOW_SIZE {
      let node = walk(&index, &"A".repeat(depth)).unwrap_or_else(|| panic!("depth {depth} should survive masking"));
      assert!(node.locs[..node.n_matches as usize].iter().any(|l| l.desc.is_none()), "depth {depth} missing sentinel");
    }
    Ok(())
  }

  #[rstest]
  fn masking_never_creates_new_nodes() -> eyre::Result<()> {
    let seq_a = "A".repeat(MAX_WINDOW_SIZE);
    let seq_c = "C".repeat(MAX_WINDOW_SIZE);
    let mut index = builder::build(Cursor::new(format!(">chr1\n{seq_a}\n").into_bytes()))?;
    let before = index.node_count();

    apply(&mut index, Cursor::new(format!(">mask\n{seq_c}\n").into_bytes()))?;

    assert_eq!(index.node_count(), before);
    assert!(walk(&index, &seq_c).is_none());
    Ok(())
  }

  #[rstest]
  fn masking_a_node_past_capacity_sets_too_full_without_growing_locs() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let long_seq = "A".repeat(MAX_WINDOW_SIZE + crate::consts::MAX_LOCS_PER_NODE - 1);
    let mut index = builder::build(Cursor::new(format!(">chr1\n{long_seq}\n").into_bytes()))?;
    let node = walk(&index, &seq).unwrap();
    assert_eq!(node.n_matches as usize, crate::consts::MAX_LOCS_PER_NODE);
    assert!(!node.too_full);

    apply(&mut index, Cursor::new(format!(">mask\n{seq}\n").into_bytes()))?;

    let node = walk(&index, &seq).unwrap();
    assert!(node.too_full);
    assert_eq!(node.n_matches as usize, crate::consts::MAX_LOCS_PER_NODE);
    Ok(())
  }

  #[rstest]
  fn a_missing_child_abandons_the_window_without_mutating_the_structure() -> eyre::Result<()> {
    // mask source diverges from the reference after a handful of bases; the
    // walk for the long shared prefix must be abandoned (no panic, no
    // partial mutation) and retried one base later, the same way an `N`
    // would be handled.
    let ref_seq = format!("{}{}", "A".repeat(10), "C".repeat(MAX_WINDOW_SIZE));
    let mut index = builder::build(Cursor::new(format!(">chr1\n{ref_seq}\n").into_bytes()))?;
    let before = index.node_count();

    let mask_seq = format!("{}{}", "A".repeat(10), "G".repeat(MAX_WINDOW_SIZE));
    apply(&mut index, Cursor::new(format!(">mask\n{mask_seq}\n").into_bytes()))?;

    assert_eq!(index.node_count(), before);
    let shared_prefix = walk(&index, &"A".repeat(10)).unwrap();
    assert!(shared_prefix.locs[..shared_prefix.n_matches as usize].iter().any(|l| l.desc.is_none()));
    Ok(())
  }
}
