//! First-pass index construction: streams a reference FASTA through
//! [`crate::scan::scan_fasta`] and grows the trie one window at a time.

use std::io::Read;

use crate::alphabet::BasePair;
use crate::index::GTreeIndex;
use crate::node::Loc;
use crate::scan::StepOutcome;

/// Builds a fresh [`GTreeIndex`] from a reference FASTA.
///
/// Every window of length 1..=[`crate::consts::MAX_WINDOW_SIZE`] starting at
/// every position with that many contiguous real bases ahead of it (no `N`,
/// no header crossed) is inserted into the trie: a [`Loc`] naming its
/// contig and 0-based start offset is registered at *every* depth the
/// window reaches, not only its longest one (spec §4.D), so a shorter
/// prefix shared with a longer window still resolves to the location where
/// it occurs.
pub fn build<R: Read>(src: R) -> eyre::Result<GTreeIndex> {
  let mut index = GTreeIndex::new();
  {
    let index_ref = &mut index;
    crate::scan::scan_fasta(
      src,
      |desc| Some(index_ref.intern_desc(desc)),
      |window, desc_id, start| insert_step(index_ref, window, desc_id, start),
    )?;
  }
  Ok(index)
}

fn insert_step(index: &mut GTreeIndex, window: &[BasePair], desc_id: Option<u32>, start: u64) -> eyre::Result<StepOutcome> {
  let desc_id = desc_id.ok_or_else(|| {
    crate::make_internal_report!("scan_fasta produced a window before any header was seen during build")
  })?;
  let mut node = &mut index.root;
  for &bp in window {
    node = node.get_or_create_child(bp);
  }
  node.register_loc(Loc {
    desc: Some(desc_id),
    pos: start,
  });
  Ok(StepOutcome::Accepted)
}

#[cfg(test)]
mod builder_tests {
  use super::*;
  use crate::alphabet::BasePair;
  use crate::consts::MAX_WINDOW_SIZE;
  use pretty_assertions::assert_eq;
  use rstest::rstest;
  use std::io::Cursor;

  fn walk<'a>(index: &'a GTreeIndex, kmer: &str) -> Option<&'a crate::node::GTreeNode> {
    let mut node = &index.root;
    for c in kmer.bytes() {
      node = node.descend(crate::alphabet::char_to_bp(c))?;
    }
    Some(node)
  }

  #[rstest]
  fn a_single_full_length_contig_produces_one_location() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let fasta = format!(">chr1\n{seq}\n");
    let index = build(Cursor::new(fasta.into_bytes()))?;
    let node = walk(&index, &"A".repeat(MAX_WINDOW_SIZE)).expect("window should have been inserted");
    assert_eq!(node.n_matches, 1);
    assert_eq!(node.locs[0].pos, 0);
    assert_eq!(index.desc(node.locs[0].desc.unwrap())?, "chr1");
    Ok(())
  }

  #[rstest]
  fn every_shorter_prefix_of_a_window_also_gets_a_location() -> eyre::Result<()> {
    // spec §4.D: not just the longest window starting at 0, but every
    // intermediate depth it passes through, must carry its own location.
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let index = build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;
    for depth in 1..=MAX_WINDOW_SIZE {
      let node = walk(&index, &"A".repeat(depth)).unwrap_or_else(|| panic!("depth {depth} should exist"));
      assert_eq!(node.n_matches, 1, "depth {depth} should carry exactly one location");
      assert_eq!(node.locs[0].pos, 0);
    }
    Ok(())
  }

  #[rstest]
  fn overlapping_windows_share_the_longest_common_prefix() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE + 2);
    let fasta = format!(">chr1\n{seq}\n");
    let index = build(Cursor::new(fasta.into_bytes()))?;
    // root -> A -> A -> ... should have three children worth of fan-out
    // collapsed into a single chain since every window here is all-A;
    // three distinct terminal nodes still exist only because pos differs,
    // but the path A^32 is shared, so it must have accumulated all 3 locs.
    let node = walk(&index, &"A".repeat(MAX_WINDOW_SIZE)).unwrap();
    assert_eq!(node.n_matches, 3);
    Ok(())
  }

  #[rstest]
  fn n_breaks_a_window_that_would_otherwise_complete() -> eyre::Result<()> {
    let fasta = format!(">chr1\n{}N{}\n", "A".repeat(MAX_WINDOW_SIZE - 1), "A".repeat(MAX_WINDOW_SIZE));
    let index = build(Cursor::new(fasta.into_bytes()))?;
    let node = walk(&index, &"A".repeat(MAX_WINDOW_SIZE)).unwrap();
    // only the post-N run of exactly W As completes a window.
    assert_eq!(node.n_matches, 1);
    Ok(())
  }

  #[rstest]
  fn two_contigs_keep_separate_locations() -> eyre::Result<()> {
    let fasta = format!(">chr1\n{0}\n>chr2\n{0}\n", "A".repeat(MAX_WINDOW_SIZE));
    let index = build(Cursor::new(fasta.into_bytes()))?;
    let node = walk(&index, &"A".repeat(MAX_WINDOW_SIZE)).unwrap();
    assert_eq!(node.n_matches, 2);
    let descs: Vec<_> = node.locs[..2].iter().map(|l| index.desc(l.desc.unwrap())).collect::<eyre::Result<_>>()?;
    assert_eq!(descs, vec!["chr1", "chr2"]);
    Ok(())
  }

  #[rstest]
  fn fifth_location_at_the_same_node_sets_too_full() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE + 4);
    let fasta = format!(">chr1\n{seq}\n");
    let index = build(Cursor::new(fasta.into_bytes()))?;
    let node = walk(&index, &"A".repeat(MAX_WINDOW_SIZE)).unwrap();
    assert!(node.too_full);
    assert_eq!(node.n_matches as usize, crate::consts::MAX_LOCS_PER_NODE);
    Ok(())
  }
}
