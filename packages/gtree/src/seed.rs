//! The seeder: for each start position in a query read, walks the trie as
//! far as an exact match goes and collects the surviving locations into a
//! bounded, deduplicated top-K list.

use crate::alphabet::BasePair;
use crate::consts::{MAX_NUM_SEEDS, MIN_SEED_LEN};
use crate::index::GTreeIndex;
use crate::node::Loc;

/// One candidate seed: a location in the reference, how many bases of the
/// query matched exactly from its start position, and where in the query
/// that match started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
  pub query_start: usize,
  pub match_len: usize,
  pub desc: u32,
  pub ref_pos: u64,
}

/// Finds the longest exact-prefix match in `index` starting at every
/// position of `query`, and returns up to [`MAX_NUM_SEEDS`] of the longest,
/// most-distinct candidates across the whole read.
///
/// A candidate shorter than [`MIN_SEED_LEN`] is discarded outright. Two
/// candidates in the same contig whose reference positions are within
/// `query.len()` bases of each other are treated as the same underlying
/// match — the ignore distance scales with the read rather than being a
/// fixed constant, since what counts as "nearby" depends on how long a
/// read could plausibly span. Candidates are visited in production order
/// (ascending query start, then location order within a node) and a
/// near-duplicate is checked only against whatever is currently kept: the
/// first candidate to claim a neighborhood wins it, a later, shorter one at
/// the same neighborhood does not evict it.
pub fn seed_read(index: &GTreeIndex, query: &[BasePair]) -> Vec<Seed> {
  let ignore_dist = query.len() as u64;
  let mut kept: Vec<Seed> = Vec::with_capacity(MAX_NUM_SEEDS);

  for start in 0..query.len() {
    let Some((match_len, locs)) = longest_prefix_match(index, &query[start..]) else {
      continue;
    };
    if match_len < MIN_SEED_LEN {
      continue;
    }
    for loc in locs {
      let Some(desc) = loc.desc else { continue };
      consider(
        &mut kept,
        Seed {
          query_start: start,
          match_len,
          desc,
          ref_pos: loc.pos,
        },
        ignore_dist,
      );
    }
  }
  kept
}

/// Inserts `cand` into `kept` (sorted by descending `match_len`, capacity
/// [`MAX_NUM_SEEDS`]), unless a seed already kept is within `ignore_dist` of
/// it in the same contig, or `kept` is full and nothing in it is strictly
/// shorter than `cand`.
fn consider(kept: &mut Vec<Seed>, cand: Seed, ignore_dist: u64) {
  let near_existing = kept.iter().any(|s| s.desc == cand.desc && abs_diff(s.ref_pos, cand.ref_pos) < ignore_dist);
  if near_existing {
    return;
  }
  let insert_at = kept.partition_point(|s| s.match_len >= cand.match_len);
  if kept.len() < MAX_NUM_SEEDS {
    kept.insert(insert_at, cand);
  } else if cand.match_len > kept.last().map(|s| s.match_len).unwrap_or(0) {
    kept.pop();
    kept.insert(insert_at, cand);
  }
}

fn abs_diff(a: u64, b: u64) -> u64 {
  a.max(b) - a.min(b)
}

/// Walks `query` from the root as far as an exact path exists (stopping at
/// the first base with no matching child, at the trie's maximum depth, or
/// at an ambiguous/`N` query base, which simply has no child to descend
/// into). Returns the number of bases matched and the locations recorded at
/// the deepest node reached, if any bases matched at all.
///
/// A `too_full` node's location list is stale by construction (spec §4.I):
/// it holds only the first [`crate::consts::MAX_LOCS_PER_NODE`] locations
/// ever registered there, not a representative sample, so it is reported as
/// empty rather than surfaced as if it were a complete, trustworthy set.
fn longest_prefix_match<'a>(index: &'a GTreeIndex, query: &[BasePair]) -> Option<(usize, &'a [Loc])> {
  let mut node = &index.root;
  let mut depth = 0;

  for &bp in query.iter().take(crate::consts::MAX_WINDOW_SIZE) {
    let Some(child) = node.descend(bp) else { break };
    node = child;
    depth += 1;
  }

  if depth == 0 {
    return None;
  }
  if node.too_full {
    Some((depth, &[]))
  } else {
    Some((depth, &node.locs[..node.n_matches as usize]))
  }
}

#[cfg(test)]
mod seed_tests {
  use super::*;
  use crate::alphabet::char_to_bp;
  use crate::builder;
  use crate::consts::MAX_WINDOW_SIZE;
  use pretty_assertions::assert_eq;
  use rstest::rstest;
  use std::io::Cursor;

  fn as_bps(s: &str) -> Vec<BasePair> {
    s.bytes().map(char_to_bp).collect()
  }

  #[rstest]
  fn finds_an_exact_full_window_match() -> eyre::Result<()> {
    let seq = "ACGT".repeat(MAX_WINDOW_SIZE / 4);
    let index = builder::build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;

    let seeds = seed_read(&index, &as_bps(&seq));
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].match_len, MAX_WINDOW_SIZE);
    assert_eq!(seeds[0].ref_pos, 0);
    assert_eq!(index.desc(seeds[0].desc)?, "chr1");
    Ok(())
  }

  #[rstest]
  fn a_match_shorter_than_min_seed_len_is_discarded() -> eyre::Result<()> {
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let index = builder::build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;

    // a read that diverges from the reference after a handful of bases.
    let query = as_bps(&format!("{}{}", "A".repeat(MIN_SEED_LEN - 1), "C".repeat(10)));
    let seeds = seed_read(&index, &query);
    assert!(seeds.is_empty());
    Ok(())
  }

  #[rstest]
  fn a_too_full_node_contributes_no_seeds() -> eyre::Result<()> {
    // five contigs sharing the same W-length prefix push that node past
    // MAX_LOCS_PER_NODE (4) and into too_full; none of its (stale) first
    // four locations should be surfaced as a seed.
    let seq = "A".repeat(MAX_WINDOW_SIZE);
    let mut fasta = String::new();
    for i in 0..(crate::consts::MAX_LOCS_PER_NODE + 1) {
      fasta.push_str(&format!(">chr{i}\n{seq}\n"));
    }
    let index = builder::build(Cursor::new(fasta.into_bytes()))?;
    let node_is_too_full = {
      let mut node = &index.root;
      for c in seq.bytes() {
        node = node.descend(char_to_bp(c)).unwrap();
      }
      node.too_full
    };
    assert!(node_is_too_full);

    let seeds = seed_read(&index, &as_bps(&seq));
    assert!(seeds.is_empty());
    Ok(())
  }

  #[rstest]
  fn near_duplicate_seeds_at_the_same_node_collapse_to_one() -> eyre::Result<()> {
    // a uniform run one base longer than the window: positions 0 and 1
    // both produce the identical window "A" * W, landing two Locs (pos 0
    // and pos 1, one base apart) at the very same trie node.
    let seq = "A".repeat(MAX_WINDOW_SIZE + 1);
    let index = builder::build(Cursor::new(format!(">chr1\n{seq}\n").into_bytes()))?;

    let seeds = seed_read(&index, &as_bps(&"A".repeat(MAX_WINDOW_SIZE)));
    assert_eq!(seeds.len(), 1);
    Ok(())
  }

  #[rstest]
  fn consider_keeps_the_first_seen_near_duplicate_even_when_a_later_one_is_longer() {
    // production order visits the shorter match first; a global
    // sort-then-dedup would let the longer duplicate win, but the spec's
    // online top-K is first-seen-wins, not longest-wins.
    let mut kept = Vec::new();
    consider(
      &mut kept,
      Seed {
        query_start: 0,
        match_len: 20,
        desc: 0,
        ref_pos: 100,
      },
      50,
    );
    consider(
      &mut kept,
      Seed {
        query_start: 1,
        match_len: 30,
        desc: 0,
        ref_pos: 101,
      },
      50,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].match_len, 20);
    assert_eq!(kept[0].ref_pos, 100);
  }

  #[rstest]
  fn consider_uses_a_strict_inequality_for_the_ignore_distance() {
    // exactly `ignore_dist` apart must NOT collapse; spec calls for a
    // strict `<`, not `<=`.
    let mut kept = Vec::new();
    consider(
      &mut kept,
      Seed {
        query_start: 0,
        match_len: 20,
        desc: 0,
        ref_pos: 100,
      },
      5,
    );
    consider(
      &mut kept,
      Seed {
        query_start: 1,
        match_len: 20,
        desc: 0,
        ref_pos: 105,
      },
      5,
    );
    assert_eq!(kept.len(), 2);
  }

  #[rstest]
  fn consider_only_displaces_the_worst_kept_seed_when_strictly_longer() {
    let mut kept: Vec<Seed> = (0..MAX_NUM_SEEDS)
      .map(|i| Seed {
        query_start: i,
        match_len: 25,
        desc: i as u32,
        ref_pos: (i as u64) * 1000,
      })
      .collect();

    // a tie with the current worst must not displace it.
    consider(
      &mut kept,
      Seed {
        query_start: 99,
        match_len: 25,
        desc: 999,
        ref_pos: 999_000,
      },
      5,
    );
    assert!(!kept.iter().any(|s| s.desc == 999));

    // strictly longer than the worst does displace it.
    consider(
      &mut kept,
      Seed {
        query_start: 100,
        match_len: 26,
        desc: 1000,
        ref_pos: 1_000_000,
      },
      5,
    );
    assert!(kept.iter().any(|s| s.desc == 1000));
    assert_eq!(kept.len(), MAX_NUM_SEEDS);
  }

  /// Builds a pseudo-random but deterministic window keyed on `i`, so each
  /// `i` names a window whose content diverges from every other `i`'s
  /// window within the first few bases rather than sharing a long common
  /// prefix (a shared-prefix encoding, e.g. plain low-order digits of `i`,
  /// would let unrelated windows collide at one trie node and defeat the
  /// point of this test).
  fn distinct_window(i: usize) -> String {
    let mut state = (i as u64).wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..MAX_WINDOW_SIZE)
      .map(|_| {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        match (state >> 60) & 0b11 {
          0 => 'A',
          1 => 'C',
          2 => 'G',
          _ => 'T',
        }
      })
      .collect()
  }

  #[rstest]
  fn caps_results_at_max_num_seeds() -> eyre::Result<()> {
    let n = MAX_NUM_SEEDS + 5;
    let mut fasta = String::new();
    let mut query = String::new();
    for i in 0..n {
      let window = distinct_window(i);
      fasta.push_str(&format!(">chr{i}\n{window}\n"));
      query.push_str(&window);
    }
    let index = builder::build(Cursor::new(fasta.into_bytes()))?;

    let seeds = seed_read(&index, &as_bps(&query));
    assert_eq!(seeds.len(), MAX_NUM_SEEDS);
    Ok(())
  }
}
