//! Constants baked into the g-tree wire format and seeding behavior.
//!
//! These are named parameters rather than inline literals because changing
//! any of them changes the on-disk index format's semantics (though not its
//! layout, see [`crate::serialize`]) and the seeder's output.

/// Trie depth. Also the minimum pushback capacity a builder's buffered
/// reader must provide, since a window reset can push back up to `W - 1`
/// bytes.
pub const MAX_WINDOW_SIZE: usize = 32;

/// Inline locations kept per g-tree node before it is marked `too_full`.
pub const MAX_LOCS_PER_NODE: usize = 4;

/// Maximum length of a FASTA contig description string.
pub const MAX_DESC_LEN: usize = 100;

/// Seed cutoff: a match shorter than this is discarded by the seeder.
pub const MIN_SEED_LEN: usize = 20;

/// Per-read candidate cap maintained by the seeder's bounded top-K heap.
pub const MAX_NUM_SEEDS: usize = 10;

/// Flanking bases read on either side of a seed before handing off to the
/// extender.
pub const REF_PADDING_LEN: usize = 50;

/// Upper bound on a formatted CIGAR string's length.
pub const MAX_CIGAR_STR_LEN: usize = 200;
