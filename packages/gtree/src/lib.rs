//! `gtree` is a fixed-depth, four-way prefix trie index over short
//! reference k-mers, built for exact-prefix seeding of short reads against
//! a small-to-moderate reference (viral genomes, bacterial plasmids,
//! targeted amplicon panels — not whole mammalian genomes).
//!
//! A built index maps every exact k-mer of length [`consts::MAX_WINDOW_SIZE`]
//! occurring in a reference FASTA to up to [`consts::MAX_LOCS_PER_NODE`]
//! locations; an optional mask pass intersects the index against a second
//! FASTA to flag shared, non-specific k-mers for pruning. [`seed::seed_read`]
//! is the read side: given a query, it returns the longest exact matches at
//! every start position, deduplicated and capped.
//!
//! This crate owns the index's data structures and algorithms. It does not
//! parse FASTQ, run a Smith-Waterman extension, or emit SAM — those live in
//! the `gtree-cli` binary crate, which treats this crate as a library.

pub mod alphabet;
pub mod builder;
pub mod consts;
pub mod index;
pub mod mask;
pub mod node;
pub mod prune;
pub mod refio;
pub mod scan;
pub mod seed;
pub mod serialize;
pub mod utils;

pub use index::GTreeIndex;
pub use node::{GTreeNode, Loc};
pub use seed::Seed;
