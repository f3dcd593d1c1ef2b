//! Command surface: five verbs under `ix` plus the top-level `aln`, mirroring
//! the legacy `gtree ix <verb>` / `gtree aln` split.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use lazy_static::lazy_static;

lazy_static! {
  static ref SHELLS: Vec<clap_complete::Shell> = vec![
    clap_complete::Shell::Bash,
    clap_complete::Shell::Zsh,
    clap_complete::Shell::Fish,
    clap_complete::Shell::PowerShell,
    clap_complete::Shell::Elvish,
  ];
}

#[derive(Parser, Debug)]
#[command(name = "gtree", about = "Build and query g-tree short-read seed indexes.")]
pub struct CliArgs {
  #[command(subcommand)]
  pub command: Commands,

  #[command(flatten)]
  pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Build, mask, prune, or inspect a g-tree index.
  Ix(IxArgs),
  /// Seed and align FASTQ reads against a built index.
  Aln(AlnArgs),
  /// Generate shell completion scripts.
  Completions {
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(SHELLS.iter().map(|s| s.to_string())))]
    shell: String,
  },
}

#[derive(clap::Args, Debug)]
pub struct IxArgs {
  #[command(subcommand)]
  pub command: IxCommands,
}

#[derive(Subcommand, Debug)]
pub enum IxCommands {
  /// Stream a reference FASTA into a brand-new index.
  Build(IxBuildArgs),
  /// Intersect an existing index against a second FASTA, in place.
  Mask(IxMaskArgs),
  /// Drop too-full leaves that carry no useful remaining locations.
  Prune(IxPruneArgs),
  /// Print summary statistics about an index.
  Stat(IxStatArgs),
}

#[derive(clap::Args, Debug)]
pub struct IxBuildArgs {
  /// Reference FASTA to index.
  #[arg(long, short = 'r')]
  pub reference: PathBuf,
  /// Where to write the built index.
  #[arg(long, short = 'o')]
  pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct IxMaskArgs {
  /// Index to mask, read from this path.
  pub index: PathBuf,
  /// FASTA to intersect the index against.
  #[arg(long, short = 'm')]
  pub mask_reference: PathBuf,
  /// Where to write the masked index.
  #[arg(long, short = 'o')]
  pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct IxPruneArgs {
  /// Index to prune, read from this path.
  pub index: PathBuf,
  /// Where to write the pruned index.
  #[arg(long, short = 'o')]
  pub output: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct IxStatArgs {
  /// Index to inspect.
  pub index: PathBuf,
}

#[derive(clap::Args, Debug)]
#[command(group(clap::ArgGroup::new("input").required(true).args(["reads", "literal_read"])))]
pub struct AlnArgs {
  /// Built g-tree index to seed against.
  pub index: PathBuf,
  /// Reference FASTA the index was built from (single sequence line per
  /// contig; a `.refix` sidecar is built next to it on first use).
  pub reference: PathBuf,
  /// FASTQ file of reads to align.
  #[arg(long, short = 'i')]
  pub reads: Option<PathBuf>,
  /// Align a single read given directly on the command line instead of a
  /// FASTQ file, assigned a synthetic template id and an all-max quality
  /// string.
  #[arg(long = "read-literal", short = 'l')]
  pub literal_read: Option<String>,
  /// Where to write the SAM output. Defaults to standard output.
  #[arg(long, short = 'o')]
  pub output: Option<PathBuf>,
  /// Worker thread count. Defaults to the number of logical CPUs.
  #[arg(long, short = 'j')]
  pub jobs: Option<usize>,
  /// Preserve input read order in the output, at the cost of buffering
  /// results that finish out of order.
  #[arg(long)]
  pub in_order: bool,
}
