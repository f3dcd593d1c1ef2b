//! `gtree`: build, mask, prune, and inspect g-tree seed indexes, and align
//! short reads against them.

mod aligner;
mod cli;
mod commands;
mod extend;
mod fastq;
mod sam;
mod utils;

use clap::Parser as _;

use crate::cli::{CliArgs, Commands};

fn main() -> eyre::Result<()> {
  color_eyre::install()?;
  let args = CliArgs::parse();
  utils::global_init::setup_logger(&args.verbosity);

  match args.command {
    Commands::Ix(args) => commands::ix::run(args),
    Commands::Aln(args) => commands::aln::run(args),
    Commands::Completions { shell } => print_completions(&shell),
  }
}

/// Writes a shell completion script for `shell` to stdout. `shell` is
/// validated against [`clap_complete::Shell`]'s `FromStr` impl by
/// [`cli::CliArgs`]'s value parser before this ever runs.
fn print_completions(shell: &str) -> eyre::Result<()> {
  let shell: clap_complete::Shell = shell.parse().map_err(|e| eyre::eyre!("unknown shell {shell:?}: {e}"))?;
  let mut cmd = <CliArgs as clap::CommandFactory>::command();
  let name = cmd.get_name().to_owned();
  clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
  Ok(())
}
