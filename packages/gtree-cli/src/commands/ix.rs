//! Handlers for `gtree ix build|mask|prune|stat`.

use std::fs::File;
use std::io::BufWriter;

use eyre::Context as _;

use crate::cli::{IxArgs, IxBuildArgs, IxCommands, IxMaskArgs, IxPruneArgs, IxStatArgs};

pub fn run(args: IxArgs) -> eyre::Result<()> {
  match args.command {
    IxCommands::Build(a) => build(a),
    IxCommands::Mask(a) => mask(a),
    IxCommands::Prune(a) => prune(a),
    IxCommands::Stat(a) => stat(a),
  }
}

fn build(args: IxBuildArgs) -> eyre::Result<()> {
  log::info!("building index from {}", args.reference.display());
  let src = File::open(&args.reference)
    .wrap_err_with(|| format!("failed to open reference FASTA {}", args.reference.display()))?;
  let index = gtree::builder::build(src).wrap_err("failed to build index")?;
  log::info!("built index with {} nodes, {} contigs", index.node_count(), index.descs().len());

  let out = File::create(&args.output).wrap_err_with(|| format!("failed to create {}", args.output.display()))?;
  gtree::serialize::write(&index, BufWriter::new(out)).wrap_err("failed to write index")?;
  Ok(())
}

fn mask(args: IxMaskArgs) -> eyre::Result<()> {
  log::info!("masking index {} against {}", args.index.display(), args.mask_reference.display());
  let src = File::open(&args.index).wrap_err_with(|| format!("failed to open index {}", args.index.display()))?;
  let mut index = gtree::serialize::read(src).wrap_err("failed to read index")?;

  let mask_src = File::open(&args.mask_reference)
    .wrap_err_with(|| format!("failed to open mask FASTA {}", args.mask_reference.display()))?;
  gtree::mask::apply(&mut index, mask_src).wrap_err("failed to apply mask")?;

  let out = File::create(&args.output).wrap_err_with(|| format!("failed to create {}", args.output.display()))?;
  gtree::serialize::write(&index, BufWriter::new(out)).wrap_err("failed to write masked index")?;
  Ok(())
}

fn prune(args: IxPruneArgs) -> eyre::Result<()> {
  log::info!("pruning index {}", args.index.display());
  let src = File::open(&args.index).wrap_err_with(|| format!("failed to open index {}", args.index.display()))?;
  let mut index = gtree::serialize::read(src).wrap_err("failed to read index")?;

  let before = index.node_count();
  gtree::prune::prune(&mut index);
  log::info!("pruned {} nodes ({} -> {})", before - index.node_count(), before, index.node_count());

  let out = File::create(&args.output).wrap_err_with(|| format!("failed to create {}", args.output.display()))?;
  gtree::serialize::write(&index, BufWriter::new(out)).wrap_err("failed to write pruned index")?;
  Ok(())
}

fn stat(args: IxStatArgs) -> eyre::Result<()> {
  let src = File::open(&args.index).wrap_err_with(|| format!("failed to open index {}", args.index.display()))?;
  let index = gtree::serialize::read(src).wrap_err("failed to read index")?;

  println!("nodes: {}", index.node_count());
  println!("contigs: {}", index.descs().len());
  for desc in index.descs() {
    println!("  {desc}");
  }
  Ok(())
}
