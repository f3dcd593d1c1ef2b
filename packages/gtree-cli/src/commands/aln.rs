//! Handler for `gtree aln`: seeds and extends every read in a FASTQ file
//! against a built index, in parallel.
//!
//! Mirrors the tradeoff the teacher's own `nextalign` run command exposes
//! through `--jobs`/`-j` and `--in-order`: read-only lookups on a
//! fully-built index are safe to parallelize (spec §5), so a worker pool
//! processes reads concurrently, each with its own [`gtree::refio::RefAccessor`]
//! clone so no file handle crosses threads. `--in-order` trades a little
//! latency and memory for a SAM file whose record order matches the input
//! FASTQ; without it, records are written as soon as they're ready.

use std::fs::File;
use std::io::{stdout, BufReader, BufWriter, Write};

use crossbeam_channel::bounded;
use eyre::Context as _;
use rayon::prelude::*;

use crate::aligner::{seq_to_string, Aligner};
use crate::cli::AlnArgs;
use crate::fastq::FastqReader;
use crate::sam::{self, SamRecord};

pub fn run(args: AlnArgs) -> eyre::Result<()> {
  let index_file =
    File::open(&args.index).wrap_err_with(|| format!("failed to open index {}", args.index.display()))?;
  let index = gtree::serialize::read(index_file).wrap_err("failed to read index")?;

  let ref_acc = gtree::refio::RefAccessor::open(&args.reference)
    .wrap_err_with(|| format!("failed to open reference {}", args.reference.display()))?;
  let contigs: Vec<(String, u64)> = index
    .descs()
    .iter()
    .map(|desc| ref_acc.contig_len(desc).map(|len| (desc.clone(), len)))
    .collect::<eyre::Result<_>>()
    .wrap_err("reference does not contain every contig named in the index")?;
  let aligner = Aligner::new(&index, ref_acc);

  let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);

  let records = match (&args.reads, &args.literal_read) {
    (Some(reads_path), _) => {
      log::info!("aligning {} with {jobs} worker thread(s)", reads_path.display());
      let fastq_file =
        File::open(reads_path).wrap_err_with(|| format!("failed to open reads {}", reads_path.display()))?;
      FastqReader::new(BufReader::new(fastq_file))
        .collect::<eyre::Result<Vec<_>>>()
        .wrap_err("failed to parse FASTQ input")?
    }
    (None, Some(literal)) => {
      log::info!("aligning one literal read with {jobs} worker thread(s)");
      vec![crate::fastq::FastqRecord {
        template_id: "literal_read".to_owned(),
        seq: literal.bytes().map(gtree::alphabet::char_to_bp).collect(),
        qual: "I".repeat(literal.len()),
      }]
    }
    (None, None) => unreachable!("clap's \"input\" ArgGroup requires one of --reads/--read-literal"),
  };

  let mut out: Box<dyn Write> = match &args.output {
    Some(path) => Box::new(BufWriter::new(
      File::create(path).wrap_err_with(|| format!("failed to create {}", path.display()))?,
    )),
    None => Box::new(BufWriter::new(stdout())),
  };
  sam::write_headers(&mut out, &contigs)?;

  let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build().wrap_err("failed to start worker pool")?;

  if args.in_order {
    let results: Vec<SamRecord> = pool.install(|| {
      records
        .par_iter()
        .map_init(
          || aligner.try_clone().expect("failed to clone aligner for a worker thread"),
          |worker, record| align_or_unmapped(worker, record),
        )
        .collect()
    });
    for record in &results {
      sam::write_record(&mut out, record)?;
    }
  } else {
    let (tx, rx) = bounded::<SamRecord>(jobs * 4);
    pool.scope(|scope| {
      for record in &records {
        let tx = tx.clone();
        let mut worker = aligner.try_clone().expect("failed to clone aligner for a worker thread");
        scope.spawn(move |_| {
          let result = align_or_unmapped(&mut worker, record);
          // the receiving end only drops once every send has landed, so a
          // failed send here would mean the channel closed early, which
          // would itself be a bug in this loop's scope management.
          tx.send(result).expect("result channel closed while workers were still running");
        });
      }
    });
    drop(tx);
    for record in rx {
      sam::write_record(&mut out, &record)?;
    }
  }

  out.flush()?;
  Ok(())
}

fn align_or_unmapped(worker: &mut Aligner<'_>, record: &crate::fastq::FastqRecord) -> SamRecord {
  worker.align(record).unwrap_or_else(|e| {
    log::warn!("alignment failed for read {}: {e}", record.template_id);
    SamRecord::unmapped(&record.template_id, &seq_to_string(&record.seq), &record.qual)
  })
}
