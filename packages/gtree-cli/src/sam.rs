//! Minimal SAM emission: `@SQ` headers plus one alignment record per
//! extended seed, matching the field table the legacy `align.c` emitted via
//! `print_sequence_headers`/`ssw_write_sam`.

use std::io::Write;

/// One alignment record, already in SAM coordinate space (`pos` is
/// 1-based).
#[derive(Debug, Clone)]
pub struct SamRecord {
  pub qname: String,
  pub flag: u16,
  pub rname: String,
  pub pos: u64,
  /// Always `"*"` per spec §6's field table — this crate keeps no
  /// second-best-alignment comparison to derive a mapping quality from.
  pub mapq: String,
  pub cigar: String,
  pub seq: String,
  pub qual: String,
}

pub const FLAG_UNMAPPED: u16 = 0x04;

impl SamRecord {
  /// A record for a read that produced no usable extension.
  pub fn unmapped(qname: &str, seq: &str, qual: &str) -> Self {
    Self {
      qname: qname.to_owned(),
      flag: FLAG_UNMAPPED,
      rname: "*".to_owned(),
      pos: 0,
      mapq: "*".to_owned(),
      cigar: "*".to_owned(),
      seq: seq.to_owned(),
      qual: qual.to_owned(),
    }
  }
}

/// Writes the `@SQ` header lines, one per reference contig, in the order
/// given.
pub fn write_headers<W: Write>(out: &mut W, contigs: &[(String, u64)]) -> eyre::Result<()> {
  writeln!(out, "@HD\tVN:1.6\tSO:unsorted")?;
  for (name, len) in contigs {
    writeln!(out, "@SQ\tSN:{name}\tLN:{len}")?;
  }
  Ok(())
}

pub fn write_record<W: Write>(out: &mut W, rec: &SamRecord) -> eyre::Result<()> {
  writeln!(
    out,
    "{}\t{}\t{}\t{}\t{}\t{}\t*\t0\t0\t{}\t{}",
    rec.qname, rec.flag, rec.rname, rec.pos, rec.mapq, rec.cigar, rec.seq, rec.qual
  )?;
  Ok(())
}
