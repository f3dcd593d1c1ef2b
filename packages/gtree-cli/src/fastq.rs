//! A minimal streaming FASTQ reader: 4-line records, no line-wrapping, no
//! multi-line sequences — the format every short-read sequencer actually
//! emits.

use std::io::BufRead;

use gtree::alphabet::{char_to_bp, BasePair};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
  pub template_id: String,
  pub seq: Vec<BasePair>,
  pub qual: String,
}

/// Wraps a `BufRead` and yields one [`FastqRecord`] per `Iterator::next`
/// call. A malformed record (wrong line count, mismatched seq/qual
/// lengths) surfaces as `Some(Err(_))`; the reader does not try to resync.
pub struct FastqReader<R> {
  lines: std::io::Lines<R>,
}

impl<R: BufRead> FastqReader<R> {
  pub fn new(src: R) -> Self {
    Self { lines: src.lines() }
  }
}

impl<R: BufRead> Iterator for FastqReader<R> {
  type Item = eyre::Result<FastqRecord>;

  fn next(&mut self) -> Option<Self::Item> {
    let header = match self.lines.next()? {
      Ok(l) => l,
      Err(e) => return Some(Err(e.into())),
    };
    Some(self.read_record(header))
  }
}

impl<R: BufRead> FastqReader<R> {
  fn read_record(&mut self, header: String) -> eyre::Result<FastqRecord> {
    let Some(template_id) = header.strip_prefix('@') else {
      return Err(eyre::eyre!("FASTQ record header does not start with '@': {header:?}"));
    };
    let seq_line = self
      .lines
      .next()
      .ok_or_else(|| eyre::eyre!("truncated FASTQ record: missing sequence line after {header:?}"))??;
    let plus_line = self
      .lines
      .next()
      .ok_or_else(|| eyre::eyre!("truncated FASTQ record: missing '+' line after {header:?}"))??;
    if !plus_line.starts_with('+') {
      return Err(eyre::eyre!("expected '+' separator line, found {plus_line:?}"));
    }
    let qual = self
      .lines
      .next()
      .ok_or_else(|| eyre::eyre!("truncated FASTQ record: missing quality line after {header:?}"))??;
    if qual.len() != seq_line.len() {
      return Err(eyre::eyre!(
        "sequence and quality lines differ in length for read {template_id}: {} vs {}",
        seq_line.len(),
        qual.len()
      ));
    }
    Ok(FastqRecord {
      template_id: template_id.to_owned(),
      seq: seq_line.bytes().map(char_to_bp).collect(),
      qual,
    })
  }
}

#[cfg(test)]
mod fastq_tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rstest::rstest;
  use std::io::Cursor;

  #[rstest]
  fn reads_a_well_formed_record() -> eyre::Result<()> {
    let data = "@read1\nACGT\n+\nFFFF\n";
    let mut reader = FastqReader::new(Cursor::new(data));
    let rec = reader.next().unwrap()?;
    assert_eq!(rec.template_id, "read1");
    assert_eq!(rec.seq, vec![BasePair::A, BasePair::C, BasePair::G, BasePair::T]);
    assert_eq!(rec.qual, "FFFF");
    assert!(reader.next().is_none());
    Ok(())
  }

  #[rstest]
  fn reads_multiple_records() -> eyre::Result<()> {
    let data = "@r1\nAC\n+\nFF\n@r2\nGT\n+\nFF\n";
    let mut reader = FastqReader::new(Cursor::new(data));
    assert_eq!(reader.next().unwrap()?.template_id, "r1");
    assert_eq!(reader.next().unwrap()?.template_id, "r2");
    assert!(reader.next().is_none());
    Ok(())
  }

  #[rstest]
  fn mismatched_seq_and_qual_length_is_an_error() {
    let data = "@r1\nACGT\n+\nFF\n";
    let mut reader = FastqReader::new(Cursor::new(data));
    assert!(reader.next().unwrap().is_err());
  }

  #[rstest]
  fn missing_at_prefix_is_an_error() {
    let data = "r1\nACGT\n+\nFFFF\n";
    let mut reader = FastqReader::new(Cursor::new(data));
    assert!(reader.next().unwrap().is_err());
  }
}
