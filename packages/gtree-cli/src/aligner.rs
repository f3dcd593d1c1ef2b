//! Glues the seeder to the extender and SAM emission: for each read, take
//! its best seed, pull a flanking slice of reference around it, extend,
//! and translate the result into SAM coordinates.

use gtree::consts::REF_PADDING_LEN;
use gtree::refio::RefAccessor;
use gtree::GTreeIndex;

use crate::extend::{extend, ScoringSchema};
use crate::fastq::FastqRecord;
use crate::sam::SamRecord;

pub struct Aligner<'a> {
  index: &'a GTreeIndex,
  ref_acc: RefAccessor,
  scoring: ScoringSchema,
}

impl<'a> Aligner<'a> {
  pub fn new(index: &'a GTreeIndex, ref_acc: RefAccessor) -> Self {
    Self {
      index,
      ref_acc,
      scoring: ScoringSchema::default(),
    }
  }

  /// Clones this aligner's reference accessor (independent file handle)
  /// for use from another worker thread, sharing the same `index`.
  pub fn try_clone(&self) -> eyre::Result<Self> {
    Ok(Self {
      index: self.index,
      ref_acc: self.ref_acc.try_clone()?,
      scoring: self.scoring,
    })
  }

  pub fn align(&mut self, record: &FastqRecord) -> eyre::Result<SamRecord> {
    let seeds = gtree::seed::seed_read(self.index, &record.seq);

    let Some(seed) = seeds.first() else {
      return Ok(SamRecord::unmapped(&record.template_id, &seq_to_string(&record.seq), &record.qual));
    };

    let desc = self.index.desc(seed.desc)?.to_owned();
    // per the seed-extension handoff: read REF_PADDING_LEN flanking bases
    // on either side of the seed, clamped so the window never starts
    // before the contig's first base.
    let window_start = seed.ref_pos.saturating_sub(REF_PADDING_LEN as u64);
    let window_len = record.seq.len() + 2 * REF_PADDING_LEN;
    let (flank, _actual_len) = self.ref_acc.refcpy(&desc, window_start, window_len)?;

    match extend(&record.seq, &flank, &self.scoring) {
      Some(ext) => Ok(SamRecord {
        qname: record.template_id.clone(),
        flag: 0,
        rname: desc,
        pos: window_start + ext.ref_start as u64 + 1,
        mapq: "*".to_owned(),
        cigar: ext.cigar,
        seq: seq_to_string(&record.seq),
        qual: record.qual.clone(),
      }),
      None => {
        log::warn!("read {} seeded but found no valid alignment start during extension", record.template_id);
        Ok(SamRecord::unmapped(&record.template_id, &seq_to_string(&record.seq), &record.qual))
      }
    }
  }
}

pub(crate) fn seq_to_string(seq: &[gtree::alphabet::BasePair]) -> String {
  seq.iter().map(|&b| gtree::alphabet::bp_to_char(b) as char).collect()
}
