//! Reference accessor: random-access reads of bases out of a FASTA file,
//! backed by a small on-disk `.refix` sidecar so repeated lookups don't
//! re-scan the whole file.
//!
//! The accessor assumes each contig's sequence is a single line (no
//! wrapping): `refcpy` needs `offset + pos` to address a base directly, and
//! a wrapped FASTA would need a newline-skipping correction on every read.
//! Pre-processing a wrapped file into this shape is outside this crate's
//! scope (spec §4.H); `gtree-cli` messages the user to `ix build`-style
//! tools elsewhere when the assumption doesn't hold.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::alphabet::{char_to_bp, BasePair};

const REFIX_MAGIC: &[u8; 4] = b"RFIX";
const REFIX_VERSION: u8 = 1;

#[derive(Debug, Clone)]
struct ContigEntry {
  offset: u64,
  len: u64,
}

/// The `.refix` sidecar contents: byte offset and length of each contig's
/// single sequence line within the `.fa` file.
#[derive(Debug, Clone, Default)]
struct RefIndex {
  by_desc: HashMap<String, ContigEntry>,
}

impl RefIndex {
  fn scan(fa_path: &Path) -> eyre::Result<Self> {
    let file = File::open(fa_path)?;
    let mut reader = BufReader::new(file);
    let mut by_desc = HashMap::new();
    let mut pos: u64 = 0;
    let mut line = Vec::new();
    loop {
      line.clear();
      // `n` is the raw bytes `read_until` consumed, including the line
      // terminator it then strips from `line`; `pos` must advance by `n`
      // (the file's actual byte count), not by the terminator-stripped
      // `line.len()`, or every offset after the first line drifts onto the
      // terminator byte.
      let n = read_line_bytes(&mut reader, &mut line)? as u64;
      if n == 0 {
        break;
      }
      if line.first() == Some(&b'>') {
        let desc = String::from_utf8_lossy(&line[1..]).trim().to_owned();
        let seq_offset = pos + n;
        pos += n;

        line.clear();
        let n_seq = read_line_bytes(&mut reader, &mut line)? as u64;
        let seq_len = line.len() as u64;
        by_desc.insert(desc, ContigEntry { offset: seq_offset, len: seq_len });
        pos += n_seq;
      } else {
        pos += n;
      }
    }
    Ok(Self { by_desc })
  }

  fn write_to(&self, mut out: impl Write) -> eyre::Result<()> {
    out.write_all(REFIX_MAGIC)?;
    out.write_u8(REFIX_VERSION)?;
    out.write_u32::<LittleEndian>(self.by_desc.len() as u32)?;
    for (desc, entry) in &self.by_desc {
      let bytes = desc.as_bytes();
      out.write_u16::<LittleEndian>(bytes.len() as u16)?;
      out.write_all(bytes)?;
      out.write_u64::<LittleEndian>(entry.offset)?;
      out.write_u64::<LittleEndian>(entry.len)?;
    }
    Ok(())
  }

  fn read_from(mut src: impl Read) -> eyre::Result<Self> {
    let mut magic = [0u8; 4];
    src.read_exact(&mut magic)?;
    if &magic != REFIX_MAGIC {
      return Err(eyre::eyre!("not a .refix sidecar: bad magic {magic:?}"));
    }
    let version = src.read_u8()?;
    if version != REFIX_VERSION {
      return Err(eyre::eyre!("unsupported .refix format version {version}"));
    }
    let count = src.read_u32::<LittleEndian>()?;
    let mut by_desc = HashMap::with_capacity(count as usize);
    for _ in 0..count {
      let len = src.read_u16::<LittleEndian>()?;
      let mut buf = vec![0u8; len as usize];
      src.read_exact(&mut buf)?;
      let desc = String::from_utf8(buf).map_err(|e| eyre::eyre!("description is not valid utf8: {e}"))?;
      let offset = src.read_u64::<LittleEndian>()?;
      let seq_len = src.read_u64::<LittleEndian>()?;
      by_desc.insert(desc, ContigEntry { offset, len: seq_len });
    }
    Ok(Self { by_desc })
  }
}

fn read_line_bytes(reader: &mut impl BufRead, out: &mut Vec<u8>) -> eyre::Result<usize> {
  let n = reader.read_until(b'\n', out)?;
  while matches!(out.last(), Some(b'\n') | Some(b'\r')) {
    out.pop();
  }
  Ok(n)
}

/// Random-access reader over one reference `.fa` file.
pub struct RefAccessor {
  fa_path: PathBuf,
  file: File,
  index: RefIndex,
}

impl RefAccessor {
  /// Opens `fa_path`, loading `<fa_path>.refix` if present and building (and
  /// persisting) it otherwise.
  pub fn open(fa_path: impl AsRef<Path>) -> eyre::Result<Self> {
    let fa_path = fa_path.as_ref().to_path_buf();
    let refix_path = refix_path_for(&fa_path);
    let index = match File::open(&refix_path) {
      Ok(f) => {
        log::debug!("loading reference index from {}", refix_path.display());
        RefIndex::read_from(BufReader::new(f))?
      }
      Err(_) => {
        log::info!("building reference index for {}", fa_path.display());
        let index = RefIndex::scan(&fa_path)?;
        let out = File::create(&refix_path)?;
        index.write_to(out)?;
        index
      }
    };
    let file = File::open(&fa_path)?;
    Ok(Self { fa_path, file, index })
  }

  /// Duplicates this accessor's file handle so it can be handed to another
  /// thread (spec §5: one `File` handle must not be used from more than one
  /// thread at a time; each worker gets its own).
  pub fn try_clone(&self) -> eyre::Result<Self> {
    Ok(Self {
      fa_path: self.fa_path.clone(),
      file: self.file.try_clone()?,
      index: self.index.clone(),
    })
  }

  /// Copies up to `len` bases starting at `offset` out of contig `desc`,
  /// stopping at the contig's end rather than padding past it (spec §4.H):
  /// returns the bases actually read along with `actual_len =
  /// min(len, contig_len - offset)`, the number of bases among them that
  /// came from real reference sequence. A caller asking for a flank that
  /// runs past a contig's end (e.g. [`crate::consts::REF_PADDING_LEN`]
  /// bases around a seed near the boundary) gets a short result back
  /// instead of a failure or silent padding; it is the caller's
  /// responsibility to clamp `offset` itself to stay non-negative (spec
  /// §4.J), since a contig has no notion of "before its first base".
  pub fn refcpy(&mut self, desc: &str, offset: u64, len: usize) -> eyre::Result<(Vec<BasePair>, usize)> {
    let entry = self
      .index
      .by_desc
      .get(desc)
      .cloned()
      .ok_or_else(|| eyre::eyre!("no such reference contig: {desc}"))?;

    let actual_len = if offset >= entry.len { 0 } else { len.min((entry.len - offset) as usize) };

    let mut out = Vec::with_capacity(actual_len);
    if actual_len > 0 {
      self.file.seek(SeekFrom::Start(entry.offset + offset))?;
      let mut buf = vec![0u8; actual_len];
      self.file.read_exact(&mut buf)?;
      out.extend(buf.iter().map(|&b| char_to_bp(b)));
    }
    Ok((out, actual_len))
  }

  /// Length of contig `desc`, or an error if it is not present in this
  /// reference.
  pub fn contig_len(&self, desc: &str) -> eyre::Result<u64> {
    self.index.by_desc.get(desc).map(|e| e.len).ok_or_else(|| eyre::eyre!("no such reference contig: {desc}"))
  }
}

fn refix_path_for(fa_path: &Path) -> PathBuf {
  let mut s = fa_path.as_os_str().to_owned();
  s.push(".refix");
  PathBuf::from(s)
}
