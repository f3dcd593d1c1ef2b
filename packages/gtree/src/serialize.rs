//! Binary index format: a fixed header, the interned description table,
//! then a depth-first pre-order dump of the trie.
//!
//! Layout (all multi-byte integers little-endian, via [`byteorder`]):
//!
//! ```text
//! magic           4 bytes, ASCII "GTRI"
//! format_version  u8
//! window_size     u8   -- MAX_WINDOW_SIZE this index was built with
//! max_locs        u8   -- MAX_LOCS_PER_NODE this index was built with
//! desc_count      u32
//! desc_count * {
//!   len           u16
//!   bytes         `len` bytes, utf8, not nul-terminated
//! }
//! node            -- the root, see below
//!
//! node := {
//!   flags         u8   -- bit 0: too_full; bits 1-4: A/C/G/T child present
//!   n_matches     u8
//!   n_matches * {
//!     desc        i32  -- interned id, or -1 for a mask sentinel
//!     pos         u64
//!   }
//!   -- then, for each bit set in flags bits 1-4, in A, C, G, T order, a
//!   -- nested `node`
//! }
//! ```
//!
//! A corrupt or truncated file produces an `eyre::Report` from the
//! underlying `byteorder`/`io` read failure; this module does not attempt
//! to recover partial indexes.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::consts::{MAX_LOCS_PER_NODE, MAX_WINDOW_SIZE};
use crate::index::GTreeIndex;
use crate::node::{GTreeNode, Loc};

const MAGIC: &[u8; 4] = b"GTRI";
const FORMAT_VERSION: u8 = 1;

pub fn write<W: Write>(index: &GTreeIndex, mut out: W) -> eyre::Result<()> {
  out.write_all(MAGIC)?;
  out.write_u8(FORMAT_VERSION)?;
  out.write_u8(MAX_WINDOW_SIZE as u8)?;
  out.write_u8(MAX_LOCS_PER_NODE as u8)?;

  let descs = index.descs();
  out.write_u32::<LittleEndian>(descs.len() as u32)?;
  for desc in descs {
    let bytes = desc.as_bytes();
    out.write_u16::<LittleEndian>(bytes.len() as u16)?;
    out.write_all(bytes)?;
  }

  write_node(&index.root, &mut out)
}

fn write_node<W: Write>(node: &GTreeNode, out: &mut W) -> eyre::Result<()> {
  let mut flags = if node.too_full { 0x01 } else { 0x00 };
  for (i, child) in node.next.iter().enumerate() {
    if child.is_some() {
      flags |= 1 << (i + 1);
    }
  }
  out.write_u8(flags)?;
  out.write_u8(node.n_matches)?;
  for loc in &node.locs[..node.n_matches as usize] {
    let desc = loc.desc.map(|d| d as i32).unwrap_or(-1);
    out.write_i32::<LittleEndian>(desc)?;
    out.write_u64::<LittleEndian>(loc.pos)?;
  }
  for child in node.next.iter().flatten() {
    write_node(child, out)?;
  }
  Ok(())
}

pub fn read<R: Read>(mut src: R) -> eyre::Result<GTreeIndex> {
  let mut magic = [0u8; 4];
  src.read_exact(&mut magic)?;
  if &magic != MAGIC {
    return Err(eyre::eyre!("not a g-tree index: bad magic {magic:?}"));
  }
  let version = src.read_u8()?;
  if version != FORMAT_VERSION {
    return Err(eyre::eyre!("unsupported g-tree index format version {version}"));
  }
  let window_size = src.read_u8()?;
  if window_size as usize != MAX_WINDOW_SIZE {
    return Err(eyre::eyre!(
      "index was built with window size {window_size}, this binary uses {MAX_WINDOW_SIZE}"
    ));
  }
  let max_locs = src.read_u8()?;
  if max_locs as usize != MAX_LOCS_PER_NODE {
    return Err(eyre::eyre!(
      "index was built with {max_locs} locations per node, this binary uses {MAX_LOCS_PER_NODE}"
    ));
  }

  let desc_count = src.read_u32::<LittleEndian>()?;
  let mut descs = Vec::with_capacity(desc_count as usize);
  for _ in 0..desc_count {
    let len = src.read_u16::<LittleEndian>()?;
    let mut buf = vec![0u8; len as usize];
    src.read_exact(&mut buf)?;
    descs.push(String::from_utf8(buf).map_err(|e| eyre::eyre!("description is not valid utf8: {e}"))?);
  }

  let mut index = GTreeIndex::new();
  index.set_descs(descs);
  index.root = read_node(&mut src)?;
  Ok(index)
}

fn read_node<R: Read>(src: &mut R) -> eyre::Result<GTreeNode> {
  let flags = src.read_u8()?;
  let n_matches = src.read_u8()?;
  let mut node = GTreeNode::new();
  node.too_full = flags & 0x01 != 0;
  node.n_matches = n_matches;
  for slot in node.locs[..n_matches as usize].iter_mut() {
    let desc = src.read_i32::<LittleEndian>()?;
    let pos = src.read_u64::<LittleEndian>()?;
    *slot = Loc {
      desc: if desc < 0 { None } else { Some(desc as u32) },
      pos,
    };
  }
  for i in 0..4 {
    if flags & (1 << (i + 1)) != 0 {
      node.next[i] = Some(Box::new(read_node(src)?));
    }
  }
  Ok(node)
}
