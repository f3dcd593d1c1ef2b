//! The 4-symbol (plus `N` and the internal `NOBP` sentinel) base-pair
//! alphabet, and a small buffered reader with LIFO pushback used to replay
//! bytes after a window reset.

use std::io::Read;

/// A single base-pair symbol.
///
/// Only `A`, `C`, `G`, `T` can index into a g-tree node's `next` array; `N`
/// forces a window reset during build/mask. `NoBp` is an internal sentinel
/// never produced by [`char_to_bp`] and never stored in a built index; it
/// exists so callers that need a "no base here" value (e.g. padding past
/// the end of a reference contig) have one without reaching for `Option`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BasePair {
  A = 0,
  C = 1,
  G = 2,
  T = 3,
  N = 4,
  NoBp = 5,
}

impl BasePair {
  /// The four symbols that index into a g-tree node's children, in build
  /// order (A, C, G, T). Used whenever code needs to iterate "all real
  /// bases" rather than match on them individually.
  pub const ACGT: [BasePair; 4] = [BasePair::A, BasePair::C, BasePair::G, BasePair::T];

  /// Index into a `next`/`locs`-shaped `[T; 4]` array, if this symbol is a
  /// real base. `N` and `NoBp` have no such index.
  pub const fn child_index(self) -> Option<usize> {
    match self {
      BasePair::A => Some(0),
      BasePair::C => Some(1),
      BasePair::G => Some(2),
      BasePair::T => Some(3),
      BasePair::N | BasePair::NoBp => None,
    }
  }
}

/// Maps a FASTA/FASTQ byte to a [`BasePair`]. Case-insensitive. Any byte
/// that is not one of `ACGTNacgtn` is folded to `N` and the caller is
/// expected to log a warning (this function has no side effects so that it
/// stays usable in hot loops and in contexts, like query reads, where an
/// illegal character is not actually an error).
pub const fn char_to_bp(c: u8) -> BasePair {
  match c {
    b'A' | b'a' => BasePair::A,
    b'C' | b'c' => BasePair::C,
    b'G' | b'g' => BasePair::G,
    b'T' | b't' => BasePair::T,
    _ => BasePair::N,
  }
}

/// Inverse of [`char_to_bp`] for the four real bases, plus `N`. Panics on
/// [`BasePair::NoBp`], which should never reach a point where it needs to be
/// printed.
pub fn bp_to_char(b: BasePair) -> u8 {
  match b {
    BasePair::A => b'A',
    BasePair::C => b'C',
    BasePair::G => b'G',
    BasePair::T => b'T',
    BasePair::N => b'N',
    BasePair::NoBp => unreachable!("attempted to marshall BasePair::NoBp to a character"),
  }
}

/// A byte-oriented reader with a last-in-first-out pushback buffer.
///
/// The legacy C implementation kept `PUSHBACK_BUFFER`/`PUSHBACK_POS` as
/// process-wide globals (see `original_source/src/gtree.c`). Per the design
/// notes, this reimplementation scopes the buffer to one instance owned by
/// whichever builder is using it, so that multiple builds could eventually
/// run concurrently without sharing mutable state.
pub struct BufferedReader<R> {
  inner: R,
  /// Pushback stack; last element is the next byte `get()` will return.
  pushback: Vec<u8>,
}

impl<R: Read> BufferedReader<R> {
  pub fn new(inner: R) -> Self {
    Self {
      inner,
      pushback: Vec::with_capacity(crate::consts::MAX_WINDOW_SIZE),
    }
  }

  /// Reads one byte, preferring the pushback stack over the underlying
  /// reader. Returns `None` at end of stream.
  pub fn get(&mut self) -> eyre::Result<Option<u8>> {
    if let Some(b) = self.pushback.pop() {
      return Ok(Some(b));
    }
    let mut buf = [0u8; 1];
    match self.inner.read(&mut buf)? {
      0 => Ok(None),
      _ => Ok(Some(buf[0])),
    }
  }

  /// Pushes a byte back so the next `get()` returns it. LIFO: the most
  /// recently pushed-back byte is read first.
  pub fn unget(&mut self, b: u8) {
    self.pushback.push(b);
  }
}
