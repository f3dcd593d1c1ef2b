//! Shared FASTA-to-sliding-window plumbing used by both the builder (first
//! pass, grows the trie) and the masker (second pass, read-only structure).
//!
//! Both passes need the same header/window-reset bookkeeping; they differ
//! only in what happens at each step of a window's growth (grow the trie vs.
//! merely walk it) and in whether a new header gets interned. Factoring the
//! scan out keeps that bookkeeping — and its edge cases around `N`, contig
//! boundaries, and (for the masker) missing trie paths — in one place.
//!
//! Every window of length 1..=[`crate::consts::MAX_WINDOW_SIZE`] starting at
//! every valid contig position is visited, not just full-length windows: for
//! a window beginning at position `s`, `on_step` fires once per base as the
//! window grows from length 1 up to however far it gets before a reset, so a
//! caller that registers at every call ends up recording every shorter
//! prefix of the window, not only its longest one (spec §4.D).

use std::collections::VecDeque;
use std::io::Read;

use crate::alphabet::{bp_to_char, char_to_bp, BasePair, BufferedReader};
use crate::consts::{MAX_DESC_LEN, MAX_WINDOW_SIZE};

/// What happened when `on_step` tried to extend the current window by one
/// base.
pub enum StepOutcome {
  /// The base was registered (the builder always returns this; the masker
  /// returns it when the path it just walked already existed).
  Accepted,
  /// The base could not be registered without growing the trie (the
  /// masker's "no existing child" case, spec §4.E). The scan abandons the
  /// current window and retries starting one base later.
  Blocked,
}

/// Reads `src` as FASTA, replaying one window at a time through `on_step`.
///
/// `on_header` is invoked with each contig's description (the `>` line with
/// leading `>` stripped, trimmed, and truncated to
/// [`crate::consts::MAX_DESC_LEN`]) and returns whatever identifier should be
/// attached to windows from that contig — an interned description id for the
/// builder, or `None` for the masker, which does not care which contig of
/// the *second* file a match came from.
///
/// `on_step` is invoked once per base as a window grows, with the window's
/// full contents so far (oldest base first), the current contig's id, and
/// the window's 0-based start offset within that contig. A window resets —
/// its first base is permanently consumed and the rest replayed one
/// position later — on reaching [`MAX_WINDOW_SIZE`], on hitting `N` or a new
/// `>` header, or when `on_step` reports [`StepOutcome::Blocked`].
pub fn scan_fasta<R: Read>(
  src: R,
  mut on_header: impl FnMut(&str) -> Option<u32>,
  mut on_step: impl FnMut(&[BasePair], Option<u32>, u64) -> eyre::Result<StepOutcome>,
) -> eyre::Result<()> {
  let mut reader = BufferedReader::new(src);
  // Bytes queued for replay after a window reset, each tagged with its true
  // offset within the current contig so a resumed window knows where it
  // starts without having to recompute it from scratch.
  let mut pending: VecDeque<(u8, u64)> = VecDeque::new();
  let mut fresh_offset: u64 = 0;
  let mut desc_id: Option<u32> = None;
  let mut window: Vec<BasePair> = Vec::with_capacity(MAX_WINDOW_SIZE);
  let mut window_start: u64 = 0;

  loop {
    let (b, offset, is_fresh) = match pending.pop_front() {
      Some((b, offset)) => (b, offset, false),
      None => {
        let Some(b) = reader.get()? else { break };
        (b, fresh_offset, true)
      }
    };

    match b {
      b'>' => {
        if window.is_empty() {
          // invariant: nothing older remains in `pending` once a byte
          // reaches the front as a header trigger with an empty window, so
          // reading the header line straight off `reader` cannot skip over
          // queued replay bytes.
          let desc = read_header_line(&mut reader)?;
          desc_id = on_header(&desc);
          fresh_offset = 0;
        } else {
          reset_window(&mut pending, &mut window, window_start, Some((b, offset)));
          window_start += 1;
        }
      }
      b'\n' | b'\r' | b' ' | b'\t' => {}
      _ => {
        let bp = char_to_bp(b);
        if bp == BasePair::N {
          if is_fresh {
            fresh_offset += 1;
          }
          if !window.is_empty() {
            reset_window(&mut pending, &mut window, window_start, Some((b, offset)));
            window_start += 1;
          }
        } else {
          if is_fresh {
            fresh_offset += 1;
          }
          if window.is_empty() {
            window_start = offset;
          }
          window.push(bp);
          match on_step(&window, desc_id, window_start)? {
            StepOutcome::Accepted if window.len() == MAX_WINDOW_SIZE => {
              reset_window(&mut pending, &mut window, window_start, None);
              window_start += 1;
            }
            StepOutcome::Accepted => {}
            StepOutcome::Blocked => {
              reset_window(&mut pending, &mut window, window_start, None);
              window_start += 1;
            }
          }
        }
      }
    }
  }
  Ok(())
}

/// Abandons the current window: its first base is discarded for good, the
/// rest are queued for replay one position later (in order, at the front of
/// `pending` so they are seen before anything an earlier reset left behind),
/// and `trigger` — the byte that caused the reset, if it was not itself part
/// of `window` — is queued right after them.
fn reset_window(pending: &mut VecDeque<(u8, u64)>, window: &mut Vec<BasePair>, window_start: u64, trigger: Option<(u8, u64)>) {
  let replay = window.iter().enumerate().skip(1).map(|(i, &bp)| (bp_to_char(bp), window_start + i as u64));
  let replay: Vec<(u8, u64)> = replay.chain(trigger).collect();
  for pair in replay.into_iter().rev() {
    pending.push_front(pair);
  }
  window.clear();
}

/// Reads the remainder of a `>` header line: up to the terminating `\n`
/// (tolerating a preceding `\r`), trimmed and truncated to `MAX_DESC_LEN`
/// bytes. Uses [`BufferedReader::unget`] to push back a byte read while
/// probing for `\r\n` that turns out not to be part of the line ending.
fn read_header_line<R: Read>(reader: &mut BufferedReader<R>) -> eyre::Result<String> {
  let mut line = Vec::new();
  while let Some(b) = reader.get()? {
    match b {
      b'\n' => break,
      b'\r' => match reader.get()? {
        Some(b'\n') | None => break,
        Some(other) => {
          reader.unget(other);
          break;
        }
      },
      _ => line.push(b),
    }
  }
  let desc = String::from_utf8_lossy(&line);
  let desc = desc.trim();
  Ok(desc.chars().take(MAX_DESC_LEN).collect())
}
