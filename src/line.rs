//! Byte-buffer line indexing, binary detection, and line-oriented
//! comparators.

use std::sync::Arc;

use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::sequence::Sequence;

const LF: u8 = b'\n';
const CR: u8 = b'\r';
const NUL: u8 = 0;

/// The minimum number of leading bytes [`is_binary`]/[`is_crlf_text`] must
/// scan before giving up and declaring the buffer text.
pub const MIN_BINARY_SCAN_LEN: usize = 8 * 1024;

/// Returns `true` if `data` looks like binary content rather than text: it
/// contains a NUL byte, or a `CR` not immediately followed by `LF` while the
/// buffer is known to be complete (no more bytes could arrive to complete the
/// pair).
///
/// The scan is limited to `max(length.unwrap_or(data.len()),
/// MIN_BINARY_SCAN_LEN)` bytes so that detection stays cheap on huge inputs.
pub fn is_binary(data: &[u8], length: Option<usize>, complete: bool) -> bool {
    let scan_len = length.unwrap_or(data.len()).max(MIN_BINARY_SCAN_LEN).min(data.len());
    let head = &data[..scan_len];
    let mut i = 0;
    while i < head.len() {
        match head[i] {
            NUL => return true,
            CR => {
                let has_lf = head.get(i + 1) == Some(&LF);
                if !has_lf {
                    // A CR at the very end of a truncated scan might be
                    // followed by an LF we haven't seen yet.
                    if i + 1 == head.len() && !complete && scan_len < data.len() {
                        // inconclusive, keep scanning past it normally
                    } else if i + 1 == head.len() && !complete {
                        // end of buffer, but caller says more bytes may follow
                    } else {
                        return true;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

/// Returns `true` iff `data` contains at least one `CR LF` pair and does not
/// look binary per [`is_binary`].
pub fn is_crlf_text(data: &[u8], length: Option<usize>, complete: bool) -> bool {
    if is_binary(data, length, complete) {
        return false;
    }
    let scan_len = length.unwrap_or(data.len()).max(MIN_BINARY_SCAN_LEN).min(data.len());
    data[..scan_len].windows(2).any(|w| w == [CR, LF])
}

/// djb2 hash over a byte slice, as specified for [`LineComparator`].
#[inline]
pub fn djb2(bytes: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &b in bytes {
        h = h.wrapping_shl(5).wrapping_add(h).wrapping_add(b as u32);
    }
    h
}

/// Build the line-start table for the range `[p, e)` of
/// `buf`. `table[0]` is an unused sentinel, `table[1] == p`, each later entry
/// is one past the previous `LF`, and the final entry equals `e`.
fn build_line_table(buf: &[u8], p: usize, e: usize) -> Vec<u32> {
    let mut table = Vec::with_capacity(2 + (e - p) / 36);
    table.push(0); // sentinel
    table.push(p as u32);
    let mut pos = p;
    while pos < e {
        match buf[pos..e].iter().position(|&b| b == LF) {
            Some(off) => {
                pos += off + 1;
                table.push(pos as u32);
            }
            None => break,
        }
    }
    if *table.last().unwrap() != e as u32 {
        table.push(e as u32);
    }
    table
}

/// A byte buffer paired with a table of line starts, forming an opaque
/// [`Sequence`] of lines.
///
/// Cheaply cloneable: the buffer and line table are both held behind `Arc`,
/// which is what allows [`HashedSequence`](crate::hashed::HashedSequence) and
/// [`Subsequence`](crate::subsequence::Subsequence) to copy the handle
/// instead of borrowing it.
#[derive(Clone, Debug)]
pub struct LineSequence {
    buf: Arc<[u8]>,
    lines: Arc<[u32]>,
}

impl LineSequence {
    /// Index the whole buffer as lines, delimited by `0x0A`.
    pub fn new(buf: impl Into<Arc<[u8]>>) -> Self {
        let buf: Arc<[u8]> = buf.into();
        let lines = build_line_table(&buf, 0, buf.len());
        Self {
            buf,
            lines: lines.into(),
        }
    }

    /// Index a sub-range `[begin, end)` of the buffer.
    pub fn with_range(buf: impl Into<Arc<[u8]>>, begin: usize, end: usize) -> Self {
        let buf: Arc<[u8]> = buf.into();
        let lines = build_line_table(&buf, begin, end);
        Self {
            buf,
            lines: lines.into(),
        }
    }

    /// Binary-safe construction: raises [`Error::BinaryBlob`] if the buffer
    /// contains a NUL or a lone `CR` (per [`is_binary`]) before indexing.
    pub fn new_binary_safe(buf: impl Into<Arc<[u8]>>, complete: bool) -> Result<Self> {
        let buf: Arc<[u8]> = buf.into();
        if is_binary(&buf, None, complete) {
            return Err(Error::BinaryBlob);
        }
        Ok(Self::new(buf))
    }

    /// The raw backing buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The full byte range of line `i` (0-indexed), including its trailing
    /// `LF` if present.
    pub fn line_bytes(&self, i: u32) -> &[u8] {
        let start = self.lines[i as usize + 1] as usize;
        let end = self.lines[i as usize + 2] as usize;
        &self.buf[start..end]
    }

    /// Line `i`'s bytes with any trailing `LF` stripped. This is what
    /// [`write_line`](Self::write_line) emits: the formatter is responsible
    /// for re-adding the newline.
    pub fn line_without_eol(&self, i: u32) -> &[u8] {
        let line = self.line_bytes(i);
        match line.last() {
            Some(&LF) => &line[..line.len() - 1],
            _ => line,
        }
    }

    /// Returns `true` if line `i` had no trailing `LF` in the source buffer
    /// (only possible for the final line).
    pub fn line_missing_eol(&self, i: u32) -> bool {
        self.line_bytes(i).last() != Some(&LF)
    }

    /// Writes line `i` (without its trailing `LF`) to `out`. Matches
    /// the line writer: callers that need newline-terminated output
    /// add the `LF` themselves.
    pub fn write_line(&self, i: u32, out: &mut Vec<u8>) {
        out.extend_from_slice(self.line_without_eol(i));
    }
}

impl Sequence for LineSequence {
    fn len(&self) -> u32 {
        self.lines.len() as u32 - 2
    }
}

/// Line-delimiter-inclusive equality and djb2 hashing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineComparator;

impl Comparator<LineSequence> for LineComparator {
    fn eq(&self, a: &LineSequence, i: u32, b: &LineSequence, j: u32) -> bool {
        a.line_bytes(i) == b.line_bytes(j)
    }

    fn hash(&self, s: &LineSequence, i: u32) -> u32 {
        djb2(s.line_bytes(i))
    }

    fn reduce_common_start_end(&self, a: &LineSequence, b: &LineSequence, edit: &mut crate::edit::Edit) {
        // Byte-level reduction across the touched lines, then snap back to
        // whole-line boundaries, as specified for the LineSequence
        // specialization.
        while edit.begin_a < edit.end_a
            && edit.begin_b < edit.end_b
            && self.eq(a, edit.begin_a, b, edit.begin_b)
        {
            edit.begin_a += 1;
            edit.begin_b += 1;
        }
        while edit.end_a > edit.begin_a
            && edit.end_b > edit.begin_b
            && self.eq(a, edit.end_a - 1, b, edit.end_b - 1)
        {
            edit.end_a -= 1;
            edit.end_b -= 1;
        }
    }
}

/// Which whitespace-insensitivity mode a [`WhitespaceLineComparator`] uses.
///
/// Optional: these comparators round-trip under
/// [`diff`](crate::diff::diff) but are not merge-strategy aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitespaceMode {
    /// Collapse every run of ASCII whitespace (including none) to nothing
    /// before comparing: `"a  b"` == `"ab"` == `" a b "`.
    IgnoreAll,
    /// Ignore leading ASCII whitespace only.
    IgnoreLeading,
    /// Ignore trailing ASCII whitespace only (but not the line's own
    /// delimiter, which is never whitespace-folded away).
    IgnoreTrailing,
    /// Collapse interior runs of ASCII whitespace to a single space, and
    /// ignore leading/trailing whitespace.
    IgnoreChange,
}

/// A line comparator that folds whitespace per [`WhitespaceMode`] before
/// comparing or hashing.
#[derive(Debug, Clone, Copy)]
pub struct WhitespaceLineComparator {
    /// The folding rule to apply before comparing or hashing a line.
    pub mode: WhitespaceMode,
}

impl WhitespaceLineComparator {
    /// Builds a comparator that folds whitespace per `mode`.
    pub fn new(mode: WhitespaceMode) -> Self {
        Self { mode }
    }

    fn normalized(&self, line: &[u8]) -> Vec<u8> {
        let is_ws = |b: u8| b == b' ' || b == b'\t';
        // The trailing line-delimiter is never folded.
        let (body, eol) = match line.last() {
            Some(&LF) => (&line[..line.len() - 1], &line[line.len() - 1..]),
            _ => (line, &line[line.len()..]),
        };
        let body = match line.len() >= 2 && body.last() == Some(&CR) {
            true => &body[..body.len() - 1],
            false => body,
        };
        let mut out = Vec::with_capacity(body.len());
        match self.mode {
            WhitespaceMode::IgnoreAll => {
                out.extend(body.iter().copied().filter(|&b| !is_ws(b)));
            }
            WhitespaceMode::IgnoreLeading => {
                let trimmed = {
                    let mut i = 0;
                    while i < body.len() && is_ws(body[i]) {
                        i += 1;
                    }
                    &body[i..]
                };
                out.extend_from_slice(trimmed);
            }
            WhitespaceMode::IgnoreTrailing => {
                let mut end = body.len();
                while end > 0 && is_ws(body[end - 1]) {
                    end -= 1;
                }
                out.extend_from_slice(&body[..end]);
            }
            WhitespaceMode::IgnoreChange => {
                let mut i = 0;
                let mut pending_space = false;
                let mut started = false;
                while i < body.len() {
                    if is_ws(body[i]) {
                        if started {
                            pending_space = true;
                        }
                        while i < body.len() && is_ws(body[i]) {
                            i += 1;
                        }
                    } else {
                        if pending_space {
                            out.push(b' ');
                            pending_space = false;
                        }
                        out.push(body[i]);
                        started = true;
                        i += 1;
                    }
                }
            }
        }
        out.extend_from_slice(eol);
        out
    }
}

impl Comparator<LineSequence> for WhitespaceLineComparator {
    fn eq(&self, a: &LineSequence, i: u32, b: &LineSequence, j: u32) -> bool {
        self.normalized(a.line_bytes(i)) == self.normalized(b.line_bytes(j))
    }

    fn hash(&self, s: &LineSequence, i: u32) -> u32 {
        djb2(&self.normalized(s.line_bytes(i)))
    }
}
