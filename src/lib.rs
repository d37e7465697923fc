#![deny(missing_docs)]
//! `seqmerge` computes textual diffs between two versions of a document and
//! performs three-way content merges on the resulting edit lists.
//!
//! It provides two diff algorithms:
//!
//! * The linear-space variant of the well known
//!   [**Myers** algorithm](http://www.xmailserver.org/diff2.pdf), via
//!   [`Algorithm::Myers`]. Always produces a minimal edit script.
//! * The **Histogram** algorithm, a patience-diff variant that anchors
//!   recursion on the lowest-occurrence common element in a region, via
//!   [`Algorithm::Histogram`] (the default). Usually more readable than
//!   Myers; falls back to it automatically on regions whose hash chains get
//!   too dense to search cheaply.
//!
//! Unlike diff libraries that hand algorithms a `&str`/`&[u8]` directly,
//! `seqmerge` never materializes the elements it compares: an algorithm only
//! ever asks a [`Comparator`] whether two positions are equal or what an
//! element's hash is. [`LineSequence`] is the concrete, line-oriented
//! [`Sequence`] this crate ships, but [`diff`] and [`merge`] work over any
//! type implementing the trait.
//!
//! # Diffing
//!
//! ```
//! use seqmerge::{diff, Algorithm, LineComparator, LineSequence};
//!
//! let a = LineSequence::new(&b"a\nb\nc\n"[..]);
//! let b = LineSequence::new(&b"a\nX\nc\n"[..]);
//! let edits = diff(Algorithm::Histogram, &LineComparator, &a, &b).unwrap();
//! assert_eq!(edits.len(), 1);
//! ```
//!
//! # Three-way merging
//!
//! ```
//! use seqmerge::{merge, format_merge, Algorithm, ContentMergeStrategy, LineComparator, LineSequence};
//!
//! let base = LineSequence::new(&b"x\nA\nB\nC\ny\n"[..]);
//! let ours = LineSequence::new(&b"x\nA\nP\nC\ny\n"[..]);
//! let theirs = LineSequence::new(&b"x\nA\nQ\nC\ny\n"[..]);
//!
//! let result = merge(
//!     ContentMergeStrategy::Conflict,
//!     Algorithm::Histogram,
//!     &LineComparator,
//!     base,
//!     ours,
//!     theirs,
//! )
//! .unwrap();
//! assert!(result.contains_conflicts);
//!
//! let mut out = Vec::new();
//! format_merge(&mut out, &result, ["BASE", "OURS", "THEIRS"]).unwrap();
//! ```
//!
//! # Cancellation
//!
//! Both [`diff_cancellable`] and [`merge_cancellable`] accept a
//! [`CancellationToken`] that a caller on another thread can trip to abort a
//! long-running computation cooperatively, returning [`Error::Interrupted`]
//! rather than blocking to completion.

mod algorithm;
mod cancel;
mod comparator;
mod diff;
mod edit;
mod error;
mod format;
mod hashed;
mod histogram;
mod line;
mod merge;
mod myers;
mod sequence;
mod subsequence;

pub use algorithm::{Algorithm, DiffAlgorithm, Region};
pub use cancel::CancellationToken;
pub use comparator::Comparator;
pub use diff::{diff, diff_cancellable};
pub use edit::{validate as validate_edit_list, Edit, EditKind, EditList};
pub use error::{Error, Result};
pub use format::{format_merge, format_merge_diff3, format_merge_two_way};
pub use hashed::{HashedSequence, HashedSequenceComparator};
pub use histogram::Histogram;
pub use line::{
    djb2, is_binary, is_crlf_text, LineComparator, LineSequence, WhitespaceLineComparator,
    WhitespaceMode, MIN_BINARY_SCAN_LEN,
};
pub use merge::{
    merge, merge_cancellable, ConflictState, ContentMergeStrategy, MergeChunk, MergeResult,
    SequenceIndex,
};
pub use myers::Myers;
pub use sequence::Sequence;
pub use subsequence::{Subsequence, SubsequenceComparator};

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> LineSequence {
        LineSequence::new(s.as_bytes().to_vec())
    }

    #[test]
    fn scenario_a_pure_insertion_in_the_middle() {
        let a = seq("a\nb\nc\n");
        let b = seq("a\nX\nY\nc\n");
        let edits = diff(Algorithm::Histogram, &LineComparator, &a, &b).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0], Edit::new(1, 2, 1, 3));
    }

    #[test]
    fn round_trip_reconstructs_b() {
        let a = seq("a\nb\nc\nd\ne\n");
        let b = seq("a\nX\nc\nd\nY\n");
        for algo in [Algorithm::Myers, Algorithm::Histogram] {
            let edits = diff(algo, &LineComparator, &a, &b).unwrap();
            assert!(validate_edit_list(&edits, a.len(), b.len()));

            let mut rebuilt = Vec::new();
            let mut cursor_a = 0;
            for e in &edits {
                while cursor_a < e.begin_a {
                    rebuilt.extend_from_slice(a.line_bytes(cursor_a));
                    cursor_a += 1;
                }
                for j in e.begin_b..e.end_b {
                    rebuilt.extend_from_slice(b.line_bytes(j));
                }
                cursor_a = e.end_a;
            }
            while cursor_a < a.len() {
                rebuilt.extend_from_slice(a.line_bytes(cursor_a));
                cursor_a += 1;
            }
            assert_eq!(rebuilt, b.bytes());
        }
    }

    #[test]
    fn idempotence_diff_a_a_is_empty() {
        let a = seq("repeated\nlines\nrepeated\n");
        for algo in [Algorithm::Myers, Algorithm::Histogram] {
            assert!(diff(algo, &LineComparator, &a, &a).unwrap().is_empty());
        }
    }

    #[test]
    fn merge_of_x_x_x_is_one_clean_chunk() {
        let x = seq("a\nb\nc\n");
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            x.clone(),
            x.clone(),
            x,
        )
        .unwrap();
        assert!(!result.contains_conflicts);
        assert_eq!(result.chunks.len(), 1);
    }

    #[test]
    fn formatter_emits_well_formed_conflict_markers() {
        let base = seq("a\nb\nc\n");
        let theirs = seq("a\nB\nc\n");
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            base,
            seq(""),
            theirs,
        )
        .unwrap();
        assert!(result.contains_conflicts);

        let mut out = Vec::new();
        format_merge(&mut out, &result, ["BASE", "OURS", "THEIRS"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<<<<<<< OURS\n"));
        assert!(text.contains("=======\n"));
        assert!(text.ends_with(">>>>>>> THEIRS\n"));
    }

    #[test]
    fn binary_detection_surfaces_as_error() {
        let err = LineSequence::new_binary_safe(&b"a\0b"[..], true).unwrap_err();
        assert_eq!(err, Error::BinaryBlob);
    }

    #[test]
    fn cancellation_is_observed_by_diff() {
        let a = seq("a\nb\nc\n");
        let b = seq("x\ny\nz\n");
        let token = CancellationToken::new();
        token.cancel();
        let result = diff_cancellable(Algorithm::Myers, &LineComparator, &a, &b, &token);
        assert_eq!(result.unwrap_err(), Error::Interrupted);
    }
}
