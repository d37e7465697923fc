//! The algorithm-selection enum and the trait both diff backends implement.

use crate::cancel::CancellationToken;
use crate::comparator::Comparator;
use crate::edit::EditList;
use crate::error::Result;

/// A half-open rectangle `[begin_a, end_a) x [begin_b, end_b)` of two
/// sequences that an algorithm has been asked to diff.
///
/// Distinct from [`Edit`](crate::edit::Edit): a region is an input bound, not
/// an output edit, and both algorithms recurse by shrinking it without ever
/// allocating a new [`Subsequence`](crate::subsequence::Subsequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Start of the region in `A` (inclusive).
    pub begin_a: u32,
    /// End of the region in `A` (exclusive).
    pub end_a: u32,
    /// Start of the region in `B` (inclusive).
    pub begin_b: u32,
    /// End of the region in `B` (exclusive).
    pub end_b: u32,
}

impl Region {
    /// Build a region from its four bounds.
    pub fn new(begin_a: u32, end_a: u32, begin_b: u32, end_b: u32) -> Self {
        Self {
            begin_a,
            end_a,
            begin_b,
            end_b,
        }
    }

    /// The length of the `A`-side span.
    pub fn len_a(&self) -> u32 {
        self.end_a - self.begin_a
    }

    /// The length of the `B`-side span.
    pub fn len_b(&self) -> u32 {
        self.end_b - self.begin_b
    }

    /// `true` if both spans are empty.
    pub fn is_empty(&self) -> bool {
        self.len_a() == 0 && self.len_b() == 0
    }
}

/// Implemented by each diff backend (Myers, Histogram). `diff_non_common`
/// assumes common prefix/suffix trimming has already happened and that
/// `region` contains no leading or trailing match.
pub trait DiffAlgorithm<S, C: Comparator<S>> {
    /// Diffs `region`, appending the resulting edits to `out`.
    fn diff_non_common(
        &self,
        cmp: &C,
        a: &S,
        b: &S,
        region: Region,
        out: &mut EditList,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Which backend [`diff`](crate::diff::diff) should run.
///
/// `Histogram` falls back to `Myers` whenever its hash chains get too dense
/// to search cheaply; this fallback is not configurable, matching the fixed
/// two-member enum this crate exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Bidirectional-bisection O(ND) diff. Always produces a minimal edit
    /// script.
    Myers,
    /// Patience-style diff anchored on low-occurrence common elements.
    /// Usually more readable than Myers, at the cost of not always being
    /// minimal. Falls back to Myers on pathologically repetitive input.
    #[default]
    Histogram,
}
