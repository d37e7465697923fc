use std::fmt;

/// How an [`Edit`] classifies the change it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// `lengthA == 0 && lengthB == 0`: no change at all. Never appears in a
    /// finalized [`EditList`].
    Empty,
    /// `lengthA == 0 && lengthB > 0`: a pure insertion into `B`.
    Insert,
    /// `lengthA > 0 && lengthB == 0`: a pure deletion from `A`.
    Delete,
    /// `lengthA > 0 && lengthB > 0`: a region of `A` replaced by a region of
    /// `B`.
    Replace,
}

/// A half-open rectangle `[begin_a, end_a) x [begin_b, end_b)` describing how
/// a region of sequence `B` replaces a region of sequence `A`.
///
/// All four bounds are non-negative and `begin_a <= end_a`, `begin_b <=
/// end_b`. An [`EditList`] holds these in ascending, non-overlapping order on
/// both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Start of the affected range in `A` (inclusive).
    pub begin_a: u32,
    /// End of the affected range in `A` (exclusive).
    pub end_a: u32,
    /// Start of the affected range in `B` (inclusive).
    pub begin_b: u32,
    /// End of the affected range in `B` (exclusive).
    pub end_b: u32,
}

impl Edit {
    /// Builds an edit, asserting the invariants every `Edit` in this crate
    /// must uphold.
    pub fn new(begin_a: u32, end_a: u32, begin_b: u32, end_b: u32) -> Self {
        debug_assert!(begin_a <= end_a);
        debug_assert!(begin_b <= end_b);
        Self {
            begin_a,
            end_a,
            begin_b,
            end_b,
        }
    }

    /// The length of the `A`-side range.
    pub fn length_a(&self) -> u32 {
        self.end_a - self.begin_a
    }

    /// The length of the `B`-side range.
    pub fn length_b(&self) -> u32 {
        self.end_b - self.begin_b
    }

    /// Classify this edit EMPTY/INSERT/DELETE/REPLACE.
    pub fn kind(&self) -> EditKind {
        match (self.length_a(), self.length_b()) {
            (0, 0) => EditKind::Empty,
            (0, _) => EditKind::Insert,
            (_, 0) => EditKind::Delete,
            _ => EditKind::Replace,
        }
    }

    /// `true` if both sides of this edit are empty.
    pub fn is_empty(&self) -> bool {
        self.kind() == EditKind::Empty
    }

    /// Translate all four bounds by `k` (may be negative).
    pub fn shift(&mut self, k: i64) {
        self.begin_a = (self.begin_a as i64 + k) as u32;
        self.end_a = (self.end_a as i64 + k) as u32;
        self.begin_b = (self.begin_b as i64 + k) as u32;
        self.end_b = (self.end_b as i64 + k) as u32;
    }

    /// Translate the `A`-side bounds by `da` and the `B`-side bounds by `db`
    /// independently. Used to map an edit found in a windowed
    /// [`Subsequence`](crate::subsequence::Subsequence)'s local coordinates
    /// back to the base sequence's coordinates.
    pub fn translated(&self, da: u32, db: u32) -> Edit {
        Edit::new(
            self.begin_a + da,
            self.end_a + da,
            self.begin_b + db,
            self.end_b + db,
        )
    }

    /// The portion of `self` before `cut` (an A-position). `cut` must lie
    /// within `[begin_a, end_a]`; the B-side is proportionally unavailable
    /// for REPLACE edits and only meaningful for pure INSERT/DELETE, which is
    /// the only case this crate calls it for (splitting around a middle
    /// edit's own bounds).
    pub fn before(&self, cut_a: u32, cut_b: u32) -> Edit {
        Edit::new(self.begin_a, cut_a, self.begin_b, cut_b)
    }

    /// The portion of `self` after `cut`. See [`before`](Self::before).
    pub fn after(&self, cut_a: u32, cut_b: u32) -> Edit {
        Edit::new(cut_a, self.end_a, cut_b, self.end_b)
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({},{},{},{})",
            self.kind(),
            self.begin_a,
            self.end_a,
            self.begin_b,
            self.end_b
        )
    }
}

/// An ordered, non-overlapping list of [`Edit`]s, sorted by `begin_a`.
///
/// Produced by [`diff`](crate::diff::diff) and consumed by
/// [`merge`](crate::merge::merge).
pub type EditList = Vec<Edit>;

/// Checks the invariants an [`EditList`] must uphold: bounds within `[0,
/// len]`, non-empty edits, strictly increasing and non-overlapping on both
/// axes. Intended for tests and debug assertions, not the hot path.
pub fn validate(edits: &EditList, len_a: u32, len_b: u32) -> bool {
    let mut prev: Option<&Edit> = None;
    for e in edits {
        if e.end_a > len_a || e.end_b > len_b {
            return false;
        }
        if e.is_empty() {
            return false;
        }
        if let Some(p) = prev {
            if e.begin_a < p.end_a || e.begin_b < p.end_b {
                return false;
            }
        }
        prev = Some(e);
    }
    true
}
