//! A cheap, index-translating window over a base sequence.

use crate::comparator::Comparator;
use crate::sequence::Sequence;

/// A `[begin, end)` window over a cheaply-cloneable base sequence `S`.
///
/// Used to recurse into the non-common region of `A`/`B` that remains after
/// [`diff`](crate::diff::diff) strips matching prefixes and suffixes, without
/// copying any elements: positions are translated by `begin` on the way in
/// and back out.
#[derive(Clone, Debug)]
pub struct Subsequence<S> {
    base: S,
    begin: u32,
    end: u32,
}

impl<S: Sequence + Clone> Subsequence<S> {
    /// Window `base` to `[begin, end)`. `end` must not exceed `base.len()`.
    pub fn new(base: S, begin: u32, end: u32) -> Self {
        debug_assert!(begin <= end);
        debug_assert!(end <= base.len());
        Self { base, begin, end }
    }

    /// The wrapped base sequence (full, unwindowed).
    pub fn base(&self) -> &S {
        &self.base
    }

    /// This window's lower bound in the base sequence's index space.
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// This window's upper bound in the base sequence's index space.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Translate a local (windowed) position to the base sequence's index
    /// space.
    pub fn to_base(&self, local: u32) -> u32 {
        self.begin + local
    }
}

impl<S: Sequence> Sequence for Subsequence<S> {
    fn len(&self) -> u32 {
        self.end - self.begin
    }
}

/// Wraps a base [`Comparator<S>`] to compare [`Subsequence<S>`] positions by
/// translating them back into the base sequence's index space first.
#[derive(Clone, Copy, Debug)]
pub struct SubsequenceComparator<'a, C> {
    /// The comparator used for the underlying base sequence.
    pub base: &'a C,
}

impl<'a, C> SubsequenceComparator<'a, C> {
    pub fn new(base: &'a C) -> Self {
        Self { base }
    }
}

impl<'a, S: Sequence + Clone, C: Comparator<S>> Comparator<Subsequence<S>>
    for SubsequenceComparator<'a, C>
{
    fn eq(&self, a: &Subsequence<S>, i: u32, b: &Subsequence<S>, j: u32) -> bool {
        self.base
            .eq(&a.base, a.to_base(i), &b.base, b.to_base(j))
    }

    fn hash(&self, s: &Subsequence<S>, i: u32) -> u32 {
        self.base.hash(&s.base, s.to_base(i))
    }
}
