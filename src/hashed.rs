//! A sequence wrapper that precomputes per-position hashes so comparators can
//! shortcut inequality without touching the base sequence.

use std::sync::Arc;

use crate::comparator::Comparator;
use crate::sequence::Sequence;

/// `S` plus a parallel table of `hash(s, i)` values, computed once up front.
///
/// Histogram diffing hashes every element repeatedly while building its
/// index; wrapping the input in a `HashedSequence` turns each of those into a
/// table lookup instead of a recomputation.
#[derive(Clone, Debug)]
pub struct HashedSequence<S> {
    base: S,
    hashes: Arc<[u32]>,
}

impl<S: Sequence> HashedSequence<S> {
    /// Precompute hashes for every position of `base` using `cmp`.
    pub fn new<C: Comparator<S>>(base: S, cmp: &C) -> Self {
        let hashes: Vec<u32> = (0..base.len()).map(|i| cmp.hash(&base, i)).collect();
        Self {
            base,
            hashes: hashes.into(),
        }
    }

    /// The wrapped base sequence.
    pub fn base(&self) -> &S {
        &self.base
    }

    /// The precomputed hash at position `i`.
    pub fn hash_at(&self, i: u32) -> u32 {
        self.hashes[i as usize]
    }
}

impl<S: Sequence> Sequence for HashedSequence<S> {
    fn len(&self) -> u32 {
        self.base.len()
    }
}

/// Wraps a base [`Comparator<S>`] to compare [`HashedSequence<S>`] positions:
/// a hash mismatch short-circuits to "not equal" before the base `eq` is
/// ever called.
///
/// Borrows its base comparator the same way
/// [`SubsequenceComparator`](crate::subsequence::SubsequenceComparator)
/// does, so the two wrappers compose without needing the base comparator to
/// be `Clone`.
#[derive(Clone, Copy, Debug)]
pub struct HashedSequenceComparator<'a, C> {
    /// The comparator used for the underlying base sequence.
    pub base: &'a C,
}

impl<'a, C> HashedSequenceComparator<'a, C> {
    pub fn new(base: &'a C) -> Self {
        Self { base }
    }
}

impl<'a, S: Sequence, C: Comparator<S>> Comparator<HashedSequence<S>>
    for HashedSequenceComparator<'a, C>
{
    fn eq(&self, a: &HashedSequence<S>, i: u32, b: &HashedSequence<S>, j: u32) -> bool {
        a.hash_at(i) == b.hash_at(j) && self.base.eq(&a.base, i, &b.base, j)
    }

    fn hash(&self, s: &HashedSequence<S>, i: u32) -> u32 {
        s.hash_at(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{LineComparator, LineSequence};

    #[test]
    fn hashes_match_base_comparator() {
        let cmp = LineComparator;
        let a = LineSequence::new(&b"a\nb\n"[..]);
        let hashed = HashedSequence::new(a.clone(), &cmp);
        assert_eq!(hashed.hash_at(0), cmp.hash(&a, 0));
        assert_eq!(hashed.hash_at(1), cmp.hash(&a, 1));
    }

    #[test]
    fn hashed_comparator_shortcuts_on_mismatch() {
        let cmp = LineComparator;
        let a = LineSequence::new(&b"a\n"[..]);
        let b = LineSequence::new(&b"b\n"[..]);
        let ha = HashedSequence::new(a, &cmp);
        let hb = HashedSequence::new(b, &cmp);
        let hcmp = HashedSequenceComparator::new(&cmp);
        assert!(!hcmp.eq(&ha, 0, &hb, 0));
    }
}
