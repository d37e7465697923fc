use crate::edit::Edit;

/// Equality and hashing over positions of a sequence `S`, plus the
/// common-prefix/suffix reduction every diff starts with.
///
/// `eq` must be symmetric (`eq(a, i, b, j) == eq(b, j, a, i)`) and `hash`
/// must be consistent with it: `eq(a, i, b, j)` implies
/// `hash(a, i) == hash(b, j)`.
pub trait Comparator<S> {
    /// Are element `i` of `a` and element `j` of `b` equal?
    fn eq(&self, a: &S, i: u32, b: &S, j: u32) -> bool;

    /// A hash of element `i` of `s`, consistent with [`eq`](Self::eq).
    fn hash(&self, s: &S, i: u32) -> u32;

    /// Shrinks `edit` in place by advancing `begin_a`/`begin_b` while the
    /// leading elements of the two ranges it spans are equal, then
    /// retreating `end_a`/`end_b` while the trailing elements are equal.
    ///
    /// The default implementation walks element-by-element via [`eq`]; a
    /// sequence with cheaper bulk comparison (e.g. [`LineSequence`] over
    /// contiguous bytes) can override this with something faster, as long
    /// as it only ever shrinks towards the same fixed point.
    fn reduce_common_start_end(&self, a: &S, b: &S, edit: &mut Edit) {
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
