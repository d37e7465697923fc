/// An opaque, never-materialised sequence of elements.
///
/// A `Sequence` only ever exposes its length; element access and equality
/// always go through a [`Comparator`](crate::comparator::Comparator), which
/// is handed the sequence and a position rather than an element value. This
/// mirrors [`LineSequence`](crate::line::LineSequence),
/// [`HashedSequence`](crate::hashed::HashedSequence) and
/// [`Subsequence`](crate::subsequence::Subsequence): none of them ever copy
/// out an element, they only answer "how many" and let the comparator do the
/// rest.
pub trait Sequence {
    /// The number of elements in this sequence.
    fn len(&self) -> u32;

    /// Returns `true` if this sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
