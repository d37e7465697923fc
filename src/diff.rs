//! The diff driver: trims common ends, dispatches the REPLACE core to
//! the chosen algorithm, then right-shift normalizes the result.

use tracing::instrument;

use crate::algorithm::{Algorithm, DiffAlgorithm, Region};
use crate::cancel::CancellationToken;
use crate::comparator::Comparator;
use crate::edit::{Edit, EditKind, EditList};
use crate::error::Result;
use crate::hashed::{HashedSequence, HashedSequenceComparator};
use crate::histogram::Histogram;
use crate::myers::Myers;
use crate::sequence::Sequence;
use crate::subsequence::{Subsequence, SubsequenceComparator};

/// Computes the edit list that transforms `a` into `b`.
///
/// Equivalent to [`diff_cancellable`] with a token that can never be
/// cancelled.
pub fn diff<S, C>(algorithm: Algorithm, cmp: &C, a: &S, b: &S) -> Result<EditList>
where
    S: Sequence + Clone,
    C: Comparator<S>,
{
    diff_cancellable(algorithm, cmp, a, b, &CancellationToken::new())
}

/// As [`diff`], but polls `cancel` at the required granularity and
/// returns [`crate::error::Error::Interrupted`] if it trips.
#[instrument(level = "debug", skip_all, fields(algorithm = ?algorithm))]
pub fn diff_cancellable<S, C>(
    algorithm: Algorithm,
    cmp: &C,
    a: &S,
    b: &S,
    cancel: &CancellationToken,
) -> Result<EditList>
where
    S: Sequence + Clone,
    C: Comparator<S>,
{
    let mut edit = Edit::new(0, a.len(), 0, b.len());
    cmp.reduce_common_start_end(a, b, &mut edit);

    let mut out = EditList::new();
    match edit.kind() {
        EditKind::Empty => {}
        EditKind::Insert | EditKind::Delete => out.push(edit),
        EditKind::Replace if edit.length_a() == 1 && edit.length_b() == 1 => out.push(edit),
        EditKind::Replace => {
            // Both algorithms are handed a HashedSequence pair so their
            // repeated hash/equality probes shortcut on a precomputed hash
            // instead of recomputing it (djb2 over a line's bytes, for
            // LineSequence) on every call.
            let region = Region::new(0, edit.length_a(), 0, edit.length_b());
            let hashed_a = HashedSequence::new(a.clone(), cmp);
            let hashed_b = HashedSequence::new(b.clone(), cmp);
            let hcmp = HashedSequenceComparator::new(cmp);
            let sub_a = Subsequence::new(hashed_a, edit.begin_a, edit.end_a);
            let sub_b = Subsequence::new(hashed_b, edit.begin_b, edit.end_b);
            let scmp = SubsequenceComparator::new(&hcmp);

            let mut local = EditList::new();
            dispatch(algorithm, &scmp, &sub_a, &sub_b, region, &mut local, cancel)?;
            out.extend(local.into_iter().map(|e| e.translated(edit.begin_a, edit.begin_b)));
        }
    }

    normalize(cmp, a, b, &mut out);
    Ok(out)
}

/// Runs the chosen algorithm's `diff_non_common` directly, without the
/// top-level common-end trim or normalization `diff` performs. Used by
/// Histogram's fallback path and by tests that want the raw algorithm
/// output.
pub fn dispatch<S, C>(
    algorithm: Algorithm,
    cmp: &C,
    a: &S,
    b: &S,
    region: Region,
    out: &mut EditList,
    cancel: &CancellationToken,
) -> Result<()>
where
    S: Sequence,
    C: Comparator<S>,
{
    match algorithm {
        Algorithm::Myers => Myers.diff_non_common(cmp, a, b, region, out, cancel),
        // Histogram falls back to Myers per dense sub-region internally; a
        // propagated error here is a real `Interrupted` or
        // `SequenceTooLarge`, never a "too dense" signal.
        Algorithm::Histogram => Histogram::default().diff_non_common(cmp, a, b, region, out, cancel),
    }
}

/// The right-shift normalization pass: walks the edit list in
/// reverse, sliding each INSERT/DELETE as far towards its successor as the
/// content allows, so that ambiguous placements settle deterministically at
/// their latest admissible position.
fn normalize<S, C>(cmp: &C, a: &S, b: &S, edits: &mut EditList)
where
    S: Sequence,
    C: Comparator<S>,
{
    let len_a = a.len();
    let len_b = b.len();
    for i in (0..edits.len()).rev() {
        let max_a = edits.get(i + 1).map(|e| e.begin_a).unwrap_or(len_a);
        let max_b = edits.get(i + 1).map(|e| e.begin_b).unwrap_or(len_b);
        let e = &mut edits[i];
        match e.kind() {
            EditKind::Insert => {
                while e.end_a < max_a && e.end_b < max_b && cmp.eq(b, e.begin_b, b, e.end_b) {
                    e.shift(1);
                }
            }
            EditKind::Delete => {
                while e.end_a < max_a && e.end_b < max_b && cmp.eq(a, e.begin_a, a, e.end_a) {
                    e.shift(1);
                }
            }
            _ => {}
        }
    }
}
