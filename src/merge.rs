//! Three-way content merge: walks two independent edit lists
//! (`base -> ours`, `base -> theirs`) in lock-step, combining overlapping
//! edits and stripping common prefixes/suffixes from conflict regions under
//! a chosen resolution strategy.

use tracing::instrument;

use crate::algorithm::Algorithm;
use crate::cancel::CancellationToken;
use crate::comparator::Comparator;
use crate::diff::diff_cancellable;
use crate::edit::EditList;
use crate::error::Result;
use crate::sequence::Sequence;

/// Which of the three sequences a [`MergeChunk`] draws its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceIndex {
    /// The common ancestor.
    Base,
    /// Our side of the merge.
    Ours,
    /// Their side of the merge.
    Theirs,
}

/// A [`MergeChunk`]'s conflict annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictState {
    /// A chunk with no conflict: emit it as-is.
    NoConflict,
    /// The first (ours) half of a conflicting region.
    FirstConflictingRange,
    /// The base half of a conflicting region, shown only in diff3 style.
    BaseConflictingRange,
    /// The second (theirs) half of a conflicting region.
    NextConflictingRange,
}

/// A contiguous range from one of base/ours/theirs, annotated with its
/// conflict state. Concatenating a [`MergeResult`]'s chunks in order
/// reconstructs the merged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeChunk {
    /// Which sequence `begin`/`end` index into.
    pub sequence: SequenceIndex,
    /// Start of the range (inclusive).
    pub begin: u32,
    /// End of the range (exclusive).
    pub end: u32,
    /// This chunk's conflict annotation.
    pub state: ConflictState,
}

impl MergeChunk {
    fn new(sequence: SequenceIndex, begin: u32, end: u32, state: ConflictState) -> Self {
        Self {
            sequence,
            begin,
            end,
            state,
        }
    }
}

/// Which side wins a conflicting region, or whether to emit conflict
/// markers instead of resolving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMergeStrategy {
    /// Always take `ours` in a conflicting region.
    Ours,
    /// Always take `theirs` in a conflicting region.
    Theirs,
    /// Emit a FIRST/BASE/NEXT conflict triple and set `contains_conflicts`.
    #[default]
    Conflict,
}

/// The outcome of a three-way merge: the three input sequences plus the
/// ordered chunk list that reconstructs the merge under the chosen
/// strategy.
#[derive(Debug, Clone)]
pub struct MergeResult<S> {
    /// The common ancestor sequence.
    pub base: S,
    /// Our side of the merge.
    pub ours: S,
    /// Their side of the merge.
    pub theirs: S,
    /// The ordered chunks that reconstruct the merged output.
    pub chunks: Vec<MergeChunk>,
    /// `true` if any chunk is a conflict triple.
    pub contains_conflicts: bool,
}

/// Runs a three-way merge, diffing `base` against `ours` and `theirs` with
/// `algorithm` and combining the results under `strategy`. Equivalent to
/// [`merge_cancellable`] with a token that can never be cancelled.
pub fn merge<S, C>(
    strategy: ContentMergeStrategy,
    algorithm: Algorithm,
    cmp: &C,
    base: S,
    ours: S,
    theirs: S,
) -> Result<MergeResult<S>>
where
    S: Sequence + Clone,
    C: Comparator<S>,
{
    merge_cancellable(
        strategy,
        algorithm,
        cmp,
        base,
        ours,
        theirs,
        &CancellationToken::new(),
    )
}

/// As [`merge`], but polls `cancel` the way [`diff`](crate::diff::diff)
/// does.
#[instrument(level = "debug", skip_all, fields(strategy = ?strategy))]
pub fn merge_cancellable<S, C>(
    strategy: ContentMergeStrategy,
    algorithm: Algorithm,
    cmp: &C,
    base: S,
    ours: S,
    theirs: S,
    cancel: &CancellationToken,
) -> Result<MergeResult<S>>
where
    S: Sequence + Clone,
    C: Comparator<S>,
{
    use SequenceIndex::*;

    if ours.is_empty() && theirs.is_empty() {
        return Ok(MergeResult {
            base,
            ours,
            theirs,
            chunks: vec![MergeChunk::new(Ours, 0, 0, ConflictState::NoConflict)],
            contains_conflicts: false,
        });
    }

    if ours.is_empty() {
        let theirs_edits = diff_cancellable(algorithm, cmp, &base, &theirs, cancel)?;
        if !theirs_edits.is_empty() {
            let (chunks, contains_conflicts) = match strategy {
                ContentMergeStrategy::Ours => {
                    (vec![MergeChunk::new(Ours, 0, 0, ConflictState::NoConflict)], false)
                }
                ContentMergeStrategy::Theirs => (
                    vec![MergeChunk::new(
                        Theirs,
                        0,
                        theirs.len(),
                        ConflictState::NoConflict,
                    )],
                    false,
                ),
                ContentMergeStrategy::Conflict => (
                    vec![
                        MergeChunk::new(Ours, 0, 0, ConflictState::FirstConflictingRange),
                        MergeChunk::new(Base, 0, base.len(), ConflictState::BaseConflictingRange),
                        MergeChunk::new(
                            Theirs,
                            0,
                            theirs.len(),
                            ConflictState::NextConflictingRange,
                        ),
                    ],
                    true,
                ),
            };
            return Ok(MergeResult {
                base,
                ours,
                theirs,
                chunks,
                contains_conflicts,
            });
        }
    }

    if theirs.is_empty() {
        let ours_edits = diff_cancellable(algorithm, cmp, &base, &ours, cancel)?;
        if !ours_edits.is_empty() {
            let (chunks, contains_conflicts) = match strategy {
                ContentMergeStrategy::Ours => (
                    vec![MergeChunk::new(Ours, 0, ours.len(), ConflictState::NoConflict)],
                    false,
                ),
                ContentMergeStrategy::Theirs => {
                    (vec![MergeChunk::new(Theirs, 0, 0, ConflictState::NoConflict)], false)
                }
                ContentMergeStrategy::Conflict => (
                    vec![
                        MergeChunk::new(Ours, 0, ours.len(), ConflictState::FirstConflictingRange),
                        MergeChunk::new(Base, 0, base.len(), ConflictState::BaseConflictingRange),
                        MergeChunk::new(Theirs, 0, 0, ConflictState::NextConflictingRange),
                    ],
                    true,
                ),
            };
            return Ok(MergeResult {
                base,
                ours,
                theirs,
                chunks,
                contains_conflicts,
            });
        }
    }

    let ours_edits = diff_cancellable(algorithm, cmp, &base, &ours, cancel)?;
    let theirs_edits = diff_cancellable(algorithm, cmp, &base, &theirs, cancel)?;

    let mut chunks = Vec::new();
    let contains_conflicts = run_pass(
        strategy,
        cmp,
        &base,
        &ours,
        &theirs,
        &ours_edits,
        &theirs_edits,
        &mut chunks,
        cancel,
    )?;

    Ok(MergeResult {
        base,
        ours,
        theirs,
        chunks,
        contains_conflicts,
    })
}

#[allow(clippy::too_many_arguments)]
fn run_pass<S, C>(
    strategy: ContentMergeStrategy,
    cmp: &C,
    base: &S,
    ours: &S,
    theirs: &S,
    ours_edits: &EditList,
    theirs_edits: &EditList,
    chunks: &mut Vec<MergeChunk>,
    cancel: &CancellationToken,
) -> Result<bool>
where
    S: Sequence,
    C: Comparator<S>,
{
    use SequenceIndex::*;

    let len_base = base.len();
    let mut current = 0u32;
    let mut oi = 0usize;
    let mut ti = 0usize;
    let mut contains_conflicts = false;

    let flush_base = |chunks: &mut Vec<MergeChunk>, from: u32, to: u32| {
        if to > from {
            chunks.push(MergeChunk::new(Base, from, to, ConflictState::NoConflict));
        }
    };
    let emit = |chunks: &mut Vec<MergeChunk>, seq: SequenceIndex, begin: u32, end: u32| {
        if end > begin {
            chunks.push(MergeChunk::new(seq, begin, end, ConflictState::NoConflict));
        }
    };

    while oi < ours_edits.len() || ti < theirs_edits.len() {
        cancel.check()?;

        let o = ours_edits.get(oi);
        let t = theirs_edits.get(ti);

        match (o, t) {
            (Some(oe), None) => {
                flush_base(chunks, current, oe.begin_a);
                emit(chunks, Ours, oe.begin_b, oe.end_b);
                current = oe.end_a;
                oi += 1;
            }
            (None, Some(te)) => {
                flush_base(chunks, current, te.begin_a);
                emit(chunks, Theirs, te.begin_b, te.end_b);
                current = te.end_a;
                ti += 1;
            }
            (Some(oe), Some(te)) if oe.end_a < te.begin_a => {
                flush_base(chunks, current, oe.begin_a);
                emit(chunks, Ours, oe.begin_b, oe.end_b);
                current = oe.end_a;
                oi += 1;
            }
            (Some(oe), Some(te)) if te.end_a < oe.begin_a => {
                flush_base(chunks, current, te.begin_a);
                emit(chunks, Theirs, te.begin_b, te.end_b);
                current = te.end_a;
                ti += 1;
            }
            (Some(oe), Some(te)) => {
                flush_base(chunks, current, oe.begin_a.min(te.begin_a));

                let (mut o_begin_a, mut o_end_a, mut o_begin_b, mut o_end_b) =
                    (oe.begin_a, oe.end_a, oe.begin_b, oe.end_b);
                let (mut t_begin_a, mut t_end_a, mut t_begin_b, mut t_end_b) =
                    (te.begin_a, te.end_a, te.begin_b, te.end_b);
                oi += 1;
                ti += 1;

                // Back-date whichever side starts later so both begin at
                // the same base position.
                if o_begin_a < t_begin_a {
                    let gap = t_begin_a - o_begin_a;
                    t_begin_a -= gap;
                    t_begin_b -= gap;
                } else if t_begin_a < o_begin_a {
                    let gap = o_begin_a - t_begin_a;
                    o_begin_a -= gap;
                    o_begin_b -= gap;
                }

                // Swallow cascading overlaps: while the next edit on either
                // side starts inside the other side's current span, fold it
                // in and extend that side's end. Neither cursor moves
                // backwards, so this terminates.
                loop {
                    let mut advanced = false;
                    if let Some(next_o) = ours_edits.get(oi) {
                        if next_o.begin_a < o_end_a.max(t_end_a) {
                            o_end_a = next_o.end_a;
                            o_end_b = next_o.end_b;
                            oi += 1;
                            advanced = true;
                        }
                    }
                    if let Some(next_t) = theirs_edits.get(ti) {
                        if next_t.begin_a < o_end_a.max(t_end_a) {
                            t_end_a = next_t.end_a;
                            t_end_b = next_t.end_b;
                            ti += 1;
                            advanced = true;
                        }
                    }
                    if !advanced {
                        break;
                    }
                }

                // Forward-date whichever side ends earlier.
                if o_end_a < t_end_a {
                    o_end_b += t_end_a - o_end_a;
                    o_end_a = t_end_a;
                } else if t_end_a < o_end_a {
                    t_end_b += o_end_a - t_end_a;
                    t_end_a = o_end_a;
                }

                let len_ob = o_end_b - o_begin_b;
                let len_tb = t_end_b - t_begin_b;
                let max_common = len_ob.min(len_tb);

                let mut common_prefix = 0u32;
                while common_prefix < max_common
                    && cmp.eq(
                        ours,
                        o_begin_b + common_prefix,
                        theirs,
                        t_begin_b + common_prefix,
                    )
                {
                    common_prefix += 1;
                }

                let max_suffix = max_common - common_prefix;
                let mut common_suffix = 0u32;
                while common_suffix < max_suffix
                    && cmp.eq(
                        ours,
                        o_end_b - 1 - common_suffix,
                        theirs,
                        t_end_b - 1 - common_suffix,
                    )
                {
                    common_suffix += 1;
                }

                emit(
                    chunks,
                    Ours,
                    o_begin_b,
                    o_begin_b + common_prefix,
                );

                let remaining = len_ob.saturating_sub(common_prefix + common_suffix);
                if remaining > 0 || len_ob != len_tb {
                    match strategy {
                        ContentMergeStrategy::Conflict => {
                            emit(
                                chunks,
                                Ours,
                                o_begin_b + common_prefix,
                                o_end_b - common_suffix,
                            );
                            if let Some(last) = chunks.last_mut() {
                                last.state = ConflictState::FirstConflictingRange;
                            }
                            let base_begin = o_begin_a + common_prefix;
                            let base_end = o_end_a - common_suffix;
                            if base_end > base_begin {
                                chunks.push(MergeChunk::new(
                                    Base,
                                    base_begin,
                                    base_end,
                                    ConflictState::BaseConflictingRange,
                                ));
                            }
                            emit(
                                chunks,
                                Theirs,
                                t_begin_b + common_prefix,
                                t_end_b - common_suffix,
                            );
                            if let Some(last) = chunks.last_mut() {
                                last.state = ConflictState::NextConflictingRange;
                            }
                            contains_conflicts = true;
                        }
                        ContentMergeStrategy::Ours => {
                            emit(
                                chunks,
                                Ours,
                                o_begin_b + common_prefix,
                                o_end_b - common_suffix,
                            );
                        }
                        ContentMergeStrategy::Theirs => {
                            emit(
                                chunks,
                                Theirs,
                                t_begin_b + common_prefix,
                                t_end_b - common_suffix,
                            );
                        }
                    }
                }

                emit(chunks, Ours, o_end_b - common_suffix, o_end_b);

                current = o_end_a;
            }
            (None, None) => unreachable!(),
        }
    }

    flush_base(chunks, current, len_base);
    Ok(contains_conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{LineComparator, LineSequence};

    fn seq(s: &str) -> LineSequence {
        LineSequence::new(s.as_bytes().to_vec())
    }

    fn run(
        strategy: ContentMergeStrategy,
        base: &str,
        ours: &str,
        theirs: &str,
    ) -> MergeResult<LineSequence> {
        merge(
            strategy,
            Algorithm::Histogram,
            &LineComparator,
            seq(base),
            seq(ours),
            seq(theirs),
        )
        .unwrap()
    }

    #[test]
    fn idempotence_on_identical_inputs() {
        let result = run(ContentMergeStrategy::Conflict, "a\nb\nc\n", "a\nb\nc\n", "a\nb\nc\n");
        assert!(!result.contains_conflicts);
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].sequence, SequenceIndex::Base);
        assert_eq!(result.chunks[0].begin, 0);
        assert_eq!(result.chunks[0].end, 3);
    }

    #[test]
    fn scenario_d_non_overlapping_edits_merge_cleanly() {
        let result = run(
            ContentMergeStrategy::Conflict,
            "1\n2\n3\n4\n5\n",
            "1\n2a\n3\n4\n5\n",
            "1\n2\n3\n4a\n5\n",
        );
        assert!(!result.contains_conflicts);
        for c in &result.chunks {
            assert_ne!(c.state, ConflictState::FirstConflictingRange);
        }
    }

    #[test]
    fn scenario_e_conflict_with_common_prefix_and_suffix() {
        let result = run(
            ContentMergeStrategy::Conflict,
            "x\nA\nB\nC\ny\n",
            "x\nA\nP\nC\ny\n",
            "x\nA\nQ\nC\ny\n",
        );
        assert!(result.contains_conflicts);
        let states: Vec<ConflictState> = result.chunks.iter().map(|c| c.state).collect();
        assert!(states.contains(&ConflictState::FirstConflictingRange));
        assert!(states.contains(&ConflictState::BaseConflictingRange));
        assert!(states.contains(&ConflictState::NextConflictingRange));
    }

    #[test]
    fn scenario_f_delete_vs_modify() {
        let conflict = run(ContentMergeStrategy::Conflict, "a\nb\nc\n", "", "a\nB\nc\n");
        assert!(conflict.contains_conflicts);

        let ours = run(ContentMergeStrategy::Ours, "a\nb\nc\n", "", "a\nB\nc\n");
        assert!(!ours.contains_conflicts);
        assert!(ours.chunks.iter().all(|c| c.sequence != SequenceIndex::Theirs));

        let theirs = run(ContentMergeStrategy::Theirs, "a\nb\nc\n", "", "a\nB\nc\n");
        assert!(!theirs.contains_conflicts);
    }

    #[test]
    fn both_empty_yields_single_empty_chunk() {
        let result = run(ContentMergeStrategy::Conflict, "a\nb\n", "", "");
        assert!(!result.contains_conflicts);
        assert_eq!(result.chunks.len(), 1);
        assert_eq!(result.chunks[0].sequence, SequenceIndex::Ours);
        assert_eq!(result.chunks[0].begin, 0);
        assert_eq!(result.chunks[0].end, 0);
    }

    #[test]
    fn symmetry_of_ours_and_theirs() {
        let a = run(
            ContentMergeStrategy::Conflict,
            "x\nA\nB\nC\ny\n",
            "x\nA\nP\nC\ny\n",
            "x\nA\nQ\nC\ny\n",
        );
        let b = run(
            ContentMergeStrategy::Conflict,
            "x\nA\nB\nC\ny\n",
            "x\nA\nQ\nC\ny\n",
            "x\nA\nP\nC\ny\n",
        );
        assert_eq!(a.chunks.len(), b.chunks.len());
        for (ca, cb) in a.chunks.iter().zip(b.chunks.iter()) {
            let swapped_state = match ca.state {
                ConflictState::FirstConflictingRange => ConflictState::NextConflictingRange,
                ConflictState::NextConflictingRange => ConflictState::FirstConflictingRange,
                other => other,
            };
            assert_eq!(swapped_state, cb.state);
        }
    }
}
