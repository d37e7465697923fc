//! Property tests for the quantified invariants: round-trip reconstruction,
//! idempotence, structural symmetry, algorithm equivalence, and
//! normalization stability.

use proptest::prelude::*;

use seqmerge::{
    diff, merge, validate_edit_list, Algorithm, ConflictState, ContentMergeStrategy,
    LineComparator, LineSequence, SequenceIndex,
};

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,3}", 0..12)
}

fn to_sequence(lines: &[String]) -> LineSequence {
    let mut buf = Vec::new();
    for l in lines {
        buf.extend_from_slice(l.as_bytes());
        buf.push(b'\n');
    }
    LineSequence::new(buf)
}

fn apply_edits(a: &[String], b: &[String], edits: &seqmerge::EditList) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = 0u32;
    for e in edits {
        while cursor < e.begin_a {
            out.push(a[cursor as usize].clone());
            cursor += 1;
        }
        for j in e.begin_b..e.end_b {
            out.push(b[j as usize].clone());
        }
        cursor = e.end_a;
    }
    while (cursor as usize) < a.len() {
        out.push(a[cursor as usize].clone());
        cursor += 1;
    }
    out
}

proptest! {
    #[test]
    fn round_trip_reconstructs_b(a in lines_strategy(), b in lines_strategy()) {
        for algo in [Algorithm::Myers, Algorithm::Histogram] {
            let sa = to_sequence(&a);
            let sb = to_sequence(&b);
            let edits = diff(algo, &LineComparator, &sa, &sb).unwrap();
            prop_assert!(validate_edit_list(&edits, sa.len(), sb.len()));
            prop_assert_eq!(apply_edits(&a, &b, &edits), b.clone());
        }
    }

    #[test]
    fn diff_is_idempotent_on_equal_inputs(a in lines_strategy()) {
        let sa = to_sequence(&a);
        for algo in [Algorithm::Myers, Algorithm::Histogram] {
            let edits = diff(algo, &LineComparator, &sa, &sa).unwrap();
            prop_assert!(edits.is_empty());
        }
    }

    #[test]
    fn merge_of_identical_sides_has_no_conflicts(a in lines_strategy()) {
        let sa = to_sequence(&a);
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            sa.clone(),
            sa.clone(),
            sa,
        ).unwrap();
        prop_assert!(!result.contains_conflicts);
    }

    #[test]
    fn algorithms_agree_on_total_edit_length(a in lines_strategy(), b in lines_strategy()) {
        let sa = to_sequence(&a);
        let sb = to_sequence(&b);
        let myers = diff(Algorithm::Myers, &LineComparator, &sa, &sb).unwrap();
        let hist = diff(Algorithm::Histogram, &LineComparator, &sa, &sb).unwrap();
        let total = |edits: &seqmerge::EditList| -> u32 {
            edits.iter().map(|e| e.length_a() + e.length_b()).sum()
        };
        prop_assert_eq!(total(&myers), total(&hist));
    }

    #[test]
    fn merge_symmetry_swaps_first_and_next(
        base in lines_strategy(),
        ours in lines_strategy(),
        theirs in lines_strategy(),
    ) {
        let run = |o: &[String], t: &[String]| merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            to_sequence(&base),
            to_sequence(o),
            to_sequence(t),
        ).unwrap();

        let a = run(&ours, &theirs);
        let b = run(&theirs, &ours);
        prop_assert_eq!(a.chunks.len(), b.chunks.len());
        for (ca, cb) in a.chunks.iter().zip(b.chunks.iter()) {
            let swapped_state = match ca.state {
                ConflictState::FirstConflictingRange => ConflictState::NextConflictingRange,
                ConflictState::NextConflictingRange => ConflictState::FirstConflictingRange,
                other => other,
            };
            prop_assert_eq!(swapped_state, cb.state);
            let swapped_seq = match ca.sequence {
                SequenceIndex::Ours => SequenceIndex::Theirs,
                SequenceIndex::Theirs => SequenceIndex::Ours,
                other => other,
            };
            prop_assert_eq!(swapped_seq, cb.sequence);
        }
    }
}
