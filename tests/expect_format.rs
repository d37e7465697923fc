//! Snapshot tests for conflict-marker rendering, in the teacher's
//! `expect-test` style.

use expect_test::expect;
use seqmerge::{format_merge, format_merge_diff3, merge, Algorithm, ContentMergeStrategy, LineComparator, LineSequence};

fn seq(s: &str) -> LineSequence {
    LineSequence::new(s.as_bytes().to_vec())
}

#[test]
fn conflict_with_common_prefix_and_suffix() {
    let result = merge(
        ContentMergeStrategy::Conflict,
        Algorithm::Histogram,
        &LineComparator,
        seq("x\nA\nB\nC\ny\n"),
        seq("x\nA\nP\nC\ny\n"),
        seq("x\nA\nQ\nC\ny\n"),
    )
    .unwrap();

    let mut out = Vec::new();
    format_merge(&mut out, &result, ["BASE", "OURS", "THEIRS"]).unwrap();
    expect![[r#"
        x
        A
        <<<<<<< OURS
        P
        =======
        Q
        >>>>>>> THEIRS
        C
        y
    "#]]
    .assert_eq(&String::from_utf8(out).unwrap());
}

#[test]
fn diff3_style_keeps_the_base_region() {
    let result = merge(
        ContentMergeStrategy::Conflict,
        Algorithm::Histogram,
        &LineComparator,
        seq("x\nA\nB\nC\ny\n"),
        seq("x\nA\nP\nC\ny\n"),
        seq("x\nA\nQ\nC\ny\n"),
    )
    .unwrap();

    let mut out = Vec::new();
    format_merge_diff3(&mut out, &result, ["BASE", "OURS", "THEIRS"]).unwrap();
    expect![[r#"
        x
        A
        <<<<<<< OURS
        P
        ||||||| BASE
        B
        =======
        Q
        >>>>>>> THEIRS
        C
        y
    "#]]
    .assert_eq(&String::from_utf8(out).unwrap());
}
