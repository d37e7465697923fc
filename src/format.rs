//! Renders a [`MergeResult<LineSequence>`] to a byte stream with
//! `<<<<<<<`/`|||||||`/`=======`/`>>>>>>>` conflict markers 
//!
//! The byte sequences for these markers must match patch/merge tooling
//! exactly, so they are written literally rather than built up through a
//! generic templating helper.

use std::io::{self, Write};

use crate::line::LineSequence;
use crate::merge::{ConflictState, MergeChunk, MergeResult, SequenceIndex};

/// Writes `result` using the plain (two-way, no base region) conflict
/// style.
pub fn format_merge<W: Write>(
    writer: &mut W,
    result: &MergeResult<LineSequence>,
    names: [&str; 3],
) -> io::Result<()> {
    format(writer, result, names, false, false)
}

/// Writes `result` in diff3 style: the base region between the ours and
/// theirs interiors is also emitted, delimited by `|||||||`.
pub fn format_merge_diff3<W: Write>(
    writer: &mut W,
    result: &MergeResult<LineSequence>,
    names: [&str; 3],
) -> io::Result<()> {
    format(writer, result, names, true, false)
}

/// As [`format_merge`], but suffixes the `=======` separator with the
/// theirs name, matching the source's "two-way" formatter rather than its
/// "three-way" one (the distinction is an explicit flag
/// here, not inferred from `result`, since a [`MergeResult`] always holds
/// three sequences).
pub fn format_merge_two_way<W: Write>(
    writer: &mut W,
    result: &MergeResult<LineSequence>,
    names: [&str; 3],
) -> io::Result<()> {
    format(writer, result, names, false, true)
}

fn format<W: Write>(
    writer: &mut W,
    result: &MergeResult<LineSequence>,
    names: [&str; 3],
    write_base: bool,
    two_way_separator: bool,
) -> io::Result<()> {
    let is_written = |c: &MergeChunk| c.state != ConflictState::BaseConflictingRange || write_base;
    let last_idx = result
        .chunks
        .iter()
        .enumerate()
        .rev()
        .find(|(_, c)| is_written(c))
        .map(|(i, _)| i);

    let mut i = 0;
    while i < result.chunks.len() {
        let chunk = &result.chunks[i];
        match chunk.state {
            ConflictState::NoConflict => {
                write_chunk(writer, result, chunk, Some(i) == last_idx)?;
                i += 1;
            }
            ConflictState::FirstConflictingRange => {
                write!(writer, "<<<<<<< {}\n", names[1])?;
                write_chunk(writer, result, chunk, Some(i) == last_idx)?;
                i += 1;
                let mut last_side = names[1];

                if i < result.chunks.len()
                    && result.chunks[i].state == ConflictState::BaseConflictingRange
                {
                    if write_base {
                        write!(writer, "||||||| {}\n", names[0])?;
                        write_chunk(writer, result, &result.chunks[i], Some(i) == last_idx)?;
                    }
                    i += 1;
                }

                if two_way_separator {
                    write!(writer, "======= {}\n", names[2])?;
                } else {
                    writer.write_all(b"=======\n")?;
                }

                if i < result.chunks.len()
                    && result.chunks[i].state == ConflictState::NextConflictingRange
                {
                    write_chunk(writer, result, &result.chunks[i], Some(i) == last_idx)?;
                    last_side = names[2];
                    i += 1;
                }

                write!(writer, ">>>>>>> {}\n", last_side)?;
            }
            // Only ever reached defensively: a well-formed MergeResult never
            // has a BASE or NEXT chunk without a preceding FIRST chunk.
            ConflictState::BaseConflictingRange | ConflictState::NextConflictingRange => {
                i += 1;
            }
        }
    }
    Ok(())
}

fn write_chunk<W: Write>(
    writer: &mut W,
    result: &MergeResult<LineSequence>,
    chunk: &MergeChunk,
    is_last_chunk: bool,
) -> io::Result<()> {
    let seq = match chunk.sequence {
        SequenceIndex::Base => &result.base,
        SequenceIndex::Ours => &result.ours,
        SequenceIndex::Theirs => &result.theirs,
    };
    let mut line = Vec::new();
    for i in chunk.begin..chunk.end {
        line.clear();
        seq.write_line(i, &mut line);
        writer.write_all(&line)?;
        let is_last_line = is_last_chunk && i + 1 == chunk.end;
        if !is_last_line || !seq.line_missing_eol(i) {
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::line::LineComparator;
    use crate::merge::{merge, ContentMergeStrategy};

    fn seq(s: &str) -> LineSequence {
        LineSequence::new(s.as_bytes().to_vec())
    }

    #[test]
    fn scenario_e_two_way_output() {
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
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "x\nA\n<<<<<<< OURS\nP\n=======\nQ\n>>>>>>> THEIRS\nC\ny\n"
        );
    }

    #[test]
    fn diff3_style_includes_base_region() {
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
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("||||||| BASE\nB\n"));
    }

    #[test]
    fn clean_merge_has_no_markers() {
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            seq("1\n2\n3\n4\n5\n"),
            seq("1\n2a\n3\n4\n5\n"),
            seq("1\n2\n3\n4a\n5\n"),
        )
        .unwrap();

        let mut out = Vec::new();
        format_merge(&mut out, &result, ["b", "o", "t"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("<<<<<<<"));
        assert_eq!(text, "1\n2a\n3\n4a\n5\n");
    }

    #[test]
    fn missing_final_eol_is_not_synthesized() {
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            seq("a\nb"),
            seq("a\nb"),
            seq("a\nb"),
        )
        .unwrap();
        let mut out = Vec::new();
        format_merge(&mut out, &result, ["b", "o", "t"]).unwrap();
        assert_eq!(out, b"a\nb");
    }

    #[test]
    fn two_way_separator_carries_theirs_name() {
        let result = merge(
            ContentMergeStrategy::Conflict,
            Algorithm::Histogram,
            &LineComparator,
            seq("A\n"),
            seq("P\n"),
            seq("Q\n"),
        )
        .unwrap();
        let mut out = Vec::new();
        format_merge_two_way(&mut out, &result, ["b", "OURS", "THEIRS"]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("======= THEIRS\n"));
    }
}
