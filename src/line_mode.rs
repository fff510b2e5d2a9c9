//! Line-mode reducer (§4.4): collapse each text to one synthetic code
//! unit per line, diff the much shorter encoded strings, then re-expand
//! and re-diff the regions that actually changed at character
//! granularity.
//!
//! The synthetic alphabet lives in `char` space rather than UTF-16 code
//! units (see the code-unit note in `DESIGN.md`): line index `i` (1-based,
//! `0` stays reserved for the empty line) maps to a scalar value by
//! skipping over the UTF-16 surrogate block, since Rust's `char` cannot
//! represent a lone surrogate the way a raw UTF-16 code unit can.

use std::time::Instant;

use crate::{
    cleanup,
    config::DiffConfig,
    diff::{Diff, Diffs, Op},
    differ,
};

const TEXT1_MAX_LINES: usize = 40_000;
const TOTAL_MAX_LINES: usize = 65_534;

fn line_code(index: usize) -> char {
    let raw = index as u32;
    let raw = if raw >= 0xD800 { raw + 0x800 } else { raw };
    char::from_u32(raw).expect("line index stays within the valid scalar-value range")
}

/// Splits `text` into lines (each retaining its trailing `\n`, if any),
/// mapping previously-seen lines to their existing code and newly-seen
/// ones to a fresh one. Once `line_array` reaches `max_lines` entries,
/// the remainder of `text` is folded into a single final synthetic line
/// so encoding always terminates.
fn lines_to_chars_munge(
    text: &str,
    line_array: &mut Vec<String>,
    line_index: &mut std::collections::HashMap<String, usize>,
    max_lines: usize,
) -> Vec<char> {
    let mut encoded = Vec::new();
    let mut line_start = 0;

    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |rel| line_start + rel + 1);

        let mut line_end = line_end;
        if line_array.len() >= max_lines {
            line_end = text.len();
        }

        let line = &text[line_start..line_end];

        let code = if let Some(&code) = line_index.get(line) {
            code
        } else {
            let code = line_array.len();
            line_array.push(line.to_owned());
            line_index.insert(line.to_owned(), code);
            code
        };

        encoded.push(line_code(code));
        line_start = line_end;
    }

    encoded
}

struct LineIndex {
    chars1: Vec<char>,
    chars2: Vec<char>,
    line_array: Vec<String>,
}

fn lines_to_chars(text1: &str, text2: &str) -> LineIndex {
    let mut line_array = vec![String::new()]; // index 0 reserved empty
    let mut line_index = std::collections::HashMap::new();

    let chars1 = lines_to_chars_munge(text1, &mut line_array, &mut line_index, TEXT1_MAX_LINES);
    let chars2 = lines_to_chars_munge(text2, &mut line_array, &mut line_index, TOTAL_MAX_LINES);

    LineIndex { chars1, chars2, line_array }
}

fn chars_to_lines(diffs: &mut Diffs, line_array: &[String]) {
    for diff in diffs.iter_mut() {
        let mut text = String::new();
        for c in diff.text.chars() {
            let index = code_point_to_index(c);
            text.push_str(&line_array[index]);
        }
        diff.text = text;
    }
}

fn code_point_to_index(c: char) -> usize {
    let raw = c as u32;
    (if raw >= 0xE000 { raw - 0x800 } else { raw }) as usize
}

pub(crate) fn diff_line_mode(
    text1: &str,
    text2: &str,
    deadline: Instant,
    config: &DiffConfig,
) -> Diffs {
    let index = lines_to_chars(text1, text2);

    let mut diffs = differ::diff_main_chars(&index.chars1, &index.chars2, false, deadline, config);

    chars_to_lines(&mut diffs, &index.line_array);
    cleanup::semantic::cleanup_semantic(&mut diffs, config);

    // Re-diff every delete+insert run at character granularity: any
    // change confined to a handful of lines deserves the full engine's
    // output, not "replace this whole line with that whole line".
    diffs.push(Diff::equal(""));

    let mut result = Vec::with_capacity(diffs.len());
    let mut text_delete = String::new();
    let mut text_insert = String::new();
    let mut count_delete = 0;
    let mut count_insert = 0;

    for diff in diffs {
        match diff.op {
            Op::Insert => {
                count_insert += 1;
                text_insert.push_str(&diff.text);
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.push_str(&diff.text);
            }
            Op::Equal => {
                if count_delete >= 1 && count_insert >= 1 {
                    let sub_diffs = {
                        let d1: Vec<char> = text_delete.chars().collect();
                        let d2: Vec<char> = text_insert.chars().collect();
                        differ::diff_main_chars(&d1, &d2, false, deadline, config)
                    };
                    result.extend(sub_diffs);
                } else {
                    if !text_delete.is_empty() {
                        result.push(Diff::delete(std::mem::take(&mut text_delete)));
                    }
                    if !text_insert.is_empty() {
                        result.push(Diff::insert(std::mem::take(&mut text_insert)));
                    }
                }

                count_delete = 0;
                count_insert = 0;
                text_delete.clear();
                text_insert.clear();

                if !diff.text.is_empty() {
                    result.push(diff);
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diff::{text1 as script_text1, text2 as script_text2};
    use std::time::Duration;

    fn run(a: &str, b: &str) -> Diffs {
        diff_line_mode(a, b, Instant::now() + Duration::from_secs(5), &DiffConfig::default())
    }

    #[test]
    fn test_round_trip() {
        let a = "line one\nline two\nline three\n";
        let b = "line one\nline TWO\nline three\nline four\n";
        let diffs = run(a, b);
        assert_eq!(script_text1(&diffs), a);
        assert_eq!(script_text2(&diffs), b);
    }

    #[test]
    fn test_identical_lines() {
        let a = "same\nsame\nsame\n";
        let diffs = run(a, a);
        assert_eq!(script_text1(&diffs), a);
        assert_eq!(script_text2(&diffs), a);
    }

    #[test]
    fn test_line_index_roundtrips_many_distinct_lines() {
        let a: String = (0..200).map(|i| format!("line {i}\n")).collect();
        let b: String = (0..200).map(|i| format!("line {i} changed\n")).collect();
        let diffs = run(&a, &b);
        assert_eq!(script_text1(&diffs), a);
        assert_eq!(script_text2(&diffs), b);
    }
}
