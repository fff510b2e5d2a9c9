//! Merge cleanup (§4.9): the canonicalization pass every other pass
//! re-runs once it's done mutating a script. Restores the
//! no-adjacent-same-op and no-empty-text invariants, factors out common
//! prefixes/suffixes between a delete/insert run, and slides single edits
//! across adjacent equalities until no more shifts are possible.

use crate::{
    diff::{Diff, Diffs, Op},
    util::{common_prefix_len, common_suffix_len},
};

/// Normalizes `diffs` in place: coalesces adjacent same-op runs, drops
/// empty segments, and factors shared prefixes/suffixes out of any
/// delete+insert run into the flanking equalities.
pub fn cleanup_merge(diffs: &mut Diffs) {
    diffs.push(Diff::equal(""));

    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend(diffs[pointer].text.chars());
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend(diffs[pointer].text.chars());
                pointer += 1;
            }
            Op::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        let common_prefix = common_prefix_len(&text_insert, &text_delete);
                        if common_prefix != 0 {
                            let prefix_text: String = text_insert[..common_prefix].iter().collect();
                            let before = pointer - count_delete - count_insert;
                            if before > 0 && diffs[before - 1].op == Op::Equal {
                                diffs[before - 1].text.push_str(&prefix_text);
                            } else {
                                diffs.insert(0, Diff::equal(prefix_text));
                                pointer += 1;
                            }
                            text_insert.drain(..common_prefix);
                            text_delete.drain(..common_prefix);
                        }

                        let common_suffix = common_suffix_len(&text_insert, &text_delete);
                        if common_suffix != 0 {
                            let suffix_text: String =
                                text_insert[text_insert.len() - common_suffix..].iter().collect();
                            diffs[pointer].text = suffix_text + &diffs[pointer].text;
                            text_insert.truncate(text_insert.len() - common_suffix);
                            text_delete.truncate(text_delete.len() - common_suffix);
                        }
                    }

                    let n = count_delete + count_insert;
                    let before = pointer - n;
                    let mut replacement = Vec::new();
                    if !text_delete.is_empty() {
                        replacement.push(Diff::delete(text_delete.iter().collect::<String>()));
                    }
                    if !text_insert.is_empty() {
                        replacement.push(Diff::insert(text_insert.iter().collect::<String>()));
                    }
                    let replacement_len = replacement.len();
                    diffs.splice(before..pointer, replacement);
                    pointer = before + replacement_len + 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    let moved = diffs.remove(pointer).text;
                    diffs[pointer - 1].text.push_str(&moved);
                } else {
                    pointer += 1;
                }

                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }

    if diffs.last().is_some_and(Diff::is_empty) {
        diffs.pop();
    }

    // Second pass: an edit wedged between two equalities can sometimes be
    // slid left or right to absorb one of them, turning three segments
    // into two. Keep re-running until nothing moves.
    let mut changed = false;
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        let (before, middle, after) = (pointer - 1, pointer, pointer + 1);
        if diffs[before].op == Op::Equal && diffs[after].op == Op::Equal {
            let before_text = diffs[before].text.clone();
            let after_text = diffs[after].text.clone();

            if diffs[middle].text.ends_with(&before_text) && !before_text.is_empty() {
                let new_middle_len = diffs[middle].text.len() - before_text.len();
                let shifted = before_text.clone() + &diffs[middle].text[..new_middle_len];
                diffs[middle].text = shifted;
                diffs[after].text = before_text + &after_text;
                diffs.remove(before);
                changed = true;
            } else if diffs[middle].text.starts_with(&after_text) && !after_text.is_empty() {
                diffs[before].text.push_str(&after_text);
                diffs[middle].text = diffs[middle].text[after_text.len()..].to_owned() + &after_text;
                diffs.remove(after);
                changed = true;
            }
        }
        pointer += 1;
    }

    if changed {
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn d(op: Op, text: &str) -> Diff { Diff::new(op, text) }

    #[test]
    fn test_no_change_case() {
        let mut diffs = vec![d(Op::Equal, "a"), d(Op::Delete, "b"), d(Op::Insert, "c")];
        let expected = diffs.clone();
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, expected);
    }

    #[test]
    fn test_merge_equalities() {
        let mut diffs = vec![d(Op::Equal, "a"), d(Op::Equal, "b"), d(Op::Equal, "c")];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Equal, "abc")]);
    }

    #[test]
    fn test_merge_deletions() {
        let mut diffs = vec![d(Op::Delete, "a"), d(Op::Delete, "b"), d(Op::Delete, "c")];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Delete, "abc")]);
    }

    #[test]
    fn test_merge_insertions() {
        let mut diffs = vec![d(Op::Insert, "a"), d(Op::Insert, "b"), d(Op::Insert, "c")];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Insert, "abc")]);
    }

    #[test]
    fn test_merge_interweave() {
        let mut diffs = vec![
            d(Op::Delete, "a"),
            d(Op::Insert, "b"),
            d(Op::Delete, "c"),
            d(Op::Insert, "d"),
            d(Op::Equal, "e"),
            d(Op::Equal, "f"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            diffs,
            vec![d(Op::Delete, "ac"), d(Op::Insert, "bd"), d(Op::Equal, "ef")]
        );
    }

    #[test]
    fn test_prefix_and_suffix_detection() {
        let mut diffs = vec![d(Op::Delete, "a"), d(Op::Insert, "abc"), d(Op::Delete, "dc")];
        cleanup_merge(&mut diffs);
        assert_eq!(
            diffs,
            vec![d(Op::Equal, "a"), d(Op::Delete, "d"), d(Op::Insert, "b"), d(Op::Equal, "c")]
        );
    }

    #[test]
    fn test_prefix_and_suffix_with_equalities() {
        let mut diffs = vec![
            d(Op::Equal, "x"),
            d(Op::Delete, "a"),
            d(Op::Insert, "abc"),
            d(Op::Delete, "dc"),
            d(Op::Equal, "y"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            diffs,
            vec![
                d(Op::Equal, "xa"),
                d(Op::Delete, "d"),
                d(Op::Insert, "b"),
                d(Op::Equal, "cy"),
            ]
        );
    }

    #[test]
    fn test_slide_edit_left() {
        let mut diffs = vec![d(Op::Equal, "a"), d(Op::Insert, "ba"), d(Op::Equal, "c")];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Insert, "ab"), d(Op::Equal, "ac")]);
    }

    #[test]
    fn test_slide_edit_right() {
        let mut diffs = vec![d(Op::Equal, "c"), d(Op::Insert, "ab"), d(Op::Equal, "a")];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Equal, "ca"), d(Op::Insert, "ba")]);
    }

    #[test]
    fn test_empty_merge() {
        let mut diffs: Diffs = vec![
            d(Op::Delete, "b"),
            d(Op::Insert, "ab"),
            d(Op::Equal, "c"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![d(Op::Insert, "a"), d(Op::Equal, "bc")]);
    }

    #[test]
    fn test_empty_diffs_is_noop() {
        let mut diffs: Diffs = vec![];
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![]);
    }
}
