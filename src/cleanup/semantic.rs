//! Semantic cleanup (§4.7): make a diff readable by a human rather than
//! merely minimal. Three phases: elide equalities too short to mean
//! anything next to the edits around them, slide single edits to a
//! logical (word/line/sentence) boundary, then pull any overlap between
//! a delete and the insert that immediately follows it out into its own
//! equality.

use crate::{
    cleanup::merge::cleanup_merge,
    config::DiffConfig,
    diff::{Diff, Diffs, Op},
    util::common_overlap_len,
};

pub fn cleanup_semantic(diffs: &mut Diffs, _config: &DiffConfig) {
    elide_short_equalities(diffs);
    shift_to_lossless_boundaries(diffs);
    extract_edit_pair_overlap(diffs);
}

/// Phase 1: split any equality that's dominated on both sides by the
/// edits flanking it back into a delete+insert pair, since it isn't
/// actually doing useful work separating them.
fn elide_short_equalities(diffs: &mut Diffs) {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;

    let mut length_insertions1 = 0usize;
    let mut length_deletions1 = 0usize;
    let mut length_insertions2 = 0usize;
    let mut length_deletions2 = 0usize;

    let mut pointer: isize = 0;
    while (pointer as usize) < diffs.len() {
        let index = pointer as usize;
        if diffs[index].op == Op::Equal {
            equalities.push(index);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = Some(diffs[index].text.clone());
        } else {
            if diffs[index].op == Op::Insert {
                length_insertions2 += diffs[index].len();
            } else {
                length_deletions2 += diffs[index].len();
            }

            if let Some(equality) = &last_equality {
                let equality_len = equality.chars().count();
                if equality_len <= length_insertions1.max(length_deletions1)
                    && equality_len <= length_insertions2.max(length_deletions2)
                {
                    let split_at = *equalities.last().expect("last_equality implies a pushed index");
                    diffs.insert(split_at, Diff::delete(equality.clone()));
                    diffs[split_at + 1].op = Op::Insert;

                    equalities.pop();
                    equalities.pop();
                    pointer = equalities.last().map_or(-1, |&i| i as isize);

                    length_insertions1 = 0;
                    length_deletions1 = 0;
                    length_insertions2 = 0;
                    length_deletions2 = 0;
                    last_equality = None;
                    changed = true;
                }
            }
        }
        pointer += 1;
    }

    if changed {
        cleanup_merge(diffs);
    }
}

/// Phase 2: slide every isolated edit as far left as its common suffix
/// with the left equality allows, then walk it right one code point at a
/// time, keeping whichever position scores highest per
/// [`boundary_score`] (ties favor the rightmost position, which produces
/// trailing rather than leading whitespace).
fn shift_to_lossless_boundaries(diffs: &mut Diffs) {
    let mut pointer = 1;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            let mut equality1: Vec<char> = diffs[pointer - 1].text.chars().collect();
            let mut edit: Vec<char> = diffs[pointer].text.chars().collect();
            let mut equality2: Vec<char> = diffs[pointer + 1].text.chars().collect();

            let common_offset = crate::util::common_suffix_len(&equality1, &edit);
            if common_offset != 0 {
                let common: Vec<char> = edit[edit.len() - common_offset..].to_vec();
                equality1.truncate(equality1.len() - common_offset);
                let mut new_edit = common.clone();
                new_edit.extend_from_slice(&edit[..edit.len() - common_offset]);
                edit = new_edit;
                let mut new_equality2 = common;
                new_equality2.extend_from_slice(&equality2);
                equality2 = new_equality2;
            }

            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);

                let score = boundary_score(&equality1, &edit) + boundary_score(&edit, &equality2);
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text.chars().ne(best_equality1.iter().copied()) {
                if !best_equality1.is_empty() {
                    diffs[pointer - 1].text = best_equality1.into_iter().collect();
                } else {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                }
                diffs[pointer].text = best_edit.into_iter().collect();
                if !best_equality2.is_empty() {
                    diffs[pointer + 1].text = best_equality2.into_iter().collect();
                } else {
                    diffs.remove(pointer + 1);
                    pointer -= 1;
                }
            }
        }
        pointer += 1;
    }
}

fn is_non_alphanumeric(c: char) -> bool { !c.is_alphanumeric() }
fn is_whitespace(c: char) -> bool { c.is_whitespace() }
fn is_linebreak(c: char) -> bool { c == '\n' || c == '\r' }

fn ends_with_blank_line(chars: &[char]) -> bool {
    let s: String = chars.iter().collect();
    s.ends_with("\n\n") || s.ends_with("\n\r\n")
}

fn starts_with_blank_line(chars: &[char]) -> bool {
    let s: String = chars.iter().collect();
    s.starts_with("\n\n")
        || s.starts_with("\r\n\r\n")
        || s.starts_with("\n\r\n")
        || s.starts_with("\r\n\n")
}

/// Scores the boundary between `one` and `two` from 0 (arbitrary
/// mid-token split) to 6 (string edge), per §4.7's fixed rubric.
fn boundary_score(one: &[char], two: &[char]) -> i32 {
    if one.is_empty() || two.is_empty() {
        return 6;
    }

    let char1 = one[one.len() - 1];
    let char2 = two[0];

    let non_alnum1 = is_non_alphanumeric(char1);
    let non_alnum2 = is_non_alphanumeric(char2);
    let whitespace1 = non_alnum1 && is_whitespace(char1);
    let whitespace2 = non_alnum2 && is_whitespace(char2);
    let linebreak1 = whitespace1 && is_linebreak(char1);
    let linebreak2 = whitespace2 && is_linebreak(char2);
    let blank_line1 = linebreak1 && ends_with_blank_line(one);
    let blank_line2 = linebreak2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if linebreak1 || linebreak2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

/// Phase 3: a delete immediately followed by an insert often share a
/// run of text at the delete's tail / insert's head (or vice versa);
/// pulling the larger overlap out into its own equality turns a replace
/// into delete+equal+insert, which is easier to read.
fn extract_edit_pair_overlap(diffs: &mut Diffs) {
    let mut pointer = 1;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion: Vec<char> = diffs[pointer - 1].text.chars().collect();
            let insertion: Vec<char> = diffs[pointer].text.chars().collect();

            let overlap_len1 = common_overlap_len(&deletion, &insertion);
            let overlap_len2 = common_overlap_len(&insertion, &deletion);

            if overlap_len1 >= overlap_len2 {
                if overlap_len1 * 2 >= deletion.len() || overlap_len1 * 2 >= insertion.len() {
                    let overlap_text: String = insertion[..overlap_len1].iter().collect();
                    diffs.insert(pointer, Diff::equal(overlap_text));
                    diffs[pointer - 1].text =
                        deletion[..deletion.len() - overlap_len1].iter().collect();
                    diffs[pointer + 1].text = insertion[overlap_len1..].iter().collect();
                    pointer += 1;
                }
            } else if overlap_len2 * 2 >= deletion.len() || overlap_len2 * 2 >= insertion.len() {
                let overlap_text: String = deletion[..overlap_len2].iter().collect();
                diffs.insert(pointer, Diff::equal(overlap_text));
                diffs[pointer - 1].op = Op::Insert;
                diffs[pointer - 1].text =
                    insertion[..insertion.len() - overlap_len2].iter().collect();
                diffs[pointer].op = Op::Delete;
                diffs[pointer].text = deletion[overlap_len2..].iter().collect();
                pointer += 1;
            }
        }
        pointer += 1;
    }

    diffs.retain(|d| !d.is_empty());
}
