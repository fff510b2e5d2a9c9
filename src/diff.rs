use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of edit a [`Diff`] segment represents.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Delete,
    Insert,
    Equal,
}

/// A single `(op, text)` segment of a diff script.
///
/// `text` is non-empty for any segment that's part of a script handed back
/// to a caller; empty segments may appear transiently while cleanup passes
/// run and are always swept out before the pass returns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: Op,
    pub text: String,
}

impl Diff {
    #[must_use]
    pub fn new(op: Op, text: impl Into<String>) -> Self { Diff { op, text: text.into() } }

    #[must_use]
    pub fn delete(text: impl Into<String>) -> Self { Diff::new(Op::Delete, text) }

    #[must_use]
    pub fn insert(text: impl Into<String>) -> Self { Diff::new(Op::Insert, text) }

    #[must_use]
    pub fn equal(text: impl Into<String>) -> Self { Diff::new(Op::Equal, text) }

    #[must_use]
    pub fn len(&self) -> usize { self.text.chars().count() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }
}

impl Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.op {
            Op::Delete => '-',
            Op::Insert => '+',
            Op::Equal => '=',
        };
        write!(f, "{tag}\"{}\"", self.text.replace('\n', "\\n"))
    }
}

/// An ordered edit script, i.e. the output of [`crate::Differ::diff`].
///
/// Any script returned to a caller upholds the round-trip invariant:
/// concatenating the texts of the non-insert segments reproduces
/// `text1`, and concatenating the texts of the non-delete segments
/// reproduces `text2`.
pub type Diffs = Vec<Diff>;

/// Reconstructs the source text by concatenating every non-insert segment.
#[must_use]
pub fn text1(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Insert)
        .map(|d| d.text.as_str())
        .collect()
}

/// Reconstructs the destination text by concatenating every non-delete
/// segment.
#[must_use]
pub fn text2(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Delete)
        .map(|d| d.text.as_str())
        .collect()
}

/// An upper bound on the number of edits required to transform `text1`
/// into `text2` according to this script: the number of inserted plus
/// deleted characters, with an insert directly followed by a delete of
/// the same length counted as a single substitution.
#[must_use]
pub fn levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0;
    let mut insertions = 0;
    let mut deletions = 0;

    for diff in diffs {
        match diff.op {
            Op::Insert => insertions += diff.len(),
            Op::Delete => deletions += diff.len(),
            Op::Equal => {
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }

    levenshtein + insertions.max(deletions)
}

/// Maps a character offset in `text1` to the equivalent offset in `text2`
/// by walking the script and accumulating non-insert lengths (for
/// `text1`) and non-delete lengths (for `text2`) until `loc` is passed.
///
/// If `loc` falls inside a delete segment, the position just before that
/// segment (in `text2`) is returned, since the characters at `loc` no
/// longer exist in the destination text.
#[must_use]
pub fn x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut last_diff: Option<&Diff> = None;

    for diff in diffs {
        if diff.op != Op::Insert {
            chars1 += diff.len();
        }
        if diff.op != Op::Delete {
            chars2 += diff.len();
        }
        if chars1 > loc {
            last_diff = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }

    match last_diff {
        Some(Diff { op: Op::Delete, .. }) => last_chars2,
        Some(_) => last_chars2 + (loc - last_chars1),
        None => chars2,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_round_trip() {
        let diffs = vec![Diff::equal("The "), Diff::insert("big "), Diff::equal("cat")];
        assert_eq!(text1(&diffs), "The cat");
        assert_eq!(text2(&diffs), "The big cat");
    }

    #[test]
    fn test_x_index() {
        let diffs = vec![Diff::equal("The "), Diff::insert("big "), Diff::equal("cat")];
        assert_eq!(x_index(&diffs, 5), 9);
        assert_eq!(x_index(&diffs, 0), 0);
        assert_eq!(x_index(&diffs, 7), 11);
    }

    #[test]
    fn test_x_index_inside_delete() {
        let diffs = vec![
            Diff::equal("ab"),
            Diff::delete("xyz"),
            Diff::equal("cd"),
        ];
        // Position 3 is inside the deleted "xyz"; it maps to the text2
        // offset right before the deletion.
        assert_eq!(x_index(&diffs, 3), 2);
    }

    #[test]
    fn test_levenshtein() {
        let diffs = vec![Diff::equal("abc"), Diff::delete("xyz"), Diff::insert("12")];
        assert_eq!(levenshtein(&diffs), 3);

        let diffs = vec![Diff::delete("abc"), Diff::insert("xyz")];
        assert_eq!(levenshtein(&diffs), 3);
    }

    #[test]
    fn test_levenshtein_monotonic_bounds() {
        let diffs = vec![Diff::delete("abc"), Diff::equal("xy"), Diff::insert("z")];
        let a_len = text1(&diffs).chars().count();
        let b_len = text2(&diffs).chars().count();
        let value = levenshtein(&diffs);
        assert!(value <= a_len + b_len);
    }
}
