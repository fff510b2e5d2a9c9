//! Delta codec (§6): a compact, text-safe serialization of a diff
//! script relative to its `text1`, used to ship a diff without sending
//! both full texts.

use crate::{
    diff::{Diff, Diffs, Op},
    error::DiffError,
};

/// Encodes `diffs` as `=n`/`-n`/`+percent-encoded-text` segments joined
/// by tabs. `%20` is restored to a literal space after encoding, since
/// that's the one escape humans reading a delta trip over most.
#[must_use]
pub fn to_delta(diffs: &Diffs) -> String {
    let mut parts = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match diff.op {
            Op::Equal => parts.push(format!("={}", diff.len())),
            Op::Delete => parts.push(format!("-{}", diff.len())),
            Op::Insert => parts.push(format!("+{}", percent_encode(&diff.text))),
        }
    }
    parts.join("\t")
}

/// Decodes a delta produced by [`to_delta`] against the original
/// `text1`, reconstructing the original diff script.
///
/// # Errors
/// - [`DiffError::InvalidOperation`] on an unrecognized leading tag.
/// - [`DiffError::InvalidLength`] on a non-numeric or negative `=`/`-` length.
/// - [`DiffError::InvalidEscape`] on a malformed `%XX` escape in an insertion.
/// - [`DiffError::DeltaLengthMismatch`] if the lengths consumed from
///   `text1` don't add up to exactly `text1`'s length.
pub fn from_delta(text1: &str, delta: &str) -> Result<Diffs, DiffError> {
    let text1: Vec<char> = text1.chars().collect();
    let mut pointer = 0usize;
    let mut diffs = Diffs::new();

    for token in delta.split('\t').filter(|t| !t.is_empty()) {
        let (tag, rest) = token.split_at(1);
        match tag {
            "+" => {
                let decoded = percent_decode(rest)?;
                diffs.push(Diff::insert(decoded));
            }
            "-" | "=" => {
                let n: usize = rest.parse().map_err(|_| DiffError::InvalidLength(rest.to_owned()))?;
                if pointer + n > text1.len() {
                    return Err(DiffError::DeltaLengthMismatch {
                        delta_length: pointer + n,
                        text1_length: text1.len(),
                    });
                }
                let slice: String = text1[pointer..pointer + n].iter().collect();
                pointer += n;
                if tag == "=" {
                    diffs.push(Diff::equal(slice));
                } else {
                    diffs.push(Diff::delete(slice));
                }
            }
            other => return Err(DiffError::InvalidOperation(other.to_owned())),
        }
    }

    if pointer != text1.len() {
        return Err(DiffError::DeltaLengthMismatch {
            delta_length: pointer,
            text1_length: text1.len(),
        });
    }

    Ok(diffs)
}

/// URI-percent-encodes `text`, then restores `%20` back to a literal
/// space (diff-match-patch's convention: spaces read better unescaped,
/// every other reserved character stays encoded).
fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.as_bytes() {
        let c = *byte as char;
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '!' | '*' | '\'' | '(' | ')') {
            out.push(c);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out.replace("%20", " ")
}

fn percent_decode(text: &str) -> Result<String, DiffError> {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = text
                    .get(i + 1..i + 3)
                    .ok_or_else(|| DiffError::InvalidEscape(text.to_owned()))?;
                let byte = u8::from_str_radix(hex, 16).map_err(|_| DiffError::InvalidEscape(text.to_owned()))?;
                decoded.push(byte);
                i += 3;
            }
            b => {
                decoded.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(decoded).map_err(|_| DiffError::InvalidEscape(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_to_delta_basic() {
        let diffs = vec![Diff::equal("jump"), Diff::delete("s over"), Diff::insert(" and walks")];
        assert_eq!(to_delta(&diffs), "=4\t-6\t+ and walks");
    }

    #[test]
    fn test_round_trip() {
        let diffs = vec![
            Diff::equal("jump"),
            Diff::delete("s over"),
            Diff::insert(" and walks"),
            Diff::equal(" the lazy"),
        ];
        let text1 = "jumps over the lazy";
        let delta = to_delta(&diffs);
        assert_eq!(from_delta(text1, &delta).unwrap(), diffs);
    }

    #[test]
    fn test_round_trip_with_unicode_insertion() {
        let diffs = vec![Diff::equal("abc"), Diff::insert("日本語")];
        let delta = to_delta(&diffs);
        assert_eq!(from_delta("abc", &delta).unwrap(), diffs);
    }

    #[test]
    fn test_invalid_length() {
        let err = from_delta("abc", "=x").unwrap_err();
        assert_eq!(err, DiffError::InvalidLength("x".to_owned()));
    }

    #[test]
    fn test_invalid_operation() {
        let err = from_delta("abc", "?3").unwrap_err();
        assert_eq!(err, DiffError::InvalidOperation("?".to_owned()));
    }

    #[test]
    fn test_invalid_escape() {
        let err = from_delta("abc", "+%zz").unwrap_err();
        assert_eq!(err, DiffError::InvalidEscape("%zz".to_owned()));
    }

    #[test]
    fn test_delta_length_mismatch() {
        let err = from_delta("abc", "=5").unwrap_err();
        assert_eq!(
            err,
            DiffError::DeltaLengthMismatch { delta_length: 5, text1_length: 3 }
        );
    }

    #[test]
    fn test_delta_length_mismatch_too_short() {
        let err = from_delta("abcdef", "=3").unwrap_err();
        assert_eq!(
            err,
            DiffError::DeltaLengthMismatch { delta_length: 3, text1_length: 6 }
        );
    }
}
