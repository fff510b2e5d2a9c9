//! Small primitives shared by the peeler, half-match and overlap-extraction
//! passes: common-prefix/suffix length and common-overlap length.

/// Length of the longest common prefix of `a` and `b`, found by binary
/// search doubling: start from the full shorter length and shrink the
/// search window whenever the candidate prefix doesn't match.
#[must_use]
pub fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    let n = a.len().min(b.len());
    if n == 0 || a[0] != b[0] {
        return 0;
    }

    let mut pointer_min = 0;
    let mut pointer_max = n;
    let mut pointer_mid = n;
    let mut pointer_start = 0;

    while pointer_min < pointer_mid {
        if a[pointer_start..pointer_mid] == b[pointer_start..pointer_mid] {
            pointer_min = pointer_mid;
            pointer_start = pointer_min;
        } else {
            pointer_max = pointer_mid;
        }
        pointer_mid = pointer_min + (pointer_max - pointer_min) / 2;
    }

    pointer_mid
}

/// Length of the longest common suffix of `a` and `b`, mirroring
/// [`common_prefix_len`].
#[must_use]
pub fn common_suffix_len(a: &[char], b: &[char]) -> usize {
    let n = a.len().min(b.len());
    if n == 0 || a[a.len() - 1] != b[b.len() - 1] {
        return 0;
    }

    let mut pointer_min = 0;
    let mut pointer_max = n;
    let mut pointer_mid = n;
    let mut pointer_end = 0;

    while pointer_min < pointer_mid {
        let a_from = a.len() - pointer_mid;
        let b_from = b.len() - pointer_mid;
        if a[a_from..a.len() - pointer_end] == b[b_from..b.len() - pointer_end] {
            pointer_min = pointer_mid;
            pointer_end = pointer_min;
        } else {
            pointer_max = pointer_mid;
        }
        pointer_mid = pointer_min + (pointer_max - pointer_min) / 2;
    }

    pointer_mid
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
///
/// Used by semantic cleanup to split `DELETE "abcXYZ" / INSERT "XYZdef"`
/// into `DELETE "abc" / EQUAL "XYZ" / INSERT "def"`.
#[must_use]
pub fn common_overlap_len(a: &[char], b: &[char]) -> usize {
    let (a_len, b_len) = (a.len(), b.len());
    if a_len == 0 || b_len == 0 {
        return 0;
    }

    let (a, b) = if a_len > b_len {
        (&a[a_len - b_len..], b)
    } else if a_len < b_len {
        (a, &b[..a_len])
    } else {
        (a, b)
    };
    let text_length = a.len().min(b.len());

    if a == b {
        return text_length;
    }

    // Start with a length-1 suffix/prefix match and grow it, jumping ahead
    // by the next occurrence of the candidate pattern in `b` whenever the
    // current candidate isn't actually a match.
    let mut best = 0;
    let mut length = 1;
    loop {
        let pattern = &a[text_length - length..];
        match find_subslice(b, pattern) {
            None => return best,
            Some(found) => {
                length += found;
                if found == 0 || a[text_length - length..] == b[..length] {
                    best = length;
                    length += 1;
                }
                if length > text_length {
                    return best;
                }
            }
        }
    }
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// `str`-based wrapper around [`common_prefix_len`] for the public API
/// (§6 `common_prefix`).
#[must_use]
pub fn common_prefix(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    common_prefix_len(&a, &b)
}

/// `str`-based wrapper around [`common_suffix_len`] for the public API
/// (§6 `common_suffix`).
#[must_use]
pub fn common_suffix(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    common_suffix_len(&a, &b)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("", "", 0)]
    #[test_case("abc", "", 0)]
    #[test_case("abc", "xyz", 0)]
    #[test_case("1234abcdef", "1234xyz", 4)]
    #[test_case("1234", "1234xyz", 4)]
    fn test_common_prefix(a: &str, b: &str, expected: usize) {
        assert_eq!(common_prefix(a, b), expected);
    }

    #[test_case("", "", 0)]
    #[test_case("abc", "", 0)]
    #[test_case("abc", "xyz", 0)]
    #[test_case("abcdef1234", "xyz1234", 4)]
    #[test_case("1234", "xyz1234", 4)]
    fn test_common_suffix(a: &str, b: &str, expected: usize) {
        assert_eq!(common_suffix(a, b), expected);
    }

    #[test]
    fn test_common_prefix_matches_naive() {
        for (a, b) in [
            ("", "hello"),
            ("hello", "help"),
            ("abcdefgh", "abcdzzzz"),
            ("日本語abc", "日本語xyz"),
        ] {
            let ca: Vec<char> = a.chars().collect();
            let cb: Vec<char> = b.chars().collect();
            let naive = ca.iter().zip(cb.iter()).take_while(|(x, y)| x == y).count();
            assert_eq!(common_prefix_len(&ca, &cb), naive, "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn test_common_overlap() {
        let a: Vec<char> = "fi".chars().collect();
        let b: Vec<char> = "".chars().collect();
        assert_eq!(common_overlap_len(&a, &b), 0);

        let a: Vec<char> = "abcXYZ".chars().collect();
        let b: Vec<char> = "XYZdef".chars().collect();
        assert_eq!(common_overlap_len(&a, &b), 3);

        let a: Vec<char> = "1234".chars().collect();
        let b: Vec<char> = "1234xyz".chars().collect();
        assert_eq!(common_overlap_len(&a, &b), 4);

        let a: Vec<char> = "123456xxx".chars().collect();
        let b: Vec<char> = "xxxabcd".chars().collect();
        assert_eq!(common_overlap_len(&a, &b), 3);

        // Unicode: overlaps don't split a codepoint because we never
        // sliced anything narrower than a `char`.
        let a: Vec<char> = "fi".chars().collect();
        let b: Vec<char> = "\u{fb01}i".chars().collect();
        assert_eq!(common_overlap_len(&a, &b), 0);
    }
}
