//! Half-match speedup (§4.5): find a common substring at least half the
//! length of the longer text and split the problem around it for free.
//!
//! Suppressed whenever [`DiffConfig::is_unlimited`] holds, since an
//! unbounded bisector is already optimal and the speedup trades away
//! minimality.

use crate::{config::DiffConfig, util::{common_prefix_len, common_suffix_len}};

/// `(a_prefix, a_suffix, b_prefix, b_suffix, mid_common)` such that
/// `a_prefix + mid_common + a_suffix == text1` and the analogous identity
/// holds for `text2`, with `mid_common.len() >= longer.len() / 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HalfMatch {
    pub a_prefix: Vec<char>,
    pub a_suffix: Vec<char>,
    pub b_prefix: Vec<char>,
    pub b_suffix: Vec<char>,
    pub mid_common: Vec<char>,
}

pub(crate) fn diff_half_match(
    text1: &[char],
    text2: &[char],
    config: &DiffConfig,
) -> Option<HalfMatch> {
    if config.is_unlimited() {
        return None;
    }

    let (long_text, short_text, long_is_text1) = if text1.len() > text2.len() {
        (text1, text2, true)
    } else {
        (text2, text1, false)
    };

    if long_text.len() < 4 || short_text.len() * 2 < long_text.len() {
        return None;
    }

    let hm1 = half_match_at(long_text, short_text, long_text.len().div_ceil(4));
    let hm2 = half_match_at(long_text, short_text, long_text.len().div_ceil(2));

    let best = match (hm1, hm2) {
        (None, None) => return None,
        (Some(h), None) | (None, Some(h)) => h,
        (Some(h1), Some(h2)) => {
            if h1.mid_common.len() >= h2.mid_common.len() {
                h1
            } else {
                h2
            }
        }
    };

    // `best` is currently in (long, short) order; re-orient to (text1, text2).
    Some(if long_is_text1 {
        best
    } else {
        HalfMatch {
            a_prefix: best.b_prefix,
            a_suffix: best.b_suffix,
            b_prefix: best.a_prefix,
            b_suffix: best.a_suffix,
            mid_common: best.mid_common,
        }
    })
}

/// Probes for a seed of length `long.len() / 4` starting at `i`, extends
/// every occurrence of that seed in `short` maximally by common
/// prefix/suffix, and returns the best (longest total overlap) extension,
/// provided it covers at least half of `long`.
fn half_match_at(long: &[char], short: &[char], i: usize) -> Option<HalfMatch> {
    let seed_len = long.len() / 4;
    let seed = &long[i..i + seed_len];

    let mut best_common_len = 0;
    let mut best: Option<HalfMatch> = None;

    let mut search_from = 0;
    while let Some(found) = find_subslice(&short[search_from..], seed) {
        let j = search_from + found;

        let prefix_len = common_prefix_len(&long[i..], &short[j..]);
        let suffix_len = common_suffix_len(&long[..i], &short[..j]);

        if suffix_len + prefix_len > best_common_len {
            best_common_len = suffix_len + prefix_len;
            best = Some(HalfMatch {
                a_prefix: long[..i - suffix_len].to_vec(),
                a_suffix: long[i + prefix_len..].to_vec(),
                b_prefix: short[..j - suffix_len].to_vec(),
                b_suffix: short[j + prefix_len..].to_vec(),
                mid_common: [&short[j - suffix_len..j], &short[j..j + prefix_len]].concat(),
            });
        }

        search_from = j + 1;
        if search_from > short.len() {
            break;
        }
    }

    best.filter(|hm| hm.mid_common.len() * 2 >= long.len())
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
