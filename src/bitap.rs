//! Bitap fuzzy locator (§4.11): a bit-parallel shift-or search extended
//! to tolerate substitutions, insertions and deletions, with a
//! proximity-weighted score used both to rank candidates and to bound
//! how far the search window has to extend.

use std::collections::HashMap;

use crate::{config::DiffConfig, error::DiffError};

/// Finds the best occurrence of `pattern` in `text` near `loc`, scored
/// within `config.match_threshold`. Returns `None` on no sufficiently
/// close match, matching `match(...) == -1` in the original bindings.
///
/// # Errors
/// Returns [`DiffError::PatternTooLong`] when `pattern` has more code
/// points than `config.match_max_bits` can address (alphabet bitmasks
/// are `u32`, so this is also capped at 32 regardless of configuration).
pub fn match_bitap(
    text: &str,
    pattern: &str,
    loc: usize,
    config: &DiffConfig,
) -> Result<Option<usize>, DiffError> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    if pattern.len() > config.match_max_bits || pattern.len() > 32 {
        return Err(DiffError::PatternTooLong);
    }
    if pattern.is_empty() {
        return Ok(Some(loc.min(text.len())));
    }

    let alphabet = build_alphabet(&pattern);
    let score = |e: usize, x: isize| -> f64 { bitap_score(e, x, loc, pattern.len(), config) };

    let mut score_threshold = f64::from(config.match_threshold);

    if let Some(exact) = find_subslice(&text, &pattern, loc) {
        score_threshold = score_threshold.min(score(0, exact as isize));
        if let Some(exact_before) = find_last_before(&text, &pattern, loc + pattern.len()) {
            score_threshold = score_threshold.min(score(0, exact_before as isize));
        }
    }

    let match_mask = 1u32 << (pattern.len() - 1);
    let mut best_loc: Option<usize> = None;

    let mut bin_max = pattern.len() + text.len();
    let mut last_rd: Vec<u32> = Vec::new();

    for d in 0..pattern.len() {
        let mut bin_min = 0usize;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            if score(d, loc as isize + bin_mid as isize) <= score_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = bin_min + (bin_max - bin_min) / 2;
        }
        bin_max = bin_mid;

        let mut start = 1.max(loc as isize - bin_mid as isize + 1) as usize;
        let finish = (loc + bin_mid).min(text.len()) + pattern.len();

        let mut rd = vec![0u32; finish + 2];
        rd[finish + 1] = (1u32 << d) - 1;

        let mut j = finish;
        while j >= start {
            let char_match = if text.len() + 1 <= j {
                0
            } else {
                *alphabet.get(&text[j - 1]).unwrap_or(&0)
            };

            rd[j] = if d == 0 {
                ((rd[j + 1] << 1) | 1) & char_match
            } else {
                (((rd[j + 1] << 1) | 1) & char_match)
                    | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                    | last_rd[j + 1]
            };

            if rd[j] & match_mask != 0 {
                let candidate_score = score(d, j as isize - 1);
                if candidate_score <= score_threshold {
                    score_threshold = candidate_score;
                    let candidate = j - 1;
                    best_loc = Some(candidate);
                    if candidate > loc {
                        start = 1.max(2 * loc as isize - candidate as isize) as usize;
                    } else {
                        break;
                    }
                }
            }

            j -= 1;
        }

        if score(d + 1, loc as isize) > score_threshold {
            break;
        }
        last_rd = rd;
    }

    Ok(best_loc)
}

fn build_alphabet(pattern: &[char]) -> HashMap<char, u32> {
    let mut alphabet = HashMap::new();
    let len = pattern.len();
    for (i, &c) in pattern.iter().enumerate() {
        let bit = 1u32 << (len - i - 1);
        *alphabet.entry(c).or_insert(0) |= bit;
    }
    alphabet
}

fn bitap_score(e: usize, x: isize, loc: usize, pattern_len: usize, config: &DiffConfig) -> f64 {
    let accuracy = e as f64 / pattern_len as f64;
    let proximity = (loc as isize - x).unsigned_abs() as f64;
    if config.match_distance == 0 {
        if proximity > 0.0 { 1.0 } else { accuracy }
    } else {
        accuracy + proximity / f64::from(config.match_distance)
    }
}

fn find_subslice(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..].windows(needle.len()).position(|w| w == needle).map(|i| i + from)
}

fn find_last_before(text: &[char], pattern: &[char], before_or_at: usize) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return None;
    }
    let last_start = before_or_at.min(text.len() - pattern.len());
    (0..=last_start).rev().find(|&i| text[i..i + pattern.len()] == *pattern)
}
