//! Myers' O(ND) middle-snake bisection (§4.3).
//!
//! Runs the greedy-LCS search simultaneously forward (from the start of
//! both texts) and backward (from their ends) until the two frontiers
//! overlap. The overlap point is the middle snake; the two halves either
//! side of it are solved by recursing into the full [`crate::differ`]
//! pipeline, which is how half-match and line-mode get a chance to apply
//! to the sub-problems too.

use std::time::Instant;

use crate::{config::DiffConfig, diff::{Diff, Diffs}, differ};

pub(crate) fn diff_bisect(
    text1: &[char],
    text2: &[char],
    deadline: Instant,
    config: &DiffConfig,
) -> Diffs {
    let text1_len = text1.len();
    let text2_len = text2.len();
    let max_d = (text1_len + text2_len).div_ceil(2) + 1;
    let v_offset = max_d as isize;
    let v_length = 2 * max_d;

    let mut v1 = vec![-1isize; v_length];
    let mut v2 = vec![-1isize; v_length];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = text1_len as isize - text2_len as isize;
    // If the total number of characters is odd, the front path's overlap
    // check is meaningful on the first iteration; otherwise the back
    // path's is.
    let front = delta % 2 != 0;

    let mut k1_start = 0isize;
    let mut k1_end = 0isize;
    let mut k2_start = 0isize;
    let mut k2_end = 0isize;

    for d in 0..max_d as isize {
        if Instant::now() >= deadline {
            break;
        }

        // Forward path.
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let k1_offset = v_offset + k1;
            let mut x1 = if k1 == -d
                || (k1 != d && v1[(k1_offset - 1) as usize] < v1[(k1_offset + 1) as usize])
            {
                v1[(k1_offset + 1) as usize]
            } else {
                v1[(k1_offset - 1) as usize] + 1
            };
            let mut y1 = x1 - k1;
            while (x1 as usize) < text1_len
                && (y1 as usize) < text2_len
                && text1[x1 as usize] == text2[y1 as usize]
            {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset as usize] = x1;

            if x1 as usize > text1_len {
                k1_end += 2;
            } else if y1 as usize > text2_len {
                k1_start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0
                    && (k2_offset as usize) < v_length
                    && v2[k2_offset as usize] != -1
                {
                    let x2 = text1_len as isize - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(text1, text2, x1 as usize, y1 as usize, deadline, config);
                    }
                }
            }

            k1 += 2;
        }

        // Reverse path.
        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let k2_offset = v_offset + k2;
            let mut x2 = if k2 == -d
                || (k2 != d && v2[(k2_offset - 1) as usize] < v2[(k2_offset + 1) as usize])
            {
                v2[(k2_offset + 1) as usize]
            } else {
                v2[(k2_offset - 1) as usize] + 1
            };
            let mut y2 = x2 - k2;
            while (x2 as usize) < text1_len
                && (y2 as usize) < text2_len
                && text1[text1_len - (x2 as usize) - 1] == text2[text2_len - (y2 as usize) - 1]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset as usize] = x2;

            if x2 as usize > text1_len {
                k2_end += 2;
            } else if y2 as usize > text2_len {
                k2_start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0
                    && (k1_offset as usize) < v_length
                    && v1[k1_offset as usize] != -1
                {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let mirrored_x2 = text1_len as isize - x2;
                    if x1 >= mirrored_x2 {
                        return bisect_split(text1, text2, x1 as usize, y1 as usize, deadline, config);
                    }
                }
            }

            k2 += 2;
        }
    }

    // Deadline exceeded before a middle snake was found: fall back to a
    // single delete+insert pair. Valid, just not minimal.
    vec![
        Diff::delete(text1.iter().collect::<String>()),
        Diff::insert(text2.iter().collect::<String>()),
    ]
}

fn bisect_split(
    text1: &[char],
    text2: &[char],
    x: usize,
    y: usize,
    deadline: Instant,
    config: &DiffConfig,
) -> Diffs {
    let (text1_a, text1_b) = text1.split_at(x);
    let (text2_a, text2_b) = text2.split_at(y);

    let mut diffs = differ::diff_main_chars(text1_a, text2_a, false, deadline, config);
    diffs.extend(differ::diff_main_chars(text1_b, text2_b, false, deadline, config));
    diffs
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diff::{text1 as script_text1, text2 as script_text2};

    fn run(a: &str, b: &str) -> Diffs {
        let ca: Vec<char> = a.chars().collect();
        let cb: Vec<char> = b.chars().collect();
        diff_bisect(&ca, &cb, Instant::now() + Duration::from_secs(5), &DiffConfig::default())
    }

    #[test]
    fn test_round_trip() {
        for (a, b) in [("cat", "map"), ("", "abc"), ("abc", ""), ("1234", "1a3a")] {
            let diffs = run(a, b);
            assert_eq!(script_text1(&diffs), a);
            assert_eq!(script_text2(&diffs), b);
        }
    }

    #[test]
    fn test_deadline_bails_out_to_valid_script() {
        let ca: Vec<char> = "abcdefgh".chars().collect();
        let cb: Vec<char> = "xyz12345".chars().collect();
        let diffs = diff_bisect(&ca, &cb, Instant::now(), &DiffConfig::default());
        assert_eq!(script_text1(&diffs), "abcdefgh");
        assert_eq!(script_text2(&diffs), "xyz12345");
    }
}
