//! Peeler & dispatcher (§4.1–§4.2): the entry point every other module
//! (bisector, line-mode, half-match) recurses back into, and the owner
//! of a [`DiffConfig`] for callers that want [`Differ::diff`] and
//! [`Differ::match_pattern`] bundled with a fixed configuration.

use std::time::{Duration, Instant};

use crate::{
    bisect::diff_bisect,
    bitap::match_bitap,
    cleanup,
    config::DiffConfig,
    diff::{self, Diff, Diffs, Op},
    error::DiffError,
    half_match::diff_half_match,
    line_mode::diff_line_mode,
    util::{common_prefix_len, common_suffix_len},
};

/// A diff/match engine bound to one [`DiffConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Differ {
    pub config: DiffConfig,
}

impl Differ {
    #[must_use]
    pub fn new(config: DiffConfig) -> Self { Differ { config } }

    /// Computes a diff script transforming `text1` into `text2`, followed
    /// by merge cleanup. `checklines` enables the line-mode speedup
    /// (§4.4) for large inputs; callers chasing minimality over speed on
    /// huge inputs should pass `false`.
    #[must_use]
    pub fn diff(&self, text1: &str, text2: &str, checklines: bool) -> Diffs {
        let deadline = self.deadline();
        let t1: Vec<char> = text1.chars().collect();
        let t2: Vec<char> = text2.chars().collect();
        diff_main_chars(&t1, &t2, checklines, deadline, &self.config)
    }

    /// Runs all three cleanup passes (semantic, then efficiency, then
    /// merge, mirroring the order the original bindings run them in).
    pub fn cleanup_semantic(&self, diffs: &mut Diffs) {
        cleanup::semantic::cleanup_semantic(diffs, &self.config);
    }

    pub fn cleanup_efficiency(&self, diffs: &mut Diffs) {
        cleanup::efficiency::cleanup_efficiency(diffs, &self.config);
    }

    pub fn cleanup_merge(&self, diffs: &mut Diffs) {
        cleanup::merge::cleanup_merge(diffs);
    }

    /// Finds the best match for `pattern` in `text` near `loc` (§4.11).
    ///
    /// # Errors
    /// Returns [`DiffError::PatternTooLong`] when `pattern` exceeds
    /// `self.config.match_max_bits` code points.
    pub fn match_pattern(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>, DiffError> {
        match_bitap(text, pattern, loc, &self.config)
    }

    fn deadline(&self) -> Instant {
        if self.config.is_unlimited() {
            Instant::now() + Duration::from_secs(60 * 60 * 24 * 365)
        } else {
            Instant::now() + self.config.diff_timeout
        }
    }
}

/// The recursive core every speedup and the bisector call back into.
/// Peels the common prefix/suffix, short-circuits on an empty or equal
/// residual, dispatches to a speedup or the bisector, then re-attaches
/// the peeled prefix/suffix and runs merge cleanup.
pub(crate) fn diff_main_chars(
    text1: &[char],
    text2: &[char],
    checklines: bool,
    deadline: Instant,
    config: &DiffConfig,
) -> Diffs {
    if text1 == text2 {
        return if text1.is_empty() {
            Vec::new()
        } else {
            vec![Diff::equal(text1.iter().collect::<String>())]
        };
    }

    let prefix_len = common_prefix_len(text1, text2);
    let (prefix, text1) = text1.split_at(prefix_len);
    let (_, text2) = text2.split_at(prefix_len);

    let suffix_len = common_suffix_len(text1, text2);
    let (text1, suffix) = text1.split_at(text1.len() - suffix_len);
    let (text2, _) = text2.split_at(text2.len() - suffix_len);

    let mut diffs = diff_compute(text1, text2, checklines, deadline, config);

    if !prefix.is_empty() {
        diffs.insert(0, Diff::equal(prefix.iter().collect::<String>()));
    }
    if !suffix.is_empty() {
        diffs.push(Diff::equal(suffix.iter().collect::<String>()));
    }

    cleanup::merge::cleanup_merge(&mut diffs);
    diffs
}

/// Dispatcher (§4.2): `text1`/`text2` are already prefix/suffix-peeled.
/// Applies the first speedup that matches, falling back to the bisector.
fn diff_compute(
    text1: &[char],
    text2: &[char],
    checklines: bool,
    deadline: Instant,
    config: &DiffConfig,
) -> Diffs {
    if text1.is_empty() {
        return if text2.is_empty() {
            Vec::new()
        } else {
            vec![Diff::insert(text2.iter().collect::<String>())]
        };
    }
    if text2.is_empty() {
        return vec![Diff::delete(text1.iter().collect::<String>())];
    }

    let (longtext, shorttext, text1_is_longer) = if text1.len() > text2.len() {
        (text1, text2, true)
    } else {
        (text2, text1, false)
    };

    if let Some(i) = find_subslice(longtext, shorttext) {
        let outside_op = if text1_is_longer { Op::Delete } else { Op::Insert };
        let mut diffs = vec![
            Diff::new(outside_op, longtext[..i].iter().collect::<String>()),
            Diff::equal(shorttext.iter().collect::<String>()),
            Diff::new(outside_op, longtext[i + shorttext.len()..].iter().collect::<String>()),
        ];
        diffs.retain(|d| !d.is_empty());
        return diffs;
    }

    if shorttext.len() == 1 {
        return vec![Diff::delete(text1.iter().collect::<String>()), Diff::insert(text2.iter().collect::<String>())];
    }

    if let Some(hm) = diff_half_match(text1, text2, config) {
        let diffs_a = diff_main_chars(&hm.a_prefix, &hm.b_prefix, checklines, deadline, config);
        let diffs_b = diff_main_chars(&hm.a_suffix, &hm.b_suffix, checklines, deadline, config);
        let mut diffs = diffs_a;
        diffs.push(Diff::equal(hm.mid_common.iter().collect::<String>()));
        diffs.extend(diffs_b);
        return diffs;
    }

    if checklines && text1.len() > 100 && text2.len() > 100 {
        let t1: String = text1.iter().collect();
        let t2: String = text2.iter().collect();
        return diff_line_mode(&t1, &t2, deadline, config);
    }

    diff_bisect(text1, text2, deadline, config)
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
