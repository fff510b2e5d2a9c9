use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Process- or instance-scoped tuning knobs for the diff and match engines.
///
/// Every field mirrors a constant from the classic diff-match-patch family
/// of algorithms; the defaults reproduce its behaviour.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffConfig {
    /// Number of seconds to spend computing a diff before the bisector
    /// bails out with a degenerate but valid result. Zero means
    /// unlimited, which also suppresses the half-match speedup so that
    /// the result stays optimal.
    pub diff_timeout: Duration,

    /// Cost of an empty edit operation in terms of equivalent characters,
    /// used by [`crate::cleanup::efficiency`].
    pub diff_edit_cost: i32,

    /// At what point is no match declared (`1.0` = accept anything,
    /// `0.0` = perfection required).
    pub match_threshold: f32,

    /// How far to search for a match (`0` = exact location required,
    /// larger values allow the match to drift further from `loc`).
    pub match_distance: i32,

    /// The number of bits in a [`usize`] the Bitap alphabet is allowed to
    /// use; patterns longer than this are rejected.
    pub match_max_bits: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            diff_timeout: Duration::from_secs(1),
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
        }
    }
}

impl DiffConfig {
    /// An unlimited-time configuration. Disables the half-match speedup
    /// (see [`crate::half_match`]) so the returned diff stays optimal.
    #[must_use]
    pub fn unlimited() -> Self {
        DiffConfig {
            diff_timeout: Duration::ZERO,
            ..DiffConfig::default()
        }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool { self.diff_timeout.is_zero() }
}
