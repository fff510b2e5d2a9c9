use thiserror::Error;

/// Error type for the diff, delta and fuzzy-match operations.
///
/// The original algorithm family also defines an `INVALID_INPUT` kind for
/// a `diff`/`match` call with a missing string; `&str` can't be absent in
/// Rust, so that variant has no reachable constructor here and has been
/// dropped (see `DESIGN.md`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The Bitap pattern is longer than `DiffConfig::match_max_bits`.
    #[error("Pattern too long for this application.")]
    PatternTooLong,

    /// `from_delta` encountered a malformed `%XX` escape while decoding an
    /// insertion's text.
    #[error("Illegal escape in diff_fromDelta: {0}")]
    InvalidEscape(String),

    /// `from_delta` encountered a non-numeric or negative operation length.
    #[error("Invalid number in diff_fromDelta: {0}")]
    InvalidLength(String),

    /// `from_delta` encountered an operation character other than `=`, `-`
    /// or `+`.
    #[error("Invalid diff operation in diff_fromDelta: {0}")]
    InvalidOperation(String),

    /// The lengths consumed while decoding a delta did not add up to
    /// `text1`'s length.
    #[error(
        "Delta length ({delta_length}) does not equal source text length ({text1_length})"
    )]
    DeltaLengthMismatch {
        delta_length: usize,
        text1_length: usize,
    },
}
