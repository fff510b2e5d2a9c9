//! The three independent script-normalization passes (§4.7–§4.9): the
//! diff engine composes them, but each is independently useful and
//! independently tested.

pub mod efficiency;
pub mod merge;
pub mod semantic;
