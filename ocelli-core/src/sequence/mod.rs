//! Eye sequence playback
//!
//! Steps through the configured eye sequence on a timer and reports which
//! eye pattern should be shown.

pub mod player;

pub use player::{SequencePlayer, SequenceState};
