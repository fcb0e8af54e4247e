//! Eye rendering
//!
//! Places the selected eye sprite, displaced by the motion offset, into a
//! clear-draw-present frame.

pub mod composer;

pub use composer::{DrawInstruction, EyeLayout, FrameComposer, FrameOutcome, EYE_SPRITE_SIZE};
