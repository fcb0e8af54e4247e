//! Servo oscillation
//!
//! Each channel swings between two setpoints around its center, on its own
//! interval. The active motion pattern picks the setpoints.

pub mod pattern;
pub mod scheduler;

pub use pattern::PatternSelector;
pub use scheduler::{
    Phase, PositionCommand, ServoChannelState, ServoScheduler, ACCEL_RAMP, TRANSITION_TIME,
};
