//! Sensor filtering
//!
//! Turns raw accelerometer samples into a bounded eye offset.

pub mod motion;

pub use motion::{EyeOffset, MotionFilter, SampleHistory, AVG_COUNT, MAX_OFFSET};
