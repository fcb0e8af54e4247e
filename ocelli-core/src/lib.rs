//! Board-agnostic control loop for the animatronic eye firmware
//!
//! This crate contains the real-time logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (servo bus, IMU, display, storage, button)
//! - Motion filter turning accelerometer deltas into an eye offset
//! - Eye sequence player
//! - Per-channel servo oscillation scheduler
//! - Frame composition
//! - Configuration types with default fallback
//! - Boot-time bring-up of limits and sprites

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod boot;
pub mod config;
pub mod control;
pub mod filter;
pub mod render;
pub mod sequence;
pub mod servo;
pub mod traits;

pub use control::{ControlLoop, ControlLoopState, TickReport};
