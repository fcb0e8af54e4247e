//! Inertial sensor trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors that can occur reading the IMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Sensor not detected at bring-up
    NotPresent,
}

/// Raw three-axis acceleration reading (in g)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Trait for an accelerometer polled from the control loop
pub trait MotionSensor {
    /// Non-blocking check for a fresh sample
    ///
    /// Returns `Ok(None)` if nothing new has been latched since the last call.
    fn poll(&mut self) -> Result<Option<AccelSample>, SensorError>;
}
