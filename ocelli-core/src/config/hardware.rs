//! Hardware limit types
//!
//! Per-channel position bounds reported by the servos at bring-up.
//!
//! The limit registers and the position command share raw servo units.
//! Clamping relies on that; a bus whose command scale differs from its
//! limit registers needs converting in the bus implementation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::CHANNEL_COUNT;

/// Minimum position used when the servo limit cannot be read
pub const DEFAULT_MIN_POSITION: i32 = 1000;

/// Maximum position used when the servo limit cannot be read
pub const DEFAULT_MAX_POSITION: i32 = 2000;

/// Limits as read from a servo, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServoLimits {
    pub min: i32,
    pub max: i32,
}

/// Position bounds of one servo channel
///
/// Invariant: `min <= center <= max`. Fields are private so every value
/// goes through [`ServoChannelConfig::from_limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "ServoLimits", into = "ServoLimits")
)]
pub struct ServoChannelConfig {
    center: i32,
    min: i32,
    max: i32,
}

impl Default for ServoChannelConfig {
    fn default() -> Self {
        Self::from_limits(DEFAULT_MIN_POSITION, DEFAULT_MAX_POSITION)
    }
}

impl From<ServoLimits> for ServoChannelConfig {
    fn from(limits: ServoLimits) -> Self {
        Self::from_limits(limits.min, limits.max)
    }
}

impl From<ServoChannelConfig> for ServoLimits {
    fn from(config: ServoChannelConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
        }
    }
}

impl ServoChannelConfig {
    /// Build from limits, deriving the center
    ///
    /// An inverted pair (`min > max`) is unusable and yields the defaults.
    pub fn from_limits(min: i32, max: i32) -> Self {
        if min > max {
            warn!("Inverted servo limits {}..{}, using defaults", min, max);
            return Self::from_limits(DEFAULT_MIN_POSITION, DEFAULT_MAX_POSITION);
        }
        Self {
            center: ((i64::from(min) + i64::from(max)) / 2) as i32,
            min,
            max,
        }
    }

    pub fn center(&self) -> i32 {
        self.center
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Clamp `center + offset` into the channel bounds
    ///
    /// Applies the upper bound first, then the lower one, so it cannot panic.
    pub fn target(&self, offset: i32) -> i32 {
        self.center.saturating_add(offset).min(self.max).max(self.min)
    }
}

/// Bounds for all channels, indexed by channel (bus id - 1)
pub type ChannelTable = [ServoChannelConfig; CHANNEL_COUNT];
