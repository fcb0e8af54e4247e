//! Motion filter
//!
//! The eye follows changes in acceleration, not acceleration itself: each
//! sample contributes its delta from the previous sample, the last
//! [`AVG_COUNT`] deltas are averaged, small averages are ignored (deadband)
//! and the result is scaled into display units and clamped.

use crate::config::FilterConfig;
use crate::traits::AccelSample;

/// Number of deltas in the moving average
pub const AVG_COUNT: usize = 3;

/// Offset bound in display units (per axis)
pub const MAX_OFFSET: f32 = 50.0;

/// Eye displacement in display units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeOffset {
    pub x: f32,
    pub y: f32,
}

impl EyeOffset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

/// Circular buffer of the last [`AVG_COUNT`] deltas per axis
///
/// Starts zero-filled, so the first averages are damped.
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    x: [f32; AVG_COUNT],
    y: [f32; AVG_COUNT],
    next: usize,
}

impl SampleHistory {
    /// Overwrite the oldest slot
    pub fn push(&mut self, dx: f32, dy: f32) {
        self.x[self.next] = dx;
        self.y[self.next] = dy;
        self.next = (self.next + 1) % AVG_COUNT;
    }

    /// Arithmetic mean of the buffered deltas (x, y)
    pub fn mean(&self) -> (f32, f32) {
        let sx: f32 = self.x.iter().sum();
        let sy: f32 = self.y.iter().sum();
        (sx / AVG_COUNT as f32, sy / AVG_COUNT as f32)
    }
}

/// Accelerometer delta smoother
#[derive(Debug, Clone)]
pub struct MotionFilter {
    config: FilterConfig,
    previous: AccelSample,
    history: SampleHistory,
}

impl MotionFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            previous: AccelSample::default(),
            history: SampleHistory::default(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Feed one sample and get the current eye offset
    ///
    /// The z axis is stored but does not contribute.
    pub fn update(&mut self, sample: AccelSample) -> EyeOffset {
        self.history
            .push(sample.x - self.previous.x, sample.y - self.previous.y);
        let (avg_x, avg_y) = self.history.mean();

        let offset = EyeOffset {
            x: self.shape(avg_x),
            y: self.shape(avg_y),
        };

        self.previous = sample;
        offset
    }

    /// Deadband, scale and clamp one axis
    fn shape(&self, avg: f32) -> f32 {
        // NaN fails the comparison and lands in the deadband
        let scaled = if libm::fabsf(avg) > self.config.threshold {
            avg * self.config.scale_factor
        } else {
            0.0
        };
        scaled.clamp(-MAX_OFFSET, MAX_OFFSET)
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}
