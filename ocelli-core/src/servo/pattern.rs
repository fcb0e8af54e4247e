//! Motion pattern selection

use crate::config::PATTERN_COUNT;

/// Currently selected motion pattern (0..[`PATTERN_COUNT`])
///
/// Changed only by the button; the scheduler reads it when a channel fires,
/// so a change reaches each channel at that channel's next firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternSelector {
    current: usize,
}

impl PatternSelector {
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Cycle to the next pattern, wrapping after the last
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % PATTERN_COUNT;
        info!("Pattern changed to {}", self.current);
        self.current
    }
}
