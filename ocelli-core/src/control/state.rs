//! Control loop state

use crate::config::{ChannelTable, ControlConfig};
use crate::filter::{EyeOffset, MotionFilter};
use crate::render::{EyeLayout, FrameComposer};
use crate::sequence::SequencePlayer;
use crate::servo::{PatternSelector, ServoScheduler};

/// Everything the loop mutates between ticks
///
/// Built once at bring-up from the resolved configuration and the probed
/// servo limits; nothing here is reallocated afterwards.
#[derive(Debug, Clone)]
pub struct ControlLoopState {
    /// Accelerometer smoothing
    pub filter: MotionFilter,
    /// Offset from the most recent sample
    pub offset: EyeOffset,
    /// Eye sequence position
    pub player: SequencePlayer,
    /// Frame layout and sprite bounds
    pub composer: FrameComposer,
    /// Per-channel servo timing
    pub scheduler: ServoScheduler,
    /// Active motion pattern
    pub selector: PatternSelector,
}

impl ControlLoopState {
    /// Create the loop state; timers start counting at `start_ms`
    pub fn new(
        config: ControlConfig,
        channels: ChannelTable,
        layout: EyeLayout,
        start_ms: u32,
    ) -> Self {
        let ControlConfig {
            intervals_ms,
            patterns,
            filter,
            eye_patterns,
            sequence,
        } = config;

        Self {
            filter: MotionFilter::new(filter),
            offset: EyeOffset::ZERO,
            player: SequencePlayer::new(sequence, start_ms),
            composer: FrameComposer::new(layout, eye_patterns.len()),
            scheduler: ServoScheduler::new(channels, intervals_ms, patterns, start_ms),
            selector: PatternSelector::new(),
        }
    }
}
