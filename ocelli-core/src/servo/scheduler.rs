//! Servo scheduler
//!
//! Every tick, each channel whose interval has elapsed since its last update
//! takes the offset for its current phase from the active pattern, flips
//! phase, clamps `center + offset` into its limits and is sent to that
//! position. Channels never wait for each other.

use heapless::Vec;

use crate::config::{ChannelTable, PatternTable, CHANNEL_COUNT};
use crate::traits::ServoBus;

/// Transition parameter sent with every position command
pub const TRANSITION_TIME: u16 = 400;

/// Acceleration ramp parameter sent with every position command
pub const ACCEL_RAMP: u8 = 0;

/// Which of a channel's two setpoints is used next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// First setpoint (`[0]`)
    #[default]
    Up,
    /// Second setpoint (`[1]`)
    Down,
}

impl Phase {
    /// Index into a channel's setpoint pair
    pub const fn index(self) -> usize {
        match self {
            Phase::Up => 0,
            Phase::Down => 1,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Phase::Up => Phase::Down,
            Phase::Down => Phase::Up,
        }
    }
}

/// Mutable per-channel timing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoChannelState {
    /// Time of the last firing (ms)
    pub last_update_ms: u32,
    /// Setpoint for the next firing
    pub phase: Phase,
}

/// Position command for one servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionCommand {
    /// Bus id (channel index + 1)
    pub id: u8,
    /// Target position in servo units
    pub position: i32,
    /// Move time in ms, always [`TRANSITION_TIME`]
    pub transition: u16,
    /// Acceleration ramp, always [`ACCEL_RAMP`] (none)
    pub accel: u8,
}

/// Per-channel independent-interval oscillator
#[derive(Debug, Clone)]
pub struct ServoScheduler {
    channels: ChannelTable,
    intervals_ms: [u32; CHANNEL_COUNT],
    patterns: PatternTable,
    state: [ServoChannelState; CHANNEL_COUNT],
}

impl ServoScheduler {
    /// Create a scheduler whose intervals start counting at `start_ms`
    pub fn new(
        channels: ChannelTable,
        intervals_ms: [u32; CHANNEL_COUNT],
        patterns: PatternTable,
        start_ms: u32,
    ) -> Self {
        Self {
            channels,
            intervals_ms,
            patterns,
            state: [ServoChannelState {
                last_update_ms: start_ms,
                phase: Phase::Up,
            }; CHANNEL_COUNT],
        }
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    /// Timing state of channel `index`
    pub fn channel_state(&self, index: usize) -> Option<&ServoChannelState> {
        self.state.get(index)
    }

    /// Compute commands for every channel that is due at `now_ms`
    ///
    /// Advances the state of the channels that fired.
    pub fn poll(&mut self, now_ms: u32, pattern: usize) -> Vec<PositionCommand, CHANNEL_COUNT> {
        let mut commands = Vec::new();

        for (i, state) in self.state.iter_mut().enumerate() {
            if now_ms.wrapping_sub(state.last_update_ms) < self.intervals_ms[i] {
                continue;
            }

            let offset = self.patterns.setpoints(pattern, i)[state.phase.index()];
            state.phase = state.phase.flipped();
            state.last_update_ms = now_ms;

            // One slot per channel, cannot overflow
            let _ = commands.push(PositionCommand {
                id: i as u8 + 1,
                position: self.channels[i].target(offset),
                transition: TRANSITION_TIME,
                accel: ACCEL_RAMP,
            });
        }

        commands
    }

    /// Fire due channels on the bus
    ///
    /// Write failures are logged and dropped; the channel still counts as
    /// fired. Returns the number of commands issued.
    pub fn tick<B: ServoBus>(&mut self, now_ms: u32, pattern: usize, bus: &mut B) -> usize {
        let commands = self.poll(now_ms, pattern);
        for cmd in &commands {
            debug!("Servo {} -> {}", cmd.id, cmd.position);
            if let Err(e) = bus.write_position(cmd.id, cmd.position, cmd.transition, cmd.accel) {
                warn!("Servo {} write failed: {}", cmd.id, e);
            }
        }
        commands.len()
    }
}
