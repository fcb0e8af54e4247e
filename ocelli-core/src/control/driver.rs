//! Control loop driver
//!
//! Each tick:
//! 1. If the IMU has a fresh sample: motion filter, sequence player, frame.
//! 2. Button: advance the motion pattern on a press.
//! 3. Servo scheduler for all channels (regardless of the IMU).

use embedded_hal::delay::DelayNs;

use super::state::ControlLoopState;
use crate::render::FrameOutcome;
use crate::traits::{Clock, EyeRenderer, MotionSensor, ServoBus, TriggerInput};

/// Delay after each tick (ms)
pub const POLL_PERIOD_MS: u32 = 100;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Frame rendered this tick (None when no IMU sample was available)
    pub frame: Option<FrameOutcome>,
    /// Motion pattern advanced by the button
    pub pattern_changed: bool,
    /// Number of servo channels that fired
    pub servos_fired: usize,
}

/// Control loop with its collaborators
pub struct ControlLoop<S, B, R, T> {
    state: ControlLoopState,
    sensor: S,
    bus: B,
    renderer: R,
    trigger: T,
}

impl<S, B, R, T> ControlLoop<S, B, R, T>
where
    S: MotionSensor,
    B: ServoBus,
    R: EyeRenderer,
    T: TriggerInput,
{
    pub fn new(state: ControlLoopState, sensor: S, bus: B, renderer: R, trigger: T) -> Self {
        Self {
            state,
            sensor,
            bus,
            renderer,
            trigger,
        }
    }

    pub fn state(&self) -> &ControlLoopState {
        &self.state
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run one tick at time `now_ms`
    pub fn tick(&mut self, now_ms: u32) -> TickReport {
        let frame = match self.sensor.poll() {
            Ok(Some(sample)) => {
                let state = &mut self.state;
                state.offset = state.filter.update(sample);
                state.player.tick(now_ms);
                Some(state.composer.render(
                    &mut self.renderer,
                    state.player.selected_pattern(),
                    state.offset,
                ))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("IMU read failed: {}", e);
                None
            }
        };

        let pattern_changed = self.trigger.was_pressed();
        if pattern_changed {
            self.state.selector.advance();
        }

        let servos_fired =
            self.state
                .scheduler
                .tick(now_ms, self.state.selector.current(), &mut self.bus);

        TickReport {
            frame,
            pattern_changed,
            servos_fired,
        }
    }

    /// Run forever, pausing [`POLL_PERIOD_MS`] after each tick
    pub fn run<C: Clock, D: DelayNs>(&mut self, clock: &C, delay: &mut D) -> ! {
        info!("Control loop running");
        loop {
            self.tick(clock.now_ms());
            delay.delay_ms(POLL_PERIOD_MS);
        }
    }
}
