//! Button input trait

/// Edge-triggered input used to cycle the motion pattern
pub trait TriggerInput {
    /// Returns true once per press (falling edge since the last call)
    fn was_pressed(&mut self) -> bool;
}
