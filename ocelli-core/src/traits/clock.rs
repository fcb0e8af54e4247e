//! Monotonic time source

/// Monotonic millisecond clock
///
/// The counter is allowed to wrap; consumers compare instants with
/// wrapping subtraction.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (usually power-on)
    fn now_ms(&self) -> u32;
}
