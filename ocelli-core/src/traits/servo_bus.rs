//! Serial servo bus trait
//!
//! Abstracts the half-duplex bus that carries ping, register read and
//! position write commands to the smart servos.

/// Errors that can occur on the servo bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    /// No status packet received in time
    Timeout,
    /// Status packet checksum mismatch
    Checksum,
    /// Servo reported an error flag in its status packet
    Status(u8),
}

/// Trait for a bus of position-controlled servos
///
/// Servos are addressed by their bus id (1-based).
pub trait ServoBus {
    /// Check that a servo answers on the bus
    fn ping(&mut self, id: u8) -> Result<(), ServoError>;

    /// Read the configured minimum position limit register
    fn read_min_limit(&mut self, id: u8) -> Result<u16, ServoError>;

    /// Read the configured maximum position limit register
    fn read_max_limit(&mut self, id: u8) -> Result<u16, ServoError>;

    /// Command a servo to move to `position`
    ///
    /// - `transition`: speed / transition time parameter passed to the servo
    /// - `accel`: acceleration ramp parameter (0 = servo default)
    fn write_position(
        &mut self,
        id: u8,
        position: i32,
        transition: u16,
        accel: u8,
    ) -> Result<(), ServoError>;
}
