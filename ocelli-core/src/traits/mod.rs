//! Hardware abstraction traits
//!
//! These traits define the interface between the control loop and the
//! board-specific collaborators (servo bus, IMU, display, storage, button).

pub mod clock;
pub mod display;
pub mod input;
pub mod sensor;
pub mod servo_bus;
pub mod storage;

pub use clock::Clock;
pub use display::{DisplayError, EyeRenderer};
pub use input::TriggerInput;
pub use sensor::{AccelSample, MotionSensor, SensorError};
pub use servo_bus::{ServoBus, ServoError};
pub use storage::{AssetStorage, StorageError};
