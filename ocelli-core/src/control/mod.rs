//! Control loop
//!
//! Single-threaded cooperative loop: one tick runs to completion before the
//! next starts, and all mutable state is owned here.

pub mod driver;
pub mod state;

pub use driver::{ControlLoop, TickReport, POLL_PERIOD_MS};
pub use state::ControlLoopState;
