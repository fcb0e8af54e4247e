//! Configuration types
//!
//! Board-agnostic configuration structures. The persisted document is read
//! into [`RawConfig`], which resolves to a fully populated [`ControlConfig`]
//! with documented defaults for anything missing or invalid.

pub mod hardware;
pub mod raw;
pub mod types;

pub use hardware::*;
pub use raw::*;
pub use types::*;
