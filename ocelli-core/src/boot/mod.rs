//! Bring-up
//!
//! Runs once before the control loop: mounts storage, resolves the
//! configuration, probes servo limits and loads eye sprites. Only an
//! unavailable storage is fatal; everything else degrades to defaults.

pub mod limits;
pub mod sprites;

pub use limits::{probe_channel, probe_channels};
pub use sprites::{load_eye_sprites, SpriteReport};

use crate::config::RawConfig;
use crate::control::ControlLoopState;
use crate::render::{EyeLayout, EYE_SPRITE_SIZE};
use crate::traits::{AssetStorage, Clock, EyeRenderer, ServoBus, StorageError};

/// Fatal bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Asset storage could not be mounted; nothing usable without it
    StorageUnavailable(StorageError),
}

impl From<StorageError> for BootError {
    fn from(e: StorageError) -> Self {
        BootError::StorageUnavailable(e)
    }
}

/// Bring the rig up and build the initial loop state
///
/// Timers in the returned state start at the clock reading taken after
/// everything else is done.
pub fn bring_up<A, B, R, C>(
    storage: &mut A,
    bus: &mut B,
    renderer: &mut R,
    clock: &C,
) -> Result<ControlLoopState, BootError>
where
    A: AssetStorage,
    B: ServoBus,
    R: EyeRenderer,
    C: Clock,
{
    if let Err(e) = storage.mount() {
        error!("Storage mount failed: {}", e);
        return Err(e.into());
    }
    info!("Storage mounted");

    let raw = match storage.load_config() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            warn!("No usable config, using defaults");
            RawConfig::default()
        }
        Err(e) => {
            warn!("Config read failed: {}, using defaults", e);
            RawConfig::default()
        }
    };
    let config = raw.resolve();

    let channels = probe_channels(bus);
    load_eye_sprites(storage, renderer, &config.eye_patterns);

    let (width, height) = renderer.size();
    let layout = EyeLayout::centered(width, height, EYE_SPRITE_SIZE);

    Ok(ControlLoopState::new(config, channels, layout, clock.now_ms()))
}
