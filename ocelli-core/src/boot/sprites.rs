//! Eye sprite loading

use crate::config::EyePatterns;
use crate::render::EYE_SPRITE_SIZE;
use crate::traits::{AssetStorage, EyeRenderer};

/// Result of loading the configured eye sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpriteReport {
    /// Sprites decoded from storage
    pub loaded: usize,
    /// Slots filled with the placeholder marker
    pub placeholders: usize,
}

/// Load every configured sprite into its slot
///
/// Missing or undecodable images get a placeholder so slot indices stay
/// aligned with the configuration.
pub fn load_eye_sprites<A, R>(storage: &A, renderer: &mut R, patterns: &EyePatterns) -> SpriteReport
where
    A: AssetStorage,
    R: EyeRenderer,
{
    let mut report = SpriteReport::default();

    for (slot, pattern) in patterns.iter().enumerate() {
        let slot = slot as u8;
        let path = pattern.path.as_str();

        if !path.is_empty() && storage.exists(path) {
            match renderer.load_sprite(slot, path, EYE_SPRITE_SIZE) {
                Ok(()) => {
                    report.loaded += 1;
                    continue;
                }
                Err(e) => warn!("Eye sprite {} ({}) failed to load: {}", slot, path, e),
            }
        } else {
            warn!("Eye sprite {} not found: {}", slot, path);
        }

        if let Err(e) = renderer.load_placeholder(slot, EYE_SPRITE_SIZE) {
            warn!("Placeholder for eye sprite {} failed: {}", slot, e);
        }
        report.placeholders += 1;
    }

    info!(
        "Eye sprites: {} loaded, {} placeholders",
        report.loaded, report.placeholders
    );
    report
}
