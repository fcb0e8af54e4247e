//! Frame composer

use crate::filter::EyeOffset;
use crate::traits::EyeRenderer;

/// Eye sprites are square, this many pixels per side
pub const EYE_SPRITE_SIZE: u16 = 80;

/// Resting position of the eye sprite's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeLayout {
    pub base_x: i32,
    pub base_y: i32,
}

impl EyeLayout {
    /// Center a sprite of `sprite_size` on a `width` x `height` display
    pub fn centered(width: u16, height: u16, sprite_size: u16) -> Self {
        let half_sprite = i32::from(sprite_size) / 2;
        Self {
            base_x: i32::from(width) / 2 - half_sprite,
            base_y: i32::from(height) / 2 - half_sprite,
        }
    }
}

/// Where to put which sprite this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawInstruction {
    pub pattern: u8,
    pub x: i32,
    pub y: i32,
}

/// What a composed frame contained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Sprite drawn
    Drawn(DrawInstruction),
    /// Frame presented without a sprite (no selection, or selection not loaded)
    Blank,
}

/// Combines the selected eye pattern and the motion offset into a frame
#[derive(Debug, Clone, Copy)]
pub struct FrameComposer {
    layout: EyeLayout,
    pattern_count: usize,
}

impl FrameComposer {
    /// `pattern_count` is the number of loaded eye sprites
    pub fn new(layout: EyeLayout, pattern_count: usize) -> Self {
        Self {
            layout,
            pattern_count,
        }
    }

    pub fn layout(&self) -> EyeLayout {
        self.layout
    }

    /// Decide the draw for this frame, if any
    ///
    /// A selection beyond the loaded sprites yields no draw.
    pub fn plan(&self, selected: Option<u8>, offset: EyeOffset) -> Option<DrawInstruction> {
        let pattern = selected?;
        if usize::from(pattern) >= self.pattern_count {
            return None;
        }
        Some(DrawInstruction {
            pattern,
            x: self.layout.base_x + libm::roundf(offset.x) as i32,
            y: self.layout.base_y + libm::roundf(offset.y) as i32,
        })
    }

    /// Render one full frame: clear, optional sprite, present
    ///
    /// Display errors are logged and the rest of the frame still runs.
    pub fn render<R: EyeRenderer>(
        &self,
        renderer: &mut R,
        selected: Option<u8>,
        offset: EyeOffset,
    ) -> FrameOutcome {
        if let Err(e) = renderer.clear() {
            warn!("Canvas clear failed: {}", e);
        }

        let outcome = match self.plan(selected, offset) {
            Some(draw) => {
                if let Err(e) = renderer.draw_sprite_at(draw.pattern, draw.x, draw.y) {
                    warn!("Eye sprite {} draw failed: {}", draw.pattern, e);
                }
                FrameOutcome::Drawn(draw)
            }
            None => FrameOutcome::Blank,
        };

        if let Err(e) = renderer.present() {
            warn!("Canvas present failed: {}", e);
        }

        outcome
    }
}
