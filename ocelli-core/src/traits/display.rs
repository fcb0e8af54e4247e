//! Eye display trait

/// Errors that can occur with the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Transfer to the panel failed
    Bus,
    /// Sprite slot out of range or never created
    InvalidSprite,
    /// Image data could not be decoded
    Decode,
    /// Not enough memory for the sprite buffer
    OutOfMemory,
}

/// Trait for the off-screen canvas the eye is drawn on
///
/// A frame is `clear`, zero or more `draw_sprite_at`, then `present`.
pub trait EyeRenderer {
    /// Display size in pixels (width, height)
    fn size(&self) -> (u16, u16);

    /// Decode the image at `path` into sprite `slot`
    fn load_sprite(&mut self, slot: u8, path: &str, size: u16) -> Result<(), DisplayError>;

    /// Fill sprite `slot` with a visible "not found" marker
    fn load_placeholder(&mut self, slot: u8, size: u16) -> Result<(), DisplayError>;

    /// Clear the canvas to black
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Blit sprite `slot` with its top-left corner at (x, y)
    ///
    /// Coordinates may be partially off-screen.
    fn draw_sprite_at(&mut self, slot: u8, x: i32, y: i32) -> Result<(), DisplayError>;

    /// Push the canvas to the panel
    fn present(&mut self) -> Result<(), DisplayError>;
}
