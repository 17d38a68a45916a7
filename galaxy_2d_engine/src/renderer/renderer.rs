/// Renderer trait - the drawing surface of a window
///
/// A renderer is created from a `NativeWindow` and receives every draw call
/// of the engine. Implemented by backends (e.g., SoftwareRenderer).

use std::sync::Arc;
use bitflags::bitflags;

use crate::error::Result;
use crate::renderer::{RendererTexture, TextureDesc, TextureFormat, Surface};

// ============================================================================
// Common types
// ============================================================================

/// RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// True if the rectangle covers no pixel
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

bitflags! {
    /// Mirroring applied when copying a texture
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flip: u32 {
        /// Mirror around the vertical axis
        const HORIZONTAL = 0x1;
        /// Mirror around the horizontal axis
        const VERTICAL = 0x2;
    }
}

/// Filtering used when a copy is scaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Nearest texel
    #[default]
    Nearest,
    /// Bilinear filtering
    Linear,
}

/// Parameters of a single texture copy
///
/// Everything the driver needs to place, transform and tint the copy;
/// the engine never changes driver-side texture state between draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyParams {
    /// Region of the texture to sample
    pub src: Rect2D,
    /// Destination rectangle in render coordinates (before rotation)
    pub dst: Rect2D,
    /// Clockwise rotation in degrees around the center of `dst`
    pub angle: f64,
    /// Mirroring
    pub flip: Flip,
    /// Color modulation (r, g, b)
    pub color_mod: [u8; 3],
    /// Alpha modulation
    pub alpha_mod: u8,
    /// Filtering
    pub scale_mode: ScaleMode,
}

bitflags! {
    /// Renderer creation flags, passed through to the backend
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RendererFlags: u32 {
        /// Software fallback
        const SOFTWARE = 0x1;
        /// Hardware acceleration
        const ACCELERATED = 0x2;
        /// Present synchronized with the refresh rate
        const PRESENT_VSYNC = 0x4;
        /// Render-target textures are supported
        const TARGET_TEXTURE = 0x8;
    }
}

/// Renderer capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct RendererInfo {
    /// Backend name
    pub name: String,
    /// Flags the renderer was created with
    pub flags: RendererFlags,
    /// Supported texture formats, preferred first
    pub texture_formats: Vec<TextureFormat>,
    /// Maximum texture width (0 = unlimited)
    pub max_texture_width: u32,
    /// Maximum texture height (0 = unlimited)
    pub max_texture_height: u32,
}

impl RendererInfo {
    /// True if `format` is in the supported list
    pub fn supports(&self, format: TextureFormat) -> bool {
        self.texture_formats.contains(&format)
    }
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Drawing surface trait
///
/// Errors are reported as `Error::BackendError`; the engine converts them
/// into the error kind of the calling operation.
pub trait Renderer: Send {
    /// Query the renderer capabilities
    fn info(&self) -> Result<RendererInfo>;

    /// Create a texture
    ///
    /// # Returns
    ///
    /// A shared pointer to the created texture. The native resource is
    /// released when the last pointer is dropped.
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>>;

    /// Copy (part of) a texture onto the drawing surface
    fn copy_texture(&mut self, texture: &dyn RendererTexture, params: &CopyParams) -> Result<()>;

    /// Set the color used by `clear`
    fn set_draw_color(&mut self, color: Color) -> Result<()>;

    /// Fill the whole drawing surface with the draw color
    fn clear(&mut self) -> Result<()>;

    /// Show everything drawn since the last present
    fn present(&mut self);

    /// Set the resolution of render coordinates
    fn set_logical_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Current resolution of render coordinates
    fn logical_size(&self) -> (u32, u32);

    /// Read back the drawing surface
    fn read_pixels(&self) -> Result<Surface>;
}
