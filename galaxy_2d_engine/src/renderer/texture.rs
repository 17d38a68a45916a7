/// Shared texture handle with per-handle render state
///
/// A `Texture` is a cheap handle to a native texture. Cloning shares the
/// native resource and copies the render state (rotation, scale, flip, clip,
/// modulation) by value, so every clone can be drawn differently. The native
/// resource, and the source surface kept for streaming textures, are
/// released when the last handle is dropped.

use std::path::Path;
use std::sync::Arc;

use crate::engine_bail;
use crate::engine_err;
use crate::error::{Error, Result};
use crate::renderer::{
    CopyParams, Flip, Rect2D, Renderer, RendererTexture, ScaleMode, Surface,
    TextureAccess, TextureDesc, TextureFormat, TextureInfo, TextureLock,
};

/// Native texture plus the surface it was streamed from
///
/// Owned jointly by every handle cloned from the same construction.
struct SharedTexture {
    render_texture: Arc<dyn RendererTexture>,
    source_surface: Option<Surface>,
}

/// Reference-counted drawable texture
#[derive(Clone)]
pub struct Texture {
    inner: Option<Arc<SharedTexture>>,
    rotation: f64,
    hscale: f32,
    vscale: f32,
    smooth_scaling: bool,
    flip: Flip,
    clip: Rect2D,
    mod_r: u8,
    mod_g: u8,
    mod_b: u8,
    alpha: u8,
}

impl Default for Texture {
    /// Empty handle: draws nothing, owns nothing
    fn default() -> Self {
        Self {
            inner: None,
            rotation: 0.0,
            hscale: 1.0,
            vscale: 1.0,
            smooth_scaling: false,
            flip: Flip::empty(),
            clip: Rect2D::default(),
            mod_r: 255,
            mod_g: 255,
            mod_b: 255,
            alpha: 255,
        }
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("info", &self.info())
            .field("use_count", &self.use_count())
            .field("rotation", &self.rotation)
            .field("hscale", &self.hscale)
            .field("vscale", &self.vscale)
            .field("flip", &self.flip)
            .field("clip", &self.clip)
            .finish()
    }
}

impl Texture {
    // ===== CONSTRUCTION =====

    /// Create an uninitialized texture
    ///
    /// # Errors
    ///
    /// `ResourceCreationFailed` if the driver cannot allocate the texture.
    pub fn new(
        renderer: &mut dyn Renderer,
        format: TextureFormat,
        access: TextureAccess,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let render_texture = Self::create_render_texture(renderer, format, access, width, height)?;
        Ok(Self::from_shared(SharedTexture {
            render_texture,
            source_surface: None,
        }))
    }

    fn create_render_texture(
        renderer: &mut dyn Renderer,
        format: TextureFormat,
        access: TextureAccess,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn RendererTexture>> {
        renderer
            .create_texture(TextureDesc { width, height, format, access })
            .map_err(|e| engine_err!("galaxy2d::Texture", ResourceCreationFailed,
                "Failed to create {}x{} {:?} texture: {}", width, height, format, e))
    }

    /// Load an image file into a texture
    ///
    /// # Errors
    ///
    /// `AssetLoadFailed` if the file cannot be read or decoded,
    /// `ResourceCreationFailed` if the texture cannot be created.
    pub fn from_file<P: AsRef<Path>>(
        renderer: &mut dyn Renderer,
        access: TextureAccess,
        path: P,
    ) -> Result<Self> {
        let surface = Surface::load(path)?;
        Self::from_surface(renderer, access, surface)
    }

    /// Create a texture from a surface, taking ownership of it
    ///
    /// `access` must be `Static` or `Streaming`. A streaming texture keeps
    /// the surface (see `source_surface`); a static texture drops it once
    /// the pixels are uploaded.
    pub fn from_surface(
        renderer: &mut dyn Renderer,
        access: TextureAccess,
        surface: Surface,
    ) -> Result<Self> {
        if access == TextureAccess::Target {
            engine_bail!("galaxy2d::Texture", InvalidOperation,
                "Textures built from a surface must be static or streaming");
        }

        let info = renderer.info().map_err(|e| engine_err!("galaxy2d::Texture",
            ResourceCreationFailed, "Failed to query renderer formats: {}", e))?;
        let format = if info.supports(surface.format()) {
            surface.format()
        } else {
            match info.texture_formats.first() {
                Some(&format) => format,
                None => engine_bail!("galaxy2d::Texture", ResourceCreationFailed,
                    "Renderer reports no texture formats"),
            }
        };

        // Dropped on any upload error below, so a failed construction leaks nothing
        let render_texture = Self::create_render_texture(
            renderer, format, access, surface.width(), surface.height())?;

        match access {
            TextureAccess::Streaming => {
                let mut lock = TextureLock::from_render_texture(render_texture.as_ref())
                    .map_err(|e| e.relabel(Error::ResourceCreationFailed, "Failed to upload streaming texture"))?;
                lock.stream_surface(&surface)
                    .map_err(|e| e.relabel(Error::ResourceCreationFailed, "Failed to upload streaming texture"))?;
            }
            _ => {
                let converted;
                let upload = if surface.format() == format {
                    &surface
                } else {
                    converted = surface.convert(format)?;
                    &converted
                };
                render_texture
                    .update(None, upload.pixels(), upload.pitch())
                    .map_err(|e| engine_err!("galaxy2d::Texture", ResourceCreationFailed,
                        "Failed to upload static texture: {}", e))?;
            }
        }

        let source_surface = (access == TextureAccess::Streaming).then_some(surface);
        Ok(Self::from_shared(SharedTexture {
            render_texture,
            source_surface,
        }))
    }

    /// Create a texture from a copy of a surface
    pub fn from_surface_ref(
        renderer: &mut dyn Renderer,
        access: TextureAccess,
        surface: &Surface,
    ) -> Result<Self> {
        Self::from_surface(renderer, access, surface.clone())
    }

    fn from_shared(shared: SharedTexture) -> Self {
        let info = *shared.render_texture.info();
        crate::engine_debug!("galaxy2d::Texture", "Created {}x{} {:?} texture ({:?})",
            info.width, info.height, info.format, info.access);
        Self {
            inner: Some(Arc::new(shared)),
            clip: info.bounds(),
            ..Self::default()
        }
    }

    // ===== DRAWING =====

    /// Draw the clipped texture with its top-left corner at (x, y)
    ///
    /// Rotation, scale, flip, filtering and modulation of this handle are
    /// passed to the renderer with the copy. Drawing an empty handle does
    /// nothing.
    ///
    /// # Errors
    ///
    /// `RenderFailed` if the renderer rejects the copy.
    pub fn draw(&self, renderer: &mut dyn Renderer, x: i32, y: i32) -> Result<()> {
        let Some(shared) = &self.inner else {
            return Ok(());
        };

        let params = self.copy_params(x, y);
        renderer
            .copy_texture(shared.render_texture.as_ref(), &params)
            .map_err(|e| engine_err!("galaxy2d::Texture", RenderFailed, "Failed to draw texture: {}", e))
    }

    /// Copy parameters a draw at (x, y) would use
    pub fn copy_params(&self, x: i32, y: i32) -> CopyParams {
        CopyParams {
            src: self.clip,
            dst: Rect2D::new(
                x,
                y,
                (self.clip.width as f32 * self.hscale) as u32,
                (self.clip.height as f32 * self.vscale) as u32,
            ),
            angle: self.rotation,
            flip: self.flip,
            color_mod: [self.mod_r, self.mod_g, self.mod_b],
            alpha_mod: self.alpha,
            scale_mode: if self.smooth_scaling { ScaleMode::Linear } else { ScaleMode::Nearest },
        }
    }

    // ===== PIXELS =====

    /// Replace the pixels of a streaming texture
    ///
    /// # Errors
    ///
    /// `InvalidOperation` for an empty handle or a static / target texture,
    /// `LockFailed` if the lock cannot be taken.
    pub fn update_pixels(&self, surface: &Surface) -> Result<()> {
        let Some(info) = self.info() else {
            engine_bail!("galaxy2d::Texture", InvalidOperation, "Cannot update an empty texture");
        };
        if info.access != TextureAccess::Streaming {
            engine_bail!("galaxy2d::Texture", InvalidOperation,
                "Cannot update pixels of a {:?} texture", info.access);
        }

        let mut lock = TextureLock::new(self)?;
        lock.stream_surface(surface)
    }

    /// Surface kept for a streaming texture built from a surface
    pub fn source_surface(&self) -> Option<&Surface> {
        self.inner.as_ref().and_then(|shared| shared.source_surface.as_ref())
    }

    // ===== NATIVE RESOURCE =====

    /// The native texture, `None` for an empty handle
    ///
    /// Only borrowed: the native resource is owned by the handles alone.
    pub fn render_texture(&self) -> Option<&dyn RendererTexture> {
        self.inner.as_ref().map(|shared| shared.render_texture.as_ref())
    }

    /// Properties of the native texture
    pub fn info(&self) -> Option<TextureInfo> {
        self.inner.as_ref().map(|shared| *shared.render_texture.info())
    }

    /// True if the handle owns no texture
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of handles sharing the native texture (0 when empty)
    pub fn use_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Arc::strong_count)
    }

    /// True if both handles share the same native texture
    pub fn shares_with(&self, other: &Texture) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn width(&self) -> u32 {
        self.info().map_or(0, |info| info.width)
    }

    pub fn height(&self) -> u32 {
        self.info().map_or(0, |info| info.height)
    }

    /// Full extent of the texture
    pub fn dimensions(&self) -> Rect2D {
        Rect2D::new(0, 0, self.width(), self.height())
    }

    /// Pixel format, fixed at creation (`Unknown` when empty)
    pub fn format(&self) -> TextureFormat {
        self.info().map_or(TextureFormat::Unknown, |info| info.format)
    }

    /// Access mode, `None` when empty
    pub fn access(&self) -> Option<TextureAccess> {
        self.info().map(|info| info.access)
    }

    // ===== RENDER STATE =====

    /// Clockwise rotation in degrees
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
    }

    pub fn hscale(&self) -> f32 {
        self.hscale
    }

    pub fn vscale(&self) -> f32 {
        self.vscale
    }

    pub fn set_hscale(&mut self, factor: f32) {
        self.hscale = factor;
    }

    pub fn set_vscale(&mut self, factor: f32) {
        self.vscale = factor;
    }

    pub fn set_scale(&mut self, hfactor: f32, vfactor: f32) {
        self.hscale = hfactor;
        self.vscale = vfactor;
    }

    /// Whether scaled draws use bilinear filtering
    pub fn smooth_scaling(&self) -> bool {
        self.smooth_scaling
    }

    pub fn set_smooth_scaling(&mut self, use_smooth: bool) {
        self.smooth_scaling = use_smooth;
    }

    /// Horizontal mirroring
    pub fn flipped(&self) -> bool {
        self.flip.contains(Flip::HORIZONTAL)
    }

    pub fn set_flip(&mut self, flip: bool) {
        self.flip.set(Flip::HORIZONTAL, flip);
    }

    /// Vertical mirroring
    pub fn flopped(&self) -> bool {
        self.flip.contains(Flip::VERTICAL)
    }

    pub fn set_flop(&mut self, flop: bool) {
        self.flip.set(Flip::VERTICAL, flop);
    }

    /// Region of the texture sampled by `draw`
    pub fn clip(&self) -> Rect2D {
        self.clip
    }

    /// Only draw `rect` of the texture
    ///
    /// The rectangle is not clamped to the texture; parts outside of it are
    /// left to the driver.
    pub fn set_clip(&mut self, rect: Rect2D) {
        if let Some(info) = self.info() {
            let bounds = info.bounds();
            let right = rect.x as i64 + rect.width as i64;
            let bottom = rect.y as i64 + rect.height as i64;
            if rect.x < 0 || rect.y < 0 || right > bounds.width as i64 || bottom > bounds.height as i64 {
                crate::engine_debug!("galaxy2d::Texture",
                    "Clip {:?} extends outside the {}x{} texture", rect, bounds.width, bounds.height);
            }
        }
        self.clip = rect;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn set_color_mod(&mut self, r: u8, g: u8, b: u8) {
        self.mod_r = r;
        self.mod_g = g;
        self.mod_b = b;
    }

    pub fn red_mod(&self) -> u8 {
        self.mod_r
    }

    pub fn green_mod(&self) -> u8 {
        self.mod_g
    }

    pub fn blue_mod(&self) -> u8 {
        self.mod_b
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
