/// Galaxy2D Window - the render context
///
/// A `Window` pairs a native window with the renderer drawing into it and
/// caches the renderer's preferred texture format. It is created and
/// registered by `Engine::create_window`; at most one exists at a time.

use std::path::Path;
use std::sync::{Arc, Mutex};

use winit::dpi::{LogicalSize, PhysicalSize};

use crate::engine::Engine;
use crate::engine_bail;
use crate::engine_err;
use crate::error::{Error, Result};
use crate::renderer::{
    Backend, Color, NativeWindow, Renderer, Surface, Texture, TextureAccess,
    TextureFormat, WindowDesc,
};

/// Window + renderer pair
///
/// Field order matters: the renderer is dropped before the native window
/// it draws into.
pub struct Window {
    renderer: Box<dyn Renderer>,
    native: Box<dyn NativeWindow>,
    pixel_format: TextureFormat,
}

impl Window {
    /// Build the render context
    ///
    /// Called by `Engine::create_window`, which owns the single-instance rule.
    pub(crate) fn new(backend: &mut dyn Backend, desc: &WindowDesc) -> Result<Self> {
        let mut native = backend.create_window(desc).map_err(|e| engine_err!("galaxy2d::Window",
            InitializationFailed, "Failed to create window '{}': {}", desc.title, e))?;

        let mut renderer = native.create_renderer(desc.renderer_flags).map_err(|e| engine_err!(
            "galaxy2d::Window", InitializationFailed, "Failed to create renderer: {}", e))?;

        let info = renderer.info().map_err(|e| engine_err!("galaxy2d::Window",
            InitializationFailed, "Failed to query renderer info: {}", e))?;

        let Some(&pixel_format) = info.texture_formats.first() else {
            engine_bail!("galaxy2d::Window", InitializationFailed,
                "Renderer '{}' reports no texture formats", info.name);
        };

        let mut window = Self {
            renderer,
            native,
            pixel_format,
        };

        // Render coordinates follow the drawable, not the logical window size
        window.sync_logical_size().map_err(|e| engine_err!("galaxy2d::Window",
            InitializationFailed, "Failed to set logical size: {}", e))?;
        window.fill_opaque(0, 0, 0)
            .map_err(|e| e.relabel(Error::InitializationFailed, "Failed to clear window"))?;

        crate::engine_info!("galaxy2d::Window", "Window '{}' created ({}x{}, renderer '{}', {:?})",
            desc.title, desc.width, desc.height, info.name, pixel_format);

        Ok(window)
    }

    /// The registered window, if any
    ///
    /// Unlike `Engine::window`, a missing window is not an error and is not
    /// logged.
    pub fn instance() -> Option<Arc<Mutex<Window>>> {
        Engine::current_window()
    }

    fn sync_logical_size(&mut self) -> Result<()> {
        let drawable = self.native.drawable_size();
        self.renderer.set_logical_size(drawable.width, drawable.height)
    }

    // ===== GEOMETRY =====

    /// Window size in logical pixels
    pub fn size(&self) -> LogicalSize<u32> {
        self.native.size()
    }

    /// Drawable size in physical pixels
    pub fn drawable_size(&self) -> PhysicalSize<u32> {
        self.native.drawable_size()
    }

    /// Resize the window and follow the new drawable size
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.native
            .set_size(LogicalSize::new(width, height))
            .map_err(|e| engine_err!("galaxy2d::Window", BackendError,
                "Failed to resize window to {}x{}: {}", width, height, e))?;
        self.sync_logical_size().map_err(|e| engine_err!("galaxy2d::Window", BackendError,
            "Failed to set logical size: {}", e))
    }

    /// Switch to fullscreen
    pub fn full_screen(&mut self) -> Result<()> {
        self.native.set_fullscreen(true).map_err(|e| engine_err!("galaxy2d::Window",
            BackendError, "Failed to enter fullscreen: {}", e))?;
        self.sync_logical_size().map_err(|e| engine_err!("galaxy2d::Window", BackendError,
            "Failed to set logical size: {}", e))
    }

    pub fn is_full_screen(&self) -> bool {
        self.native.is_fullscreen()
    }

    // ===== FRAME =====

    /// Clear the drawing surface with a color
    ///
    /// # Errors
    ///
    /// `RenderFailed` if the renderer cannot set the color or clear.
    pub fn fill(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        self.renderer
            .set_draw_color(Color::new(r, g, b, a))
            .and_then(|_| self.renderer.clear())
            .map_err(|e| engine_err!("galaxy2d::Window", RenderFailed, "Failed to clear: {}", e))
    }

    /// Clear the drawing surface with an opaque color
    pub fn fill_opaque(&mut self, r: u8, g: u8, b: u8) -> Result<()> {
        self.fill(r, g, b, 255)
    }

    /// Present everything drawn since the last call
    pub fn render(&mut self) {
        self.renderer.present();
    }

    /// Draw a texture with its top-left corner at (x, y)
    pub fn draw(&mut self, texture: &Texture, x: i32, y: i32) -> Result<()> {
        texture.draw(self.renderer.as_mut(), x, y)
    }

    // ===== DECORATION =====

    pub fn set_title(&mut self, title: &str) {
        self.native.set_title(title);
    }

    pub fn title(&self) -> &str {
        self.native.title()
    }

    pub fn set_icon(&mut self, icon: &Surface) -> Result<()> {
        self.native.set_icon(icon).map_err(|e| engine_err!("galaxy2d::Window",
            BackendError, "Failed to set window icon: {}", e))
    }

    // ===== TEXTURES =====

    /// Create an uninitialized texture in the window's pixel format
    pub fn create_texture(&mut self, access: TextureAccess, width: u32, height: u32) -> Result<Texture> {
        Texture::new(self.renderer.as_mut(), self.pixel_format, access, width, height)
    }

    /// Create a texture from a surface, taking ownership of it
    pub fn create_texture_from_surface(&mut self, access: TextureAccess, surface: Surface) -> Result<Texture> {
        Texture::from_surface(self.renderer.as_mut(), access, surface)
    }

    /// Create a texture from a copy of a surface
    pub fn create_texture_from_surface_ref(&mut self, access: TextureAccess, surface: &Surface) -> Result<Texture> {
        Texture::from_surface_ref(self.renderer.as_mut(), access, surface)
    }

    /// Load an image file into a texture
    pub fn load_texture<P: AsRef<Path>>(&mut self, access: TextureAccess, path: P) -> Result<Texture> {
        Texture::from_file(self.renderer.as_mut(), access, path)
    }

    // ===== NATIVE ACCESS =====

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    pub fn native_window(&self) -> &dyn NativeWindow {
        self.native.as_ref()
    }

    /// Preferred texture format (first format reported by the renderer)
    pub fn pixel_format(&self) -> TextureFormat {
        self.pixel_format
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        crate::engine_debug!("galaxy2d::Window", "Window '{}' destroyed", self.native.title());
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
