/// Mock backend for unit tests (no display required)
///
/// Records every renderer call in a shared `MockLog` so tests can check
/// what the engine asked the driver to do, and counts texture releases.
/// Each failure switch makes the matching primitive report a backend error.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use winit::dpi::{LogicalSize, PhysicalSize};

use crate::error::{Error, Result};
use crate::renderer::{
    Backend, Color, CopyParams, LockedPixels, NativeWindow, Rect2D, Renderer,
    RendererFlags, RendererInfo, RendererTexture, Surface, TextureAccess,
    TextureDesc, TextureFormat, TextureInfo, WindowDesc,
};

// ============================================================================
// Shared call log
// ============================================================================

#[derive(Debug, Default)]
pub struct MockLog {
    pub copies: Vec<CopyParams>,
    pub textures_created: usize,
    pub textures_released: usize,
    pub draw_color: Option<Color>,
    pub clears: usize,
    pub presents: usize,
    pub logical_size: Option<(u32, u32)>,
    pub windows_released: usize,
}

pub type SharedMockLog = Arc<Mutex<MockLog>>;

/// Failure switches and capabilities
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub scale_factor: u32,
    pub texture_formats: Vec<TextureFormat>,
    pub fail_window: bool,
    pub fail_renderer: bool,
    pub fail_info: bool,
    pub fail_create_texture: bool,
    pub fail_copy: bool,
    pub fail_clear: bool,
    pub fail_logical_size: bool,
    pub fail_fullscreen: bool,
    /// Extra bytes at the end of every row of a locked buffer
    pub lock_padding: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1,
            texture_formats: vec![TextureFormat::B8G8R8A8_UNORM, TextureFormat::R8G8B8A8_UNORM],
            fail_window: false,
            fail_renderer: false,
            fail_info: false,
            fail_create_texture: false,
            fail_copy: false,
            fail_clear: false,
            fail_logical_size: false,
            fail_fullscreen: false,
            lock_padding: 0,
        }
    }
}

fn backend_error(what: &str) -> Error {
    Error::BackendError(format!("mock {} failure", what))
}

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    info: TextureInfo,
    pixels: Mutex<Vec<u8>>,
    locked: AtomicBool,
    lock_padding: usize,
    last_unlocked: Mutex<Vec<u8>>,
    log: SharedMockLog,
}

/// Fill value of the row padding handed out by a padded lock
pub const LOCK_PADDING_BYTE: u8 = 0xA5;

impl MockTexture {
    pub fn new(desc: &TextureDesc, log: SharedMockLog) -> Self {
        let len = desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel();
        Self {
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                access: desc.access,
            },
            pixels: Mutex::new(vec![0; len]),
            locked: AtomicBool::new(false),
            lock_padding: 0,
            last_unlocked: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn with_lock_padding(mut self, padding: usize) -> Self {
        self.lock_padding = padding;
        self
    }

    /// Raw buffer, padding included, handed back by the last unlock
    pub fn last_unlocked(&self) -> Vec<u8> {
        self.last_unlocked.lock().unwrap().clone()
    }

    /// Tightly packed copy of the texture content
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.lock().unwrap().clone()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    /// Downcast a native texture created by the mock renderer
    pub fn of(texture: &dyn RendererTexture) -> &MockTexture {
        texture.as_any().downcast_ref::<MockTexture>().unwrap()
    }
}

impl RendererTexture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn lock(&self) -> Result<LockedPixels> {
        if self.info.access != TextureAccess::Streaming {
            return Err(backend_error("lock of non-streaming texture"));
        }
        if self.locked.swap(true, Ordering::SeqCst) {
            return Err(backend_error("nested lock"));
        }
        let row_bytes = self.info.row_bytes();
        let pitch = row_bytes + self.lock_padding;
        let mut data = vec![LOCK_PADDING_BYTE; pitch * self.info.height as usize];
        let pixels = self.pixels();
        for y in 0..self.info.height as usize {
            data[y * pitch..y * pitch + row_bytes]
                .copy_from_slice(&pixels[y * row_bytes..(y + 1) * row_bytes]);
        }
        Ok(LockedPixels::new(data, pitch))
    }

    fn unlock(&self, pixels: LockedPixels) {
        let row_bytes = self.info.row_bytes();
        let pitch = pixels.pitch();
        let data = pixels.into_data();
        {
            let mut storage = self.pixels.lock().unwrap();
            for y in 0..self.info.height as usize {
                storage[y * row_bytes..(y + 1) * row_bytes]
                    .copy_from_slice(&data[y * pitch..y * pitch + row_bytes]);
            }
        }
        *self.last_unlocked.lock().unwrap() = data;
        self.locked.store(false, Ordering::SeqCst);
    }

    fn update(&self, rect: Option<Rect2D>, pixels: &[u8], pitch: usize) -> Result<()> {
        if rect.is_some() {
            return Err(backend_error("partial update"));
        }
        let row_bytes = self.info.row_bytes();
        let mut storage = self.pixels.lock().unwrap();
        for y in 0..self.info.height as usize {
            let src = pixels
                .get(y * pitch..y * pitch + row_bytes)
                .ok_or_else(|| backend_error("short update buffer"))?;
            storage[y * row_bytes..(y + 1) * row_bytes].copy_from_slice(src);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        self.log.lock().unwrap().textures_released += 1;
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

pub struct MockRenderer {
    pub config: MockConfig,
    pub log: SharedMockLog,
    logical_size: (u32, u32),
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            log: Arc::new(Mutex::new(MockLog::default())),
            logical_size: (0, 0),
        }
    }

    fn with_log(config: MockConfig, log: SharedMockLog) -> Self {
        Self {
            config,
            log,
            logical_size: (0, 0),
        }
    }
}

impl Renderer for MockRenderer {
    fn info(&self) -> Result<RendererInfo> {
        if self.config.fail_info {
            return Err(backend_error("info"));
        }
        Ok(RendererInfo {
            name: "mock".to_string(),
            flags: RendererFlags::SOFTWARE,
            texture_formats: self.config.texture_formats.clone(),
            max_texture_width: 0,
            max_texture_height: 0,
        })
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>> {
        if self.config.fail_create_texture {
            return Err(backend_error("texture creation"));
        }
        self.log.lock().unwrap().textures_created += 1;
        Ok(Arc::new(
            MockTexture::new(&desc, self.log.clone()).with_lock_padding(self.config.lock_padding),
        ))
    }

    fn copy_texture(&mut self, _texture: &dyn RendererTexture, params: &CopyParams) -> Result<()> {
        if self.config.fail_copy {
            return Err(backend_error("copy"));
        }
        self.log.lock().unwrap().copies.push(*params);
        Ok(())
    }

    fn set_draw_color(&mut self, color: Color) -> Result<()> {
        self.log.lock().unwrap().draw_color = Some(color);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.config.fail_clear {
            return Err(backend_error("clear"));
        }
        self.log.lock().unwrap().clears += 1;
        Ok(())
    }

    fn present(&mut self) {
        self.log.lock().unwrap().presents += 1;
    }

    fn set_logical_size(&mut self, width: u32, height: u32) -> Result<()> {
        if self.config.fail_logical_size {
            return Err(backend_error("logical size"));
        }
        self.logical_size = (width, height);
        self.log.lock().unwrap().logical_size = Some((width, height));
        Ok(())
    }

    fn logical_size(&self) -> (u32, u32) {
        self.logical_size
    }

    fn read_pixels(&self) -> Result<Surface> {
        let (width, height) = self.logical_size;
        let mut surface = Surface::new(width, height, TextureFormat::R8G8B8A8_UNORM)?;
        if let Some(color) = self.log.lock().unwrap().draw_color {
            surface.fill(color);
        }
        Ok(surface)
    }
}

// ============================================================================
// Mock Window and Backend
// ============================================================================

pub struct MockWindow {
    config: MockConfig,
    log: SharedMockLog,
    title: String,
    size: LogicalSize<u32>,
    fullscreen: bool,
    pub icon: Option<Surface>,
}

impl NativeWindow for MockWindow {
    fn create_renderer(&mut self, _flags: RendererFlags) -> Result<Box<dyn Renderer>> {
        if self.config.fail_renderer {
            return Err(backend_error("renderer creation"));
        }
        Ok(Box::new(MockRenderer::with_log(self.config.clone(), self.log.clone())))
    }

    fn size(&self) -> LogicalSize<u32> {
        self.size
    }

    fn drawable_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            self.size.width * self.config.scale_factor,
            self.size.height * self.config.scale_factor,
        )
    }

    fn set_size(&mut self, size: LogicalSize<u32>) -> Result<()> {
        self.size = size;
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        if self.config.fail_fullscreen {
            return Err(backend_error("fullscreen"));
        }
        self.fullscreen = fullscreen;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_icon(&mut self, icon: &Surface) -> Result<()> {
        self.icon = Some(icon.clone());
        Ok(())
    }
}

impl Drop for MockWindow {
    fn drop(&mut self) {
        self.log.lock().unwrap().windows_released += 1;
    }
}

pub struct MockBackend {
    pub config: MockConfig,
    pub log: SharedMockLog,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }
}

impl Backend for MockBackend {
    fn create_window(&mut self, desc: &WindowDesc) -> Result<Box<dyn NativeWindow>> {
        if self.config.fail_window {
            return Err(backend_error("window creation"));
        }
        Ok(Box::new(MockWindow {
            config: self.config.clone(),
            log: self.log.clone(),
            title: desc.title.clone(),
            size: LogicalSize::new(desc.width, desc.height),
            fullscreen: false,
            icon: None,
        }))
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
