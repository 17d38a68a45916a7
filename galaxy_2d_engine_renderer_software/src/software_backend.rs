/// SoftwareBackend - window factory of the software driver

use std::sync::Arc;

use winit::dpi::LogicalSize;
use galaxy_2d_engine::galaxy2d::render::{
    Backend, NativeWindow, TextureFormat, WindowDesc, WindowFlags,
};
use galaxy_2d_engine::galaxy2d::{Error, Result};
use galaxy_2d_engine::engine_info;

use crate::software_stats::{RendererStats, StatsTracker};
use crate::software_window::SoftwareWindow;

/// Software driver configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareConfig {
    /// Display content scale (drawable pixels per logical pixel)
    pub scale_factor: f64,

    /// Texture formats reported by renderers, preferred first
    pub texture_formats: Vec<TextureFormat>,

    /// Largest texture width or height (0 = unlimited)
    pub max_texture_size: u32,

    /// Logical size of the display, used by fullscreen windows
    pub display_size: LogicalSize<u32>,
}

impl Default for SoftwareConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            texture_formats: vec![
                TextureFormat::R8G8B8A8_UNORM,
                TextureFormat::B8G8R8A8_UNORM,
                TextureFormat::A8R8G8B8_UNORM,
                TextureFormat::A8B8G8R8_UNORM,
                TextureFormat::R8G8B8_UNORM,
                TextureFormat::B8G8R8_UNORM,
            ],
            max_texture_size: 8192,
            display_size: LogicalSize::new(1920, 1080),
        }
    }
}

/// Software driver entry point
///
/// # Example
///
/// ```no_run
/// use galaxy_2d_engine::galaxy2d::{Engine, render::WindowDesc};
/// use galaxy_2d_engine_renderer_software::{SoftwareBackend, SoftwareConfig, print_stats_report};
///
/// Engine::initialize()?;
/// let mut backend = SoftwareBackend::new(SoftwareConfig { scale_factor: 2.0, ..Default::default() });
/// let window = Engine::create_window(&mut backend, &WindowDesc::default())?;
/// window.lock().unwrap().render();
/// print_stats_report(&backend.stats());
/// # Ok::<(), galaxy_2d_engine::galaxy2d::Error>(())
/// ```
pub struct SoftwareBackend {
    config: SoftwareConfig,
    stats: Arc<StatsTracker>,
}

impl SoftwareBackend {
    pub fn new(config: SoftwareConfig) -> Self {
        Self {
            config,
            stats: Arc::new(StatsTracker::default()),
        }
    }

    pub fn config(&self) -> &SoftwareConfig {
        &self.config
    }

    /// Counters of every window, renderer and texture created by this backend
    pub fn stats(&self) -> RendererStats {
        self.stats.get_stats()
    }
}

impl Backend for SoftwareBackend {
    fn create_window(&mut self, desc: &WindowDesc) -> Result<Box<dyn NativeWindow>> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::BackendError(format!(
                "Window size {}x{} is empty", desc.width, desc.height
            )));
        }
        if !(self.config.scale_factor.is_normal() && self.config.scale_factor > 0.0) {
            return Err(Error::BackendError(format!(
                "Invalid scale factor {}", self.config.scale_factor
            )));
        }

        let mut window = SoftwareWindow::new(desc, self.config.clone(), self.stats.clone());
        if desc.window_flags.contains(WindowFlags::FULLSCREEN) {
            window.set_fullscreen(true)?;
        }

        engine_info!("galaxy2d::software::Window", "Window '{}' created ({}x{} at scale {})",
            desc.title, desc.width, desc.height, self.config.scale_factor);
        Ok(Box::new(window))
    }
}

#[cfg(test)]
#[path = "software_backend_tests.rs"]
mod tests;
