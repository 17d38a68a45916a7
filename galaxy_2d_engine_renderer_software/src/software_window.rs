/// SoftwareWindow - off-screen implementation of NativeWindow

use std::sync::Arc;

use winit::dpi::{LogicalSize, PhysicalSize};
use galaxy_2d_engine::galaxy2d::render::{
    NativeWindow, Renderer, RendererFlags, Surface, WindowDesc, WindowFlags,
};
use galaxy_2d_engine::galaxy2d::{Error, Result};
use galaxy_2d_engine::engine_debug;

use crate::software_backend::SoftwareConfig;
use crate::software_renderer::SoftwareRenderer;
use crate::software_stats::StatsTracker;

/// Off-screen window
pub struct SoftwareWindow {
    title: String,
    flags: WindowFlags,
    size: LogicalSize<u32>,
    /// Size to restore when leaving fullscreen
    windowed_size: LogicalSize<u32>,
    fullscreen: bool,
    icon: Option<Surface>,
    config: SoftwareConfig,
    stats: Arc<StatsTracker>,
}

impl SoftwareWindow {
    pub(crate) fn new(desc: &WindowDesc, config: SoftwareConfig, stats: Arc<StatsTracker>) -> Self {
        let size = LogicalSize::new(desc.width, desc.height);
        Self {
            title: desc.title.clone(),
            flags: desc.window_flags,
            size,
            windowed_size: size,
            fullscreen: false,
            icon: None,
            config,
            stats,
        }
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn icon(&self) -> Option<&Surface> {
        self.icon.as_ref()
    }
}

impl NativeWindow for SoftwareWindow {
    fn create_renderer(&mut self, flags: RendererFlags) -> Result<Box<dyn Renderer>> {
        let renderer = SoftwareRenderer::new(&self.config, flags, self.stats.clone())?;
        Ok(Box::new(renderer))
    }

    fn size(&self) -> LogicalSize<u32> {
        self.size
    }

    fn drawable_size(&self) -> PhysicalSize<u32> {
        self.size.to_physical(self.config.scale_factor)
    }

    fn set_size(&mut self, size: LogicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::BackendError(format!(
                "Window size {}x{} is empty", size.width, size.height
            )));
        }
        if self.fullscreen {
            self.windowed_size = size;
        } else {
            self.size = size;
        }
        engine_debug!("galaxy2d::software::Window", "Window '{}' resized to {}x{}",
            self.title, size.width, size.height);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        if fullscreen == self.fullscreen {
            return Ok(());
        }
        if fullscreen {
            self.windowed_size = self.size;
            self.size = self.config.display_size;
        } else {
            self.size = self.windowed_size;
        }
        self.fullscreen = fullscreen;
        engine_debug!("galaxy2d::software::Window", "Window '{}' fullscreen: {}", self.title, fullscreen);
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
        if icon.width() == 0 || icon.height() == 0 {
            return Err(Error::BackendError("Window icon is empty".to_string()));
        }
        self.icon = Some(icon.clone());
        Ok(())
    }
}
