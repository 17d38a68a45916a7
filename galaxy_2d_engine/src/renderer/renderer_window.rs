/// Backend and NativeWindow traits, window descriptor

use bitflags::bitflags;
use winit::dpi::{LogicalSize, PhysicalSize};

use crate::error::Result;
use crate::renderer::{Renderer, RendererFlags, Surface};

bitflags! {
    /// Window creation flags, passed through to the backend
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 0x1;
        const HIDDEN = 0x2;
        const BORDERLESS = 0x4;
        const RESIZABLE = 0x8;
        const MINIMIZED = 0x10;
        const MAXIMIZED = 0x20;
        /// Request a drawable at the display's native pixel density
        const ALLOW_HIGHDPI = 0x40;
    }
}

/// Window position on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPosition {
    /// Centered on the display
    #[default]
    Centered,
    /// Let the platform decide
    Undefined,
    /// Absolute coordinate
    At(i32),
}

/// Window configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDesc {
    /// Title shown in the window decoration
    pub title: String,
    /// Horizontal position
    pub x: WindowPosition,
    /// Vertical position
    pub y: WindowPosition,
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Window flags
    pub window_flags: WindowFlags,
    /// Flags for the renderer created with the window
    pub renderer_flags: RendererFlags,
}

impl Default for WindowDesc {
    fn default() -> Self {
        Self {
            title: "Galaxy2D Application".to_string(),
            x: WindowPosition::Centered,
            y: WindowPosition::Centered,
            width: 800,
            height: 600,
            window_flags: WindowFlags::empty(),
            renderer_flags: RendererFlags::ACCELERATED,
        }
    }
}

/// Window backend factory
///
/// The entry point of a driver: creates native windows.
pub trait Backend {
    /// Create a native window
    fn create_window(&mut self, desc: &WindowDesc) -> Result<Box<dyn NativeWindow>>;
}

/// Native window trait
///
/// Implemented by backend-specific window types (e.g., SoftwareWindow).
/// The native window is destroyed when the value is dropped.
pub trait NativeWindow: Send {
    /// Create the renderer drawing into this window
    fn create_renderer(&mut self, flags: RendererFlags) -> Result<Box<dyn Renderer>>;

    /// Size in logical (content-scaled) pixels
    fn size(&self) -> LogicalSize<u32>;

    /// Size of the drawable in physical pixels
    fn drawable_size(&self) -> PhysicalSize<u32>;

    /// Resize the window (logical pixels)
    fn set_size(&mut self, size: LogicalSize<u32>) -> Result<()>;

    /// Enter or leave fullscreen mode
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()>;

    /// Whether the window is in fullscreen mode
    fn is_fullscreen(&self) -> bool;

    /// Set the window title
    fn set_title(&mut self, title: &str);

    /// Current window title
    fn title(&self) -> &str;

    /// Set the window icon
    fn set_icon(&mut self, icon: &Surface) -> Result<()>;
}
