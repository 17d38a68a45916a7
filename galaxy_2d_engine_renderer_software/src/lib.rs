/*!
# Galaxy 2D Engine - Software Renderer Backend

CPU implementation of the Galaxy 2D rendering engine.

This crate implements the galaxy_2d_engine driver traits without any GPU or
display: windows are off-screen, renderers rasterize into an RGBA back
buffer, and textures are plain byte buffers. It is the backend used by the
engine's integration tests and by headless applications.
*/

mod software_backend;
mod software_renderer;
mod software_stats;
mod software_texture;
mod software_window;

pub use software_backend::{SoftwareBackend, SoftwareConfig};
pub use software_renderer::SoftwareRenderer;
pub use software_texture::SoftwareTexture;
pub use software_window::SoftwareWindow;

// Re-export statistics utilities
pub use software_stats::{print_stats_report, RendererStats};
