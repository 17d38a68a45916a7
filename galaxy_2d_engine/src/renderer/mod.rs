/// Renderer module - driver traits and the engine-side texture types

// Driver interface
pub mod renderer;
pub mod renderer_texture;
pub mod renderer_window;

// Engine-side types
pub mod texture_format;
pub mod surface;
pub mod texture;
pub mod texture_lock;

#[cfg(test)]
pub mod mock_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use renderer_texture::*;
pub use renderer_window::*;
pub use texture_format::*;
pub use surface::Surface;
pub use texture::Texture;
pub use texture_lock::TextureLock;
