/*!
# Galaxy 2D Engine

Core traits and types for the Galaxy 2D rendering engine.

This crate provides the platform-agnostic API for 2D rendering using trait-based
dynamic polymorphism. Backend implementations (software rasterizer, SDL, etc.)
provide concrete types that implement the driver traits.

## Architecture

- **Backend** / **NativeWindow**: Window creation and window-level operations
- **Renderer**: Drawing surface, texture factory and copy primitive
- **RendererTexture**: Native texture resource trait
- **Texture**: Shared texture handle carrying per-handle render state
- **TextureLock**: Scoped pixel access to a streaming texture
- **Window**: Render context (window + renderer), registered by `Engine`
*/

// Internal modules
mod error;
mod engine;
mod window;
pub mod log;
pub mod renderer;

// Main galaxy2d namespace module
pub mod galaxy2d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Render context
    pub use crate::window::Window;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export the dpi types used by window sizes
pub use winit::dpi;
