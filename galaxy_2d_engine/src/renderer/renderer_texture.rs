/// RendererTexture trait, texture descriptor, and texture info

use std::any::Any;

use crate::error::Result;
use crate::renderer::{Rect2D, TextureFormat};

/// Mutability class of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureAccess {
    /// Content rarely changes; updated with `RendererTexture::update`
    Static,
    /// Content changes often; updated through `lock` / `unlock`
    Streaming,
    /// Can be used as a render target
    Target,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Access mode
    pub access: TextureAccess,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Access mode
    pub access: TextureAccess,
}

impl TextureInfo {
    /// Full extent of the texture
    pub fn bounds(&self) -> Rect2D {
        Rect2D::new(0, 0, self.width, self.height)
    }

    /// Bytes of one tightly packed row
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

/// Writable pixels handed out by `RendererTexture::lock`
///
/// Owns a staging copy of the whole texture; `RendererTexture::unlock`
/// commits it back to the native resource.
#[derive(Debug)]
pub struct LockedPixels {
    data: Vec<u8>,
    pitch: usize,
}

impl LockedPixels {
    /// Wrap a staging buffer of `pitch * height` bytes
    pub fn new(data: Vec<u8>, pitch: usize) -> Self {
        Self { data, pitch }
    }

    /// Bytes between the starts of two consecutive rows
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give the staging buffer back (used by backends on unlock)
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types (e.g., SoftwareTexture).
/// The native resource is destroyed when the value is dropped.
pub trait RendererTexture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Map the whole texture for writing
    ///
    /// Only streaming textures can be locked, and only once at a time.
    fn lock(&self) -> Result<LockedPixels>;

    /// Commit pixels obtained from `lock` and release the lock
    fn unlock(&self, pixels: LockedPixels);

    /// Replace the pixels of `rect` (whole texture if `None`) from a buffer
    /// with the given pitch
    fn update(&self, rect: Option<Rect2D>, pixels: &[u8], pitch: usize) -> Result<()>;

    /// Access to the concrete type, for backends receiving `&dyn RendererTexture`
    fn as_any(&self) -> &dyn Any;
}
