/// Scoped write access to the pixels of a streaming texture
///
/// The lock is taken when the `TextureLock` is built and released when it
/// is dropped, on every exit path. A failed acquisition builds nothing, so
/// there is never a half-locked guard to clean up.

use std::cmp::min;

use crate::engine_bail;
use crate::engine_err;
use crate::error::Result;
use crate::renderer::{
    LockedPixels, RendererTexture, Surface, Texture, TextureAccess, TextureInfo,
};

/// Exclusive pixel access to one texture
///
/// # Example
///
/// ```no_run
/// use galaxy_2d_engine::galaxy2d::render::{Surface, Texture, TextureLock};
///
/// fn upload(texture: &Texture, frame: &Surface) -> galaxy_2d_engine::galaxy2d::Result<()> {
///     let mut lock = TextureLock::new(texture)?;
///     lock.stream_surface(frame)?;
///     Ok(())
///     // unlocked here
/// }
/// ```
pub struct TextureLock<'a> {
    texture: &'a dyn RendererTexture,
    pixels: Option<LockedPixels>,
}

impl<'a> TextureLock<'a> {
    /// Lock the native texture of a handle
    ///
    /// # Errors
    ///
    /// `LockFailed` if the handle is empty, the texture is not streaming, or
    /// the driver refuses the lock (e.g. already locked).
    pub fn new(texture: &'a Texture) -> Result<Self> {
        match texture.render_texture() {
            Some(render_texture) => Self::from_render_texture(render_texture),
            None => Err(engine_err!("galaxy2d::TextureLock", LockFailed,
                "Cannot lock an empty texture")),
        }
    }

    /// Lock a native texture directly
    pub fn from_render_texture(texture: &'a dyn RendererTexture) -> Result<Self> {
        let info = texture.info();
        if info.access != TextureAccess::Streaming {
            engine_bail!("galaxy2d::TextureLock", LockFailed,
                "Texture {}x{} has {:?} access, only streaming textures can be locked",
                info.width, info.height, info.access);
        }

        let pixels = texture.lock().map_err(|e| engine_err!("galaxy2d::TextureLock",
            LockFailed, "Failed to lock texture: {}", e))?;

        Ok(Self {
            texture,
            pixels: Some(pixels),
        })
    }

    /// Properties of the locked texture
    pub fn info(&self) -> &TextureInfo {
        self.texture.info()
    }

    /// Bytes between the starts of two consecutive rows of the locked buffer
    pub fn pitch(&self) -> usize {
        self.pixels.as_ref().map_or(0, LockedPixels::pitch)
    }

    /// Locked bytes, writable until the lock is dropped
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        match self.pixels.as_mut() {
            Some(pixels) => pixels.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Copy a surface into the locked buffer
    ///
    /// The surface is converted to the texture format first if needed.
    /// Rows are copied one by one, honoring both pitches: at most
    /// `min(source rows, texture rows)` rows of
    /// `min(source row bytes, texture row bytes)` bytes.
    pub fn stream_surface(&mut self, surface: &Surface) -> Result<()> {
        let info = *self.texture.info();

        let converted;
        let source = if surface.format() == info.format {
            surface
        } else {
            converted = surface.convert(info.format)?;
            &converted
        };

        let Some(pixels) = self.pixels.as_mut() else {
            engine_bail!("galaxy2d::TextureLock", LockFailed, "Texture is not locked");
        };

        let dst_pitch = pixels.pitch();
        let row_len = min(source.row_bytes(), min(info.row_bytes(), dst_pitch));
        let rows = min(source.height(), info.height) as usize;
        let data = pixels.as_mut_slice();

        for y in 0..rows {
            let src_start = y * source.pitch();
            let dst_start = y * dst_pitch;
            let (Some(src), Some(dst)) = (
                source.pixels().get(src_start..src_start + row_len),
                data.get_mut(dst_start..dst_start + row_len),
            ) else {
                break;
            };
            dst.copy_from_slice(src);
        }

        Ok(())
    }
}

impl Drop for TextureLock<'_> {
    fn drop(&mut self) {
        if let Some(pixels) = self.pixels.take() {
            self.texture.unlock(pixels);
        }
    }
}

#[cfg(test)]
#[path = "texture_lock_tests.rs"]
mod tests;
