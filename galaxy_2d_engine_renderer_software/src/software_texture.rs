/// SoftwareTexture - CPU implementation of RendererTexture
///
/// Pixels are stored tightly packed in the texture's own format. Streaming
/// textures are written through `lock` / `unlock`, the others through
/// `update`. At most one lock is outstanding at a time.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use galaxy_2d_engine::galaxy2d::render::{
    Color, LockedPixels, Rect2D, RendererTexture, TextureAccess, TextureDesc, TextureInfo,
};
use galaxy_2d_engine::galaxy2d::{Error, Result};

use crate::software_stats::StatsTracker;

/// Software texture
pub struct SoftwareTexture {
    /// Read-only texture properties
    info: TextureInfo,
    /// Tightly packed pixels
    pixels: Mutex<Vec<u8>>,
    /// Set while a lock is outstanding
    locked: AtomicBool,
    /// Shared statistics (for release accounting)
    stats: Arc<StatsTracker>,
}

impl SoftwareTexture {
    /// Allocate zeroed storage for `desc`
    ///
    /// Fails when the byte size does not fit in memory.
    pub(crate) fn new(desc: &TextureDesc, stats: Arc<StatsTracker>) -> Result<Self> {
        let len = (desc.width as usize)
            .checked_mul(desc.height as usize)
            .and_then(|texels| texels.checked_mul(desc.format.bytes_per_pixel()))
            .ok_or_else(|| Error::BackendError(format!(
                "Texture size {}x{} overflows the address space", desc.width, desc.height
            )))?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| Error::BackendError(format!(
            "Failed to allocate {} bytes for a {}x{} texture: {}", len, desc.width, desc.height, e
        )))?;
        pixels.resize(len, 0);

        stats.increment_textures_created();
        Ok(Self {
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                access: desc.access,
            },
            pixels: Mutex::new(pixels),
            locked: AtomicBool::new(false),
            stats,
        })
    }

    fn storage(&self) -> Result<MutexGuard<'_, Vec<u8>>> {
        self.pixels.lock().map_err(|_| Error::BackendError("Texture storage lock poisoned".to_string()))
    }

    /// Copy of the stored pixels (tightly packed)
    pub fn pixels(&self) -> Result<Vec<u8>> {
        Ok(self.storage()?.clone())
    }

    /// Decode the texel at (x, y); `None` outside the texture
    pub fn texel(&self, x: i64, y: i64) -> Option<Color> {
        let storage = self.pixels.lock().ok()?;
        texel_in(&self.info, &storage, x, y)
    }

    /// Whether a lock is outstanding
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Run `f` with the stored pixels
    pub(crate) fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let storage = self.storage()?;
        Ok(f(&storage))
    }
}

/// Decode the texel at (x, y) of a tightly packed buffer
pub(crate) fn texel_in(info: &TextureInfo, pixels: &[u8], x: i64, y: i64) -> Option<Color> {
    if x < 0 || y < 0 || x >= info.width as i64 || y >= info.height as i64 {
        return None;
    }
    let offset = y as usize * info.row_bytes() + x as usize * info.format.bytes_per_pixel();
    info.format.decode(pixels.get(offset..)?)
}

impl RendererTexture for SoftwareTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn lock(&self) -> Result<LockedPixels> {
        if self.info.access != TextureAccess::Streaming {
            return Err(Error::BackendError(format!(
                "Only streaming textures can be locked ({:?})", self.info.access
            )));
        }
        if self.locked.swap(true, Ordering::AcqRel) {
            return Err(Error::BackendError("Texture is already locked".to_string()));
        }

        match self.storage() {
            Ok(storage) => Ok(LockedPixels::new(storage.clone(), self.info.row_bytes())),
            Err(e) => {
                self.locked.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn unlock(&self, pixels: LockedPixels) {
        let data = pixels.into_data();
        if let Ok(mut storage) = self.pixels.lock() {
            if data.len() == storage.len() {
                *storage = data;
            }
        }
        self.locked.store(false, Ordering::Release);
    }

    fn update(&self, rect: Option<Rect2D>, pixels: &[u8], pitch: usize) -> Result<()> {
        if self.info.access == TextureAccess::Streaming {
            return Err(Error::BackendError("Streaming textures are updated through lock / unlock".to_string()));
        }

        let rect = rect.unwrap_or_else(|| self.info.bounds());
        if rect.x < 0
            || rect.y < 0
            || rect.x as u64 + rect.width as u64 > self.info.width as u64
            || rect.y as u64 + rect.height as u64 > self.info.height as u64
        {
            return Err(Error::BackendError(format!(
                "Update rect {:?} is outside the {}x{} texture", rect, self.info.width, self.info.height
            )));
        }

        let bpp = self.info.format.bytes_per_pixel();
        let row_len = rect.width as usize * bpp;
        let row_bytes = self.info.row_bytes();
        if pitch < row_len {
            return Err(Error::BackendError(format!(
                "Pitch {} is smaller than a row of {} bytes", pitch, row_len
            )));
        }

        let mut storage = self.storage()?;
        for row in 0..rect.height as usize {
            let Some(src) = pixels.get(row * pitch..row * pitch + row_len) else {
                return Err(Error::BackendError(format!(
                    "Update buffer too small for {} rows of {} bytes", rect.height, pitch
                )));
            };
            let dst_start = (rect.y as usize + row) * row_bytes + rect.x as usize * bpp;
            storage[dst_start..dst_start + row_len].copy_from_slice(src);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for SoftwareTexture {
    fn drop(&mut self) {
        self.stats.increment_textures_released();
    }
}

#[cfg(test)]
#[path = "software_texture_tests.rs"]
mod tests;
