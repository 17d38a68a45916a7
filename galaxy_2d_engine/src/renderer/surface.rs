/// CPU pixel buffer exchanged with textures and renderers
///
/// A surface is `height` rows of `pitch` bytes. Only the first
/// `width * bytes_per_pixel` bytes of a row are pixels; the rest is padding
/// and is never interpreted.

use std::path::Path;

use crate::engine_bail;
use crate::engine_err;
use crate::error::Result;
use crate::renderer::{Color, TextureFormat};

/// Row-major pixel buffer with explicit pitch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pitch: usize,
    format: TextureFormat,
    pixels: Vec<u8>,
}

impl Surface {
    /// Create a zero-filled, tightly packed surface
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Result<Self> {
        let pitch = width as usize * format.bytes_per_pixel();
        Self::with_pitch(width, height, pitch, format)
    }

    /// Create a zero-filled surface with rows of `pitch` bytes
    pub fn with_pitch(width: u32, height: u32, pitch: usize, format: TextureFormat) -> Result<Self> {
        let len = Self::byte_len(pitch, height)?;
        Self::from_pixels(width, height, pitch, format, vec![0; len])
    }

    /// Wrap existing pixel data
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the format is unknown, if `pitch` is smaller than
    /// a row of pixels, if `pitch * height` overflows, or if `pixels` holds
    /// fewer than `pitch * height` bytes.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pitch: usize,
        format: TextureFormat,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        if !format.is_known() {
            engine_bail!("galaxy2d::Surface", InvalidOperation, "Surface format is unknown");
        }
        let row_bytes = width as usize * format.bytes_per_pixel();
        if pitch < row_bytes {
            engine_bail!("galaxy2d::Surface", InvalidOperation,
                "Pitch {} is smaller than a row of {} bytes", pitch, row_bytes);
        }
        if pixels.len() < Self::byte_len(pitch, height)? {
            engine_bail!("galaxy2d::Surface", InvalidOperation,
                "Pixel buffer of {} bytes is too small for {} rows of {} bytes",
                pixels.len(), height, pitch);
        }
        Ok(Self { width, height, pitch, format, pixels })
    }

    fn byte_len(pitch: usize, height: u32) -> Result<usize> {
        match pitch.checked_mul(height as usize) {
            Some(len) => Ok(len),
            None => engine_bail!("galaxy2d::Surface", InvalidOperation,
                "Surface of {} rows of {} bytes overflows the address space", height, pitch),
        }
    }

    /// Wrap a decoded RGBA image
    pub fn from_rgba_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pitch: width as usize * 4,
            format: TextureFormat::R8G8B8A8_UNORM,
            pixels: image.into_raw(),
        }
    }

    /// Read and decode an image file into an RGBA surface
    ///
    /// # Errors
    ///
    /// `AssetLoadFailed` if the file cannot be read or decoded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| engine_err!("galaxy2d::Surface",
            AssetLoadFailed, "read {}: {}", path.display(), e))?;
        let image = image::load_from_memory(&bytes).map_err(|e| engine_err!("galaxy2d::Surface",
            AssetLoadFailed, "decode {}: {}", path.display(), e))?;
        Ok(Self::from_rgba_image(image.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of two consecutive rows
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Raw bytes, padding included
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Bytes of pixel data in one row (padding excluded)
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Pixel bytes of row `y`
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.pitch;
        self.pixels.get(start..start + self.row_bytes())
    }

    /// Mutable pixel bytes of row `y`
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.pitch;
        let end = start + self.row_bytes();
        self.pixels.get_mut(start..end)
    }

    fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.pitch + x as usize * self.format.bytes_per_pixel())
    }

    /// Decode the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.pixel_offset(x, y)?;
        self.format.decode(&self.pixels[offset..])
    }

    /// Encode `color` at (x, y); returns false when out of bounds
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.pixel_offset(x, y) {
            Some(offset) => self.format.encode(color, &mut self.pixels[offset..]),
            None => false,
        }
    }

    /// Set every pixel to `color` (padding untouched)
    pub fn fill(&mut self, color: Color) {
        let bpp = self.format.bytes_per_pixel();
        let mut encoded = [0u8; 4];
        self.format.encode(color, &mut encoded);
        for y in 0..self.height {
            if let Some(row) = self.row_mut(y) {
                for texel in row.chunks_exact_mut(bpp) {
                    texel.copy_from_slice(&encoded[..bpp]);
                }
            }
        }
    }

    /// Copy of this surface in another format, tightly packed
    pub fn convert(&self, format: TextureFormat) -> Result<Surface> {
        let mut converted = Surface::new(self.width, self.height, format)?;
        if format == self.format {
            for y in 0..self.height {
                if let (Some(src), Some(dst)) = (self.row(y), converted.row_mut(y)) {
                    dst.copy_from_slice(src);
                }
            }
            return Ok(converted);
        }

        let src_bpp = self.format.bytes_per_pixel();
        let dst_bpp = format.bytes_per_pixel();
        for y in 0..self.height {
            let (Some(src), Some(dst)) = (self.row(y), converted.row_mut(y)) else {
                continue;
            };
            for (src_texel, dst_texel) in src.chunks_exact(src_bpp).zip(dst.chunks_exact_mut(dst_bpp)) {
                if let Some(color) = self.format.decode(src_texel) {
                    format.encode(color, dst_texel);
                }
            }
        }
        Ok(converted)
    }
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
