/// Pixel formats shared by surfaces, textures and renderers
///
/// Formats are named by their byte order in memory: `R8G8B8A8_UNORM` stores
/// red in byte 0 and alpha in byte 3, regardless of host endianness.

use crate::renderer::Color;

/// Texture and surface pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// Format not known or not reported by the driver
    Unknown,

    // 32-bit formats
    R8G8B8A8_UNORM,
    B8G8R8A8_UNORM,
    A8R8G8B8_UNORM,
    A8B8G8R8_UNORM,

    // 24-bit formats (no alpha)
    R8G8B8_UNORM,
    B8G8R8_UNORM,
}

impl TextureFormat {
    /// Bytes used by one pixel (0 for `Unknown`)
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            TextureFormat::Unknown => 0,
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::A8R8G8B8_UNORM
            | TextureFormat::A8B8G8R8_UNORM => 4,
            TextureFormat::R8G8B8_UNORM | TextureFormat::B8G8R8_UNORM => 3,
        }
    }

    /// Whether the format stores an alpha channel
    pub fn has_alpha(&self) -> bool {
        self.bytes_per_pixel() == 4
    }

    /// Whether pixels of this format can be encoded and decoded
    pub fn is_known(&self) -> bool {
        *self != TextureFormat::Unknown
    }

    /// Byte offsets of the (r, g, b, a) channels; alpha is `None` for 24-bit formats
    fn channel_offsets(&self) -> Option<(usize, usize, usize, Option<usize>)> {
        match self {
            TextureFormat::Unknown => None,
            TextureFormat::R8G8B8A8_UNORM => Some((0, 1, 2, Some(3))),
            TextureFormat::B8G8R8A8_UNORM => Some((2, 1, 0, Some(3))),
            TextureFormat::A8R8G8B8_UNORM => Some((1, 2, 3, Some(0))),
            TextureFormat::A8B8G8R8_UNORM => Some((3, 2, 1, Some(0))),
            TextureFormat::R8G8B8_UNORM => Some((0, 1, 2, None)),
            TextureFormat::B8G8R8_UNORM => Some((2, 1, 0, None)),
        }
    }

    /// Decode one pixel
    ///
    /// `bytes` must hold at least `bytes_per_pixel()` bytes. Formats without
    /// alpha decode as opaque. Returns `None` for `Unknown`.
    pub fn decode(&self, bytes: &[u8]) -> Option<Color> {
        let (r, g, b, a) = self.channel_offsets()?;
        if bytes.len() < self.bytes_per_pixel() {
            return None;
        }
        Some(Color {
            r: bytes[r],
            g: bytes[g],
            b: bytes[b],
            a: a.map_or(255, |a| bytes[a]),
        })
    }

    /// Encode one pixel into `bytes`
    ///
    /// Returns false (and writes nothing) for `Unknown` or a too short slice.
    pub fn encode(&self, color: Color, bytes: &mut [u8]) -> bool {
        let Some((r, g, b, a)) = self.channel_offsets() else {
            return false;
        };
        if bytes.len() < self.bytes_per_pixel() {
            return false;
        }
        bytes[r] = color.r;
        bytes[g] = color.g;
        bytes[b] = color.b;
        if let Some(a) = a {
            bytes[a] = color.a;
        }
        true
    }
}

#[cfg(test)]
#[path = "texture_format_tests.rs"]
mod tests;
