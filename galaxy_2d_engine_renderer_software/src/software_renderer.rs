/// SoftwareRenderer - CPU implementation of the Renderer trait
///
/// Draws into an RGBA back buffer whose size is the logical render size.
/// `present` copies the back buffer to the front buffer.

use std::sync::Arc;

use galaxy_2d_engine::galaxy2d::render::{
    Color, CopyParams, Flip, Rect2D, Renderer, RendererFlags, RendererInfo, RendererTexture,
    ScaleMode, Surface, TextureDesc, TextureFormat, TextureInfo,
};
use galaxy_2d_engine::galaxy2d::{Error, Result};
use galaxy_2d_engine::engine_debug;

use crate::software_backend::SoftwareConfig;
use crate::software_stats::StatsTracker;
use crate::software_texture::{texel_in, SoftwareTexture};

/// Software renderer
pub struct SoftwareRenderer {
    flags: RendererFlags,
    texture_formats: Vec<TextureFormat>,
    max_texture_size: u32,
    draw_color: Color,
    back_buffer: Surface,
    front_buffer: Surface,
    stats: Arc<StatsTracker>,
}

impl SoftwareRenderer {
    pub(crate) fn new(config: &SoftwareConfig, flags: RendererFlags, stats: Arc<StatsTracker>) -> Result<Self> {
        let back_buffer = Surface::new(0, 0, TextureFormat::R8G8B8A8_UNORM)?;
        engine_debug!("galaxy2d::software::Renderer", "Renderer created (requested {:?})", flags);
        Ok(Self {
            flags: (flags & RendererFlags::PRESENT_VSYNC) | RendererFlags::SOFTWARE | RendererFlags::TARGET_TEXTURE,
            texture_formats: config.texture_formats.clone(),
            max_texture_size: config.max_texture_size,
            draw_color: Color::BLACK,
            front_buffer: back_buffer.clone(),
            back_buffer,
            stats,
        })
    }

    /// Pixels shown by the last `present`
    pub fn front_buffer(&self) -> &Surface {
        &self.front_buffer
    }

    /// Pixels drawn since the last `present`
    pub fn back_buffer(&self) -> &Surface {
        &self.back_buffer
    }

    pub fn draw_color(&self) -> Color {
        self.draw_color
    }
}

impl Renderer for SoftwareRenderer {
    fn info(&self) -> Result<RendererInfo> {
        Ok(RendererInfo {
            name: "software".to_string(),
            flags: self.flags,
            texture_formats: self.texture_formats.clone(),
            max_texture_width: self.max_texture_size,
            max_texture_height: self.max_texture_size,
        })
    }

    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>> {
        if !self.texture_formats.contains(&desc.format) {
            return Err(Error::BackendError(format!(
                "Texture format {:?} is not supported", desc.format
            )));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::BackendError(format!(
                "Texture size {}x{} is empty", desc.width, desc.height
            )));
        }
        if self.max_texture_size > 0
            && (desc.width > self.max_texture_size || desc.height > self.max_texture_size)
        {
            return Err(Error::BackendError(format!(
                "Texture size {}x{} exceeds the {} pixel limit", desc.width, desc.height, self.max_texture_size
            )));
        }

        Ok(Arc::new(SoftwareTexture::new(&desc, self.stats.clone())?))
    }

    fn copy_texture(&mut self, texture: &dyn RendererTexture, params: &CopyParams) -> Result<()> {
        let Some(texture) = texture.as_any().downcast_ref::<SoftwareTexture>() else {
            return Err(Error::BackendError("Texture was not created by the software renderer".to_string()));
        };
        if params.src.is_empty() || params.dst.is_empty() {
            return Ok(());
        }

        let info = *texture.info();
        let target = &mut self.back_buffer;
        let written = texture.with_pixels(|pixels| rasterize(&info, pixels, params, target))?;
        self.stats.record_copy(written);
        Ok(())
    }

    fn set_draw_color(&mut self, color: Color) -> Result<()> {
        self.draw_color = color;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.back_buffer.fill(self.draw_color);
        Ok(())
    }

    fn present(&mut self) {
        self.front_buffer.clone_from(&self.back_buffer);
        self.stats.increment_frames();
    }

    fn set_logical_size(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == self.logical_size() {
            return Ok(());
        }
        self.back_buffer = Surface::new(width, height, TextureFormat::R8G8B8A8_UNORM)
            .map_err(|e| e.relabel(Error::BackendError, "Failed to allocate back buffer"))?;
        self.front_buffer = self.back_buffer.clone();
        engine_debug!("galaxy2d::software::Renderer", "Logical size set to {}x{}", width, height);
        Ok(())
    }

    fn logical_size(&self) -> (u32, u32) {
        (self.back_buffer.width(), self.back_buffer.height())
    }

    fn read_pixels(&self) -> Result<Surface> {
        Ok(self.back_buffer.clone())
    }
}

// ===== RASTERIZER =====

/// Draw `params.src` of a texture into `target`
///
/// Every target pixel whose center falls inside the rotated destination
/// rectangle is mapped back into the source rectangle. Source texels outside
/// the texture are skipped. Returns the number of pixels written.
fn rasterize(info: &TextureInfo, pixels: &[u8], params: &CopyParams, target: &mut Surface) -> u64 {
    let dst = params.dst;
    let src = params.src;
    let (dw, dh) = (dst.width as f64, dst.height as f64);
    let (cx, cy) = (dst.x as f64 + dw / 2.0, dst.y as f64 + dh / 2.0);
    let (sin, cos) = params.angle.to_radians().sin_cos();

    let (min_x, min_y, max_x, max_y) = rotated_bounds(dst, cx, cy, sin, cos);
    let x_start = min_x.floor().max(0.0) as u32;
    let y_start = min_y.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().max(0.0) as u32).min(target.width());
    let y_end = (max_y.ceil().max(0.0) as u32).min(target.height());

    let mut written = 0;
    for py in y_start..y_end {
        for px in x_start..x_end {
            // Undo the clockwise rotation around the destination center
            let bx = px as f64 + 0.5 - cx;
            let by = py as f64 + 0.5 - cy;
            let u = bx * cos + by * sin + dw / 2.0;
            let v = -bx * sin + by * cos + dh / 2.0;
            if u < 0.0 || v < 0.0 || u >= dw || v >= dh {
                continue;
            }

            let mut fu = u / dw;
            let mut fv = v / dh;
            if params.flip.contains(Flip::HORIZONTAL) {
                fu = 1.0 - fu;
            }
            if params.flip.contains(Flip::VERTICAL) {
                fv = 1.0 - fv;
            }
            let sx = src.x as f64 + fu * src.width as f64;
            let sy = src.y as f64 + fv * src.height as f64;

            let Some(color) = sample(info, pixels, src, sx, sy, params.scale_mode) else {
                continue;
            };
            let color = modulate(color, params.color_mod, params.alpha_mod);
            if let Some(below) = target.pixel(px, py) {
                target.set_pixel(px, py, blend(color, below));
                written += 1;
            }
        }
    }
    written
}

fn rotated_bounds(dst: Rect2D, cx: f64, cy: f64, sin: f64, cos: f64) -> (f64, f64, f64, f64) {
    let x0 = dst.x as f64;
    let y0 = dst.y as f64;
    let x1 = x0 + dst.width as f64;
    let y1 = y0 + dst.height as f64;

    let mut bounds = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
        let rx = cx + (x - cx) * cos - (y - cy) * sin;
        let ry = cy + (x - cx) * sin + (y - cy) * cos;
        bounds.0 = bounds.0.min(rx);
        bounds.1 = bounds.1.min(ry);
        bounds.2 = bounds.2.max(rx);
        bounds.3 = bounds.3.max(ry);
    }
    bounds
}

/// Fetch the color at continuous source coordinates (sx, sy)
fn sample(info: &TextureInfo, pixels: &[u8], src: Rect2D, sx: f64, sy: f64, mode: ScaleMode) -> Option<Color> {
    let last_x = src.x as i64 + src.width as i64 - 1;
    let last_y = src.y as i64 + src.height as i64 - 1;
    let tx = (sx.floor() as i64).min(last_x);
    let ty = (sy.floor() as i64).min(last_y);

    // The nearest texel decides whether anything is drawn
    let nearest = texel_in(info, pixels, tx, ty)?;
    if mode == ScaleMode::Nearest {
        return Some(nearest);
    }

    // Neighbors are clamped to the part of the clip inside the texture
    let lo_x = (src.x as i64).max(0);
    let lo_y = (src.y as i64).max(0);
    let hi_x = last_x.min(info.width as i64 - 1);
    let hi_y = last_y.min(info.height as i64 - 1);

    let fx = sx - 0.5;
    let fy = sy - 0.5;
    let x0 = fx.floor() as i64;
    let y0 = fy.floor() as i64;
    let wx = fx - x0 as f64;
    let wy = fy - y0 as f64;

    let fetch = |x: i64, y: i64| texel_in(info, pixels, x.clamp(lo_x, hi_x), y.clamp(lo_y, hi_y));
    let (Some(c00), Some(c10), Some(c01), Some(c11)) =
        (fetch(x0, y0), fetch(x0 + 1, y0), fetch(x0, y0 + 1), fetch(x0 + 1, y0 + 1))
    else {
        return Some(nearest);
    };

    let lerp = |a: u8, b: u8, c: u8, d: u8| {
        let top = a as f64 * (1.0 - wx) + b as f64 * wx;
        let bottom = c as f64 * (1.0 - wx) + d as f64 * wx;
        (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8
    };
    Some(Color::new(
        lerp(c00.r, c10.r, c01.r, c11.r),
        lerp(c00.g, c10.g, c01.g, c11.g),
        lerp(c00.b, c10.b, c01.b, c11.b),
        lerp(c00.a, c10.a, c01.a, c11.a),
    ))
}

fn mul_255(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

fn modulate(color: Color, color_mod: [u8; 3], alpha_mod: u8) -> Color {
    Color::new(
        mul_255(color.r, color_mod[0]),
        mul_255(color.g, color_mod[1]),
        mul_255(color.b, color_mod[2]),
        mul_255(color.a, alpha_mod),
    )
}

/// Source-over blend of straight-alpha colors
fn blend(src: Color, dst: Color) -> Color {
    match src.a {
        255 => src,
        0 => dst,
        a => {
            let inv = 255 - a;
            let mix = |s: u8, d: u8| ((s as u32 * a as u32 + d as u32 * inv as u32 + 127) / 255) as u8;
            Color::new(
                mix(src.r, dst.r),
                mix(src.g, dst.g),
                mix(src.b, dst.b),
                a.saturating_add(mul_255(dst.a, inv)),
            )
        }
    }
}

#[cfg(test)]
#[path = "software_renderer_tests.rs"]
mod tests;
