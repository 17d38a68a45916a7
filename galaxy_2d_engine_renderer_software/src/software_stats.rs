/// Software renderer statistics - draw counters with a colored report
///
/// One tracker is shared by a backend and every window, renderer and
/// texture it creates.

use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the renderer counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RendererStats {
    /// Frames presented
    pub frames: u64,
    /// Texture copies rasterized
    pub copies: u64,
    /// Destination pixels written by copies
    pub pixels_written: u64,
    /// Textures created
    pub textures_created: u64,
    /// Textures released
    pub textures_released: u64,
}

impl RendererStats {
    /// Textures created and not yet released
    pub fn textures_alive(&self) -> u64 {
        self.textures_created.saturating_sub(self.textures_released)
    }
}

/// Thread-safe statistics tracker
#[derive(Debug, Default)]
pub(crate) struct StatsTracker {
    frames: AtomicU64,
    copies: AtomicU64,
    pixels_written: AtomicU64,
    textures_created: AtomicU64,
    textures_released: AtomicU64,
}

impl StatsTracker {
    pub(crate) fn increment_frames(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_copy(&self, pixels: u64) {
        self.copies.fetch_add(1, Ordering::Relaxed);
        self.pixels_written.fetch_add(pixels, Ordering::Relaxed);
    }

    pub(crate) fn increment_textures_created(&self) {
        self.textures_created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_textures_released(&self) {
        self.textures_released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get_stats(&self) -> RendererStats {
        RendererStats {
            frames: self.frames.load(Ordering::Relaxed),
            copies: self.copies.load(Ordering::Relaxed),
            pixels_written: self.pixels_written.load(Ordering::Relaxed),
            textures_created: self.textures_created.load(Ordering::Relaxed),
            textures_released: self.textures_released.load(Ordering::Relaxed),
        }
    }
}

/// Print a statistics report to the console
pub fn print_stats_report(stats: &RendererStats) {
    println!("\n{}", "=== Software Renderer Report ===".bright_blue().bold());

    println!("  {} {}", "Frames:".white().bold(), stats.frames);
    println!("  {} {} ({} pixels)", "Copies:".cyan(), stats.copies, stats.pixels_written);
    println!("  {} {} created, {} released", "Textures:".cyan(),
        stats.textures_created, stats.textures_released);

    if stats.textures_alive() > 0 {
        println!("  {} {} texture(s) still alive", "Warning:".yellow().bold(), stats.textures_alive());
    } else {
        println!("  {}", "✓ All textures released".green());
    }

    println!("{}\n", "================================".bright_blue().bold());
}
