//! Pixel: diagonal palette banding in 10px blocks with noise and overlays.

use rand::Rng;
use studio_core::{Complexity, Palette};

use super::{pick, StyleStats};
use crate::surface::{Rect, Surface};

const BLOCK_SIZE: u32 = 10;

/// Chance a block ignores the banding and takes a random palette color.
const NOISE_CHANCE: f64 = 0.1;

/// Overlay blocks per complexity step.
const OVERLAYS_PER_LEVEL: usize = 10;

const OVERLAY_OPACITY: f32 = 0.5;

/// Palette index for a block, banding along the diagonal.
fn band_index(bx: u32, by: u32, cols: u32, rows: u32, len: usize) -> usize {
    let diagonals = (cols + rows).saturating_sub(1).max(1) as usize;
    ((bx + by) as usize * len / diagonals).min(len.saturating_sub(1))
}

#[allow(clippy::cast_precision_loss)]
fn block_rect(bx: u32, by: u32) -> Rect {
    let size = BLOCK_SIZE as f32;
    Rect::new(bx as f32 * size, by as f32 * size, size, size)
}

pub(super) fn render<S, R>(
    surface: &mut S,
    palette: &Palette,
    complexity: Complexity,
    rng: &mut R,
) -> StyleStats
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let cols = surface.width().div_ceil(BLOCK_SIZE);
    let rows = surface.height().div_ceil(BLOCK_SIZE);

    for by in 0..rows {
        for bx in 0..cols {
            let color = if rng.gen_bool(NOISE_CHANCE) {
                pick(palette, rng)
            } else {
                palette.get_wrapped(band_index(bx, by, cols, rows, palette.len()))
            };
            surface.fill_rect(block_rect(bx, by), color);
        }
    }

    let overlays = complexity.as_usize() * OVERLAYS_PER_LEVEL;
    for _ in 0..overlays {
        let bx = rng.gen_range(0..cols);
        let by = rng.gen_range(0..rows);
        let color = pick(palette, rng).with_opacity(OVERLAY_OPACITY);
        surface.fill_rect(block_rect(bx, by), color);
    }

    StyleStats {
        shapes: cols as usize * rows as usize + overlays,
        ..StyleStats::default()
    }
}
