//! Glitch: displaced strips over a gradient, plus pixel noise.
//!
//! Strip displacement is a read-modify-write of the surface's pixel buffer
//! (copy a block, paste it shifted), not a redraw.

use rand::Rng;
use studio_core::{Complexity, Palette};

use super::{pick, StyleStats};
use crate::surface::{LinearGradient, Point, Rect, Surface};

/// Strips displaced per complexity step.
const STRIPS_PER_LEVEL: usize = 5;

/// Largest horizontal displacement in pixels.
const MAX_SHIFT: i32 = 25;

/// Chance a displaced strip also gets a translucent overlay.
const OVERLAY_CHANCE: f64 = 0.3;

const OVERLAY_OPACITY: f32 = 0.3;

/// Share of pixels hit by monochrome noise.
const NOISE_CHANCE: f64 = 0.02;

/// Share of source pixels whose channels are randomised.
const SCRAMBLE_CHANCE: f64 = 0.05;

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
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
    let (width, height) = (surface.width(), surface.height());
    let gradient = LinearGradient::even(
        Point::new(0.0, 0.0),
        Point::new(width as f32, 0.0),
        palette.colors(),
    );
    surface.fill_gradient(Rect::covering(width, height), &gradient);

    let strips = complexity.as_usize() * STRIPS_PER_LEVEL;
    for _ in 0..strips {
        let y = rng.gen_range(0..height) as i32;
        let strip_height = rng.gen_range(5..=25);
        let shift = rng.gen_range(-MAX_SHIFT..=MAX_SHIFT);

        let block = surface.get_pixel_block(0, y, width, strip_height);
        surface.put_pixel_block(shift, y, &block);

        if rng.gen_bool(OVERLAY_CHANCE) {
            let color = pick(palette, rng).with_opacity(OVERLAY_OPACITY);
            surface.fill_rect(
                Rect::new(0.0, y as f32, width as f32, strip_height as f32),
                color,
            );
        }
    }

    let mut block = surface.get_pixel_block(0, 0, width, height);
    let mut noisy = 0;
    for px in block.pixels_mut() {
        if rng.gen_bool(NOISE_CHANCE) {
            let value: u8 = rng.gen();
            px[..3].fill(value);
            noisy += 1;
        }
    }
    surface.put_pixel_block(0, 0, &block);

    StyleStats {
        shapes: strips,
        pixels_mutated: noisy,
        ..StyleStats::default()
    }
}

/// Randomise every channel of roughly 5% of the surface's pixels in place.
pub(super) fn scramble<S, R>(surface: &mut S, rng: &mut R) -> StyleStats
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let mut block = surface.get_pixel_block(0, 0, surface.width(), surface.height());
    let mut mutated = 0;
    for px in block.pixels_mut() {
        if rng.gen_bool(SCRAMBLE_CHANCE) {
            for channel in &mut px[..3] {
                *channel = rng.gen();
            }
            mutated += 1;
        }
    }
    surface.put_pixel_block(0, 0, &block);
    StyleStats {
        pixels_mutated: mutated,
        used_source: true,
        ..StyleStats::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use studio_core::Color;

    #[test]
    fn test_noise_share_is_about_two_percent() {
        let palette = Palette::default();
        let mut raster = Raster::new(200, 200);
        let mut rng = StdRng::seed_from_u64(21);
        let stats = render(&mut raster, &palette, Complexity::saturating(5), &mut rng);
        assert_eq!(stats.shapes, 25);
        // 40,000 pixels at 2%: expect ~800.
        assert!((500..1100).contains(&stats.pixels_mutated), "{}", stats.pixels_mutated);
    }

    #[test]
    fn test_scramble_touches_about_five_percent() {
        let mut raster = Raster::filled(100, 100, Color::rgb(10, 20, 30));
        let mut rng = StdRng::seed_from_u64(8);
        let stats = scramble(&mut raster, &mut rng);
        assert!((300..700).contains(&stats.pixels_mutated), "{}", stats.pixels_mutated);
        assert!(stats.used_source);
        // Alpha is never touched.
        assert!(raster.data().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_strip_shift_moves_pixels() {
        let mut raster = Raster::new(50, 10);
        raster.set_pixel(10, 2, Color::WHITE);
        let block = raster.get_pixel_block(0, 0, 50, 10);
        raster.put_pixel_block(5, 0, &block);
        assert_eq!(raster.pixel(15, 2), Some(Color::WHITE));
    }
}
