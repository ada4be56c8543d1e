//! Abstract: gradient background under translucent organic blobs.

use std::f32::consts::TAU;

use rand::Rng;
use studio_core::{Complexity, Palette};

use super::{pick, StyleStats};
use crate::surface::{LinearGradient, Paint, Point, Rect, Surface};

/// Blobs drawn per complexity step.
const BLOBS_PER_LEVEL: usize = 3;

/// Samples along each quadratic segment of a blob outline.
const CURVE_STEPS: usize = 8;

/// Channel step used when posterising a source image.
const POSTERIZE_STEP: u8 = 32;

#[allow(clippy::cast_precision_loss)]
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
    let (w, h) = (surface.width() as f32, surface.height() as f32);
    let gradient = LinearGradient::even(
        Point::new(0.0, 0.0),
        Point::new(w, h),
        &[palette.get_wrapped(0), palette.get_wrapped(1)],
    );
    surface.fill_gradient(Rect::covering(surface.width(), surface.height()), &gradient);

    let count = complexity.as_usize() * BLOBS_PER_LEVEL;
    for _ in 0..count {
        let center = Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
        let radius = rng.gen_range(50.0..=150.0);
        let controls = rng.gen_range(3..=7);
        let opacity = rng.gen_range(0.3..=1.0);
        let color = pick(palette, rng).with_opacity(opacity);
        let outline = blob_outline(center, radius, controls, rng);
        surface.draw_polygon(&outline, Paint::Fill(color));
    }

    StyleStats {
        shapes: count,
        ..StyleStats::default()
    }
}

/// Closed outline through `controls` jittered points, joined by quadratic
/// curves whose anchors sit at the midpoints between neighbours.
#[allow(clippy::cast_precision_loss)]
fn blob_outline<R: Rng + ?Sized>(center: Point, radius: f32, controls: usize, rng: &mut R) -> Vec<Point> {
    let points: Vec<Point> = (0..controls)
        .map(|i| {
            let angle = i as f32 * TAU / controls as f32 + rng.gen_range(-0.3..0.3);
            let r = radius * rng.gen_range(0.5..=1.0);
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect();

    let mut outline = Vec::with_capacity(controls * CURVE_STEPS);
    for i in 0..controls {
        let prev = points[(i + controls - 1) % controls];
        let ctrl = points[i];
        let next = points[(i + 1) % controls];
        let start = prev.midpoint(&ctrl);
        let end = ctrl.midpoint(&next);
        for step in 0..CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            outline.push(Point::new(
                u * u * start.x + 2.0 * u * t * ctrl.x + t * t * end.x,
                u * u * start.y + 2.0 * u * t * ctrl.y + t * t * end.y,
            ));
        }
    }
    outline
}

/// Quantise every color channel of the surface to `POSTERIZE_STEP` steps.
pub(super) fn posterize<S: Surface + ?Sized>(surface: &mut S) -> StyleStats {
    let mut block = surface.get_pixel_block(0, 0, surface.width(), surface.height());
    let mut mutated = 0;
    for px in block.pixels_mut() {
        let before = [px[0], px[1], px[2]];
        for channel in &mut px[..3] {
            *channel = *channel / POSTERIZE_STEP * POSTERIZE_STEP;
        }
        if before != [px[0], px[1], px[2]] {
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
    fn test_blob_count_scales_with_complexity() {
        let palette = Palette::default();
        let mut raster = Raster::new(200, 200);
        let mut rng = StdRng::seed_from_u64(9);
        let stats = render(&mut raster, &palette, Complexity::saturating(4), &mut rng);
        assert_eq!(stats.shapes, 12);
    }

    #[test]
    fn test_background_is_opaque_gradient() {
        let palette = Palette::default();
        let mut raster = Raster::new(300, 300);
        let mut rng = StdRng::seed_from_u64(1);
        render(&mut raster, &palette, Complexity::saturating(1), &mut rng);
        assert_eq!(raster.count_pixels_not(Color::TRANSPARENT), 300 * 300);
    }

    #[test]
    fn test_blob_outline_is_closed_curve() {
        let mut rng = StdRng::seed_from_u64(5);
        let outline = blob_outline(Point::new(100.0, 100.0), 80.0, 5, &mut rng);
        assert_eq!(outline.len(), 5 * CURVE_STEPS);
        assert!(outline
            .iter()
            .all(|p| p.distance(&Point::new(100.0, 100.0)) <= 80.0 + 1e-3));
    }

    #[test]
    fn test_posterize_steps_channels() {
        let mut raster = Raster::filled(4, 4, Color::rgba(31, 64, 200, 77));
        let stats = posterize(&mut raster);
        assert_eq!(raster.pixel(0, 0), Some(Color::rgba(0, 64, 192, 77)));
        assert_eq!(stats.pixels_mutated, 16);
    }
}
