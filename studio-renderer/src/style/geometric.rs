//! Geometric: a grid of circles, squares and triangles on black.

use rand::Rng;
use studio_core::{Color, Palette};

use super::{pick, StyleStats};
use crate::surface::{Paint, Point, Rect, Surface};

/// Grid cell size in pixels.
const CELL_SIZE: u32 = 40;

/// Chance that a cell holds a shape.
const SHAPE_CHANCE: f64 = 0.7;

/// Chance that a shape is filled rather than stroked.
const FILL_CHANCE: f64 = 0.5;

/// Shape size relative to its cell.
const SHAPE_RATIO: f32 = 0.8;

const STROKE_WIDTH: f32 = 2.0;

#[allow(clippy::cast_precision_loss)]
pub(super) fn render<S, R>(surface: &mut S, palette: &Palette, rng: &mut R) -> StyleStats
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    surface.clear(Color::BLACK);

    let cols = surface.width().div_ceil(CELL_SIZE);
    let rows = surface.height().div_ceil(CELL_SIZE);
    let cell = CELL_SIZE as f32;
    let half = cell * SHAPE_RATIO / 2.0;
    let mut shapes = 0;

    for row in 0..rows {
        for col in 0..cols {
            if !rng.gen_bool(SHAPE_CHANCE) {
                continue;
            }
            let center = Point::new(
                col as f32 * cell + cell / 2.0,
                row as f32 * cell + cell / 2.0,
            );
            let kind = rng.gen_range(0..3);
            let filled = rng.gen_bool(FILL_CHANCE);
            let color = pick(palette, rng);
            let paint = if filled {
                Paint::Fill(color)
            } else {
                Paint::Stroke {
                    color,
                    width: STROKE_WIDTH,
                }
            };

            match kind {
                0 => surface.draw_ellipse(center, half, half, paint),
                1 => {
                    let rect = Rect::new(center.x - half, center.y - half, half * 2.0, half * 2.0);
                    if filled {
                        surface.fill_rect(rect, color);
                    } else {
                        surface.stroke_rect(rect, color, STROKE_WIDTH);
                    }
                }
                _ => {
                    let triangle = [
                        Point::new(center.x, center.y - half),
                        Point::new(center.x + half, center.y + half),
                        Point::new(center.x - half, center.y + half),
                    ];
                    surface.draw_polygon(&triangle, paint);
                }
            }
            shapes += 1;
        }
    }

    StyleStats {
        shapes,
        ..StyleStats::default()
    }
}
