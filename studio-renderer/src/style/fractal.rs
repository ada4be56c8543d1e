//! Fractal: circle packing driven by an explicit work stack.

use std::f32::consts::PI;

use studio_core::{Color, Complexity, Palette};
use tracing::trace;

use super::StyleStats;
use crate::surface::{Paint, Point, Surface};
use crate::{RenderError, RenderResult};

/// Hard cap on recursion depth regardless of complexity.
pub const MAX_FRACTAL_DEPTH: usize = 8;

const BRANCHES: usize = 6;

/// Child distance relative to the parent size.
const CHILD_DISTANCE: f32 = 1.5;

/// Child size relative to the parent size.
const CHILD_SCALE: f32 = 0.4;

/// Circles smaller than this are not drawn.
const MIN_SIZE: f32 = 2.0;

/// Root size relative to the smaller canvas side.
const ROOT_RATIO: f32 = 0.15;

const FILL_OPACITY: f32 = 0.7;

/// Depth used for a complexity: `min(complexity, 8)`.
#[must_use]
pub fn depth_limit(complexity: Complexity) -> usize {
    complexity.as_usize().min(MAX_FRACTAL_DEPTH)
}

/// Upper bound on nodes for a depth: `(6^(d+1) − 1) / 5`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn node_budget(depth: usize) -> usize {
    // Geometric series 1 + 6 + ... + 6^d.
    (0..=depth).map(|level| BRANCHES.pow(level as u32)).sum()
}

struct Node {
    center: Point,
    size: f32,
    remaining: usize,
    level: usize,
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn render<S: Surface + ?Sized>(
    surface: &mut S,
    palette: &Palette,
    complexity: Complexity,
) -> RenderResult<StyleStats> {
    let (width, height) = (surface.width(), surface.height());
    surface.clear(Color::BLACK);

    let depth = depth_limit(complexity);
    let budget = node_budget(depth);
    let mut stack = vec![Node {
        center: Point::new(width as f32 / 2.0, height as f32 / 2.0),
        size: width.min(height) as f32 * ROOT_RATIO,
        remaining: depth,
        level: 0,
    }];
    let mut nodes = 0;
    let mut max_depth = 0;

    while let Some(node) = stack.pop() {
        if node.remaining == 0 || node.size < MIN_SIZE {
            continue;
        }
        nodes += 1;
        if nodes > budget {
            return Err(RenderError::RecursionBudgetExceeded { nodes, budget });
        }
        max_depth = max_depth.max(node.level);

        let fill = palette.get_wrapped(node.level).with_opacity(FILL_OPACITY);
        let stroke = palette.get_wrapped(node.level + 1);
        surface.draw_ellipse(node.center, node.size, node.size, Paint::Fill(fill));
        surface.draw_ellipse(
            node.center,
            node.size,
            node.size,
            Paint::Stroke {
                color: stroke,
                width: 1.0,
            },
        );

        let distance = node.size * CHILD_DISTANCE;
        for k in 0..BRANCHES {
            let angle = k as f32 * PI / 3.0;
            stack.push(Node {
                center: Point::new(
                    node.center.x + distance * angle.cos(),
                    node.center.y + distance * angle.sin(),
                ),
                size: node.size * CHILD_SCALE,
                remaining: node.remaining - 1,
                level: node.level + 1,
            });
        }
    }

    trace!(nodes, max_depth, depth, "Fractal traversal finished");
    Ok(StyleStats {
        shapes: nodes,
        fractal_nodes: nodes,
        max_depth,
        depth_limit: depth,
        ..StyleStats::default()
    })
}
