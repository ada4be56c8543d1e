//! Geometry projector: maps a primitive and a transform to 2D line segments.
//!
//! Mesh primitives are rotated (Y then X), scaled to the canvas, and given a
//! simple perspective divide. Parametric primitives skip all of that and are
//! drawn as screen-space approximations that honour scale, zoom, translation
//! and the Y rotation (as an in-plane spin); X and Z rotation do not affect
//! them.
//!
//! ```text
//!   local [-1,1]^3 ──rotate Y──► rotate X ──► × scale·zoom·min(w,h)·0.3
//!                                                   │
//!        screen ◄── + centre + translation ◄── × 1/(1 − z/1000), ≤ 10
//! ```

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use studio_core::{Color, ParametricShape, Primitive, PrimitiveKind, Rotation, Transform, Vec3};

use crate::raster::ellipse_points;
use crate::surface::{Point, Surface};
use crate::{RenderError, RenderResult};

/// Fraction of the smaller canvas dimension a unit vertex spans.
pub const PROJECTION_SCALE: f32 = 0.3;

/// Distance of the eye from the projection plane.
pub const PERSPECTIVE_DISTANCE: f32 = 1000.0;

/// Upper bound on the perspective factor.
pub const MAX_PERSPECTIVE: f32 = 10.0;

/// Vertical squash applied to ellipses that stand for horizontal circles.
const FORESHORTEN: f32 = 0.3;

/// Latitude rings drawn inside a sphere outline.
const SPHERE_RINGS: usize = 5;

/// Meridians drawn on a sphere.
const SPHERE_MERIDIANS: usize = 4;

/// Tube cross-sections drawn on a torus.
const TORUS_SECTIONS: usize = 8;

/// Points on the star.
const STAR_POINTS: usize = 5;

/// Inner radius of the star relative to its outer radius.
const STAR_INNER_RATIO: f32 = 0.4;

/// A stroked 2D line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Stroke color.
    pub color: Color,
}

/// Rotate a vertex around Y, then around X. Angles are in degrees.
#[must_use]
pub fn rotate_vertex(v: Vec3, rotation: Rotation) -> Vec3 {
    let (sin_y, cos_y) = rotation.y.to_radians().sin_cos();
    let (sin_x, cos_x) = rotation.x.to_radians().sin_cos();

    let x1 = v.x * cos_y - v.z * sin_y;
    let z1 = v.x * sin_y + v.z * cos_y;

    let y2 = v.y * cos_x - z1 * sin_x;
    let z2 = v.y * sin_x + z1 * cos_x;

    Vec3::new(x1, y2, z2)
}

/// Perspective factor for a depth, always finite and in `(0, MAX_PERSPECTIVE]`.
#[must_use]
pub fn perspective_factor(z: f32) -> f32 {
    let denom = 1.0 - z / PERSPECTIVE_DISTANCE;
    if denom <= 1.0 / MAX_PERSPECTIVE {
        return MAX_PERSPECTIVE;
    }
    // f32::min drops NaN, so a NaN depth also lands on the clamp.
    (1.0 / denom).min(MAX_PERSPECTIVE)
}

/// Pixels spanned by one local unit for this transform and canvas.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn unit_scale(transform: &Transform, canvas: (u32, u32)) -> f32 {
    let min_side = canvas.0.min(canvas.1) as f32;
    transform.scale() * transform.zoom() * min_side * PROJECTION_SCALE
}

#[allow(clippy::cast_precision_loss)]
fn screen_origin(transform: &Transform, canvas: (u32, u32)) -> Point {
    let (tx, ty) = transform.translation();
    Point::new(canvas.0 as f32 / 2.0 + tx, canvas.1 as f32 / 2.0 + ty)
}

/// Project a list of local vertices to screen space.
#[must_use]
pub fn project_vertices(vertices: &[Vec3], transform: &Transform, canvas: (u32, u32)) -> Vec<Point> {
    let scale = unit_scale(transform, canvas);
    let origin = screen_origin(transform, canvas);
    let rotation = transform.rotation();
    vertices
        .iter()
        .map(|&v| {
            let r = rotate_vertex(v, rotation).scale(scale);
            let factor = perspective_factor(r.z);
            Point::new(r.x * factor + origin.x, r.y * factor + origin.y)
        })
        .collect()
}

/// Project a primitive to stroked segments.
///
/// # Errors
///
/// Returns [`RenderError::MalformedPrimitive`] if a mesh has no geometry or an
/// edge references a missing vertex.
pub fn project(
    primitive: &Primitive,
    transform: &Transform,
    canvas: (u32, u32),
) -> RenderResult<Vec<Segment>> {
    primitive
        .validate()
        .map_err(|e| RenderError::MalformedPrimitive(e.to_string()))?;

    match &primitive.kind {
        PrimitiveKind::Mesh { vertices, edges } => {
            let projected = project_vertices(vertices, transform, canvas);
            Ok(edges
                .iter()
                .map(|&(a, b)| Segment {
                    from: projected[a],
                    to: projected[b],
                    color: primitive.color,
                })
                .collect())
        }
        PrimitiveKind::Parametric { shape } => {
            Ok(parametric_segments(*shape, primitive.color, transform, canvas))
        }
    }
}

/// Stroke segments onto a surface.
pub fn draw_segments<S: Surface + ?Sized>(surface: &mut S, segments: &[Segment], line_width: f32) {
    for segment in segments {
        surface.draw_line(segment.from, segment.to, segment.color, line_width);
    }
}

#[allow(clippy::cast_precision_loss)]
fn parametric_segments(
    shape: ParametricShape,
    color: Color,
    transform: &Transform,
    canvas: (u32, u32),
) -> Vec<Segment> {
    let r = unit_scale(transform, canvas);
    let c = screen_origin(transform, canvas);
    let spin = transform.rotation().y.to_radians();
    let mut out = Vec::new();

    match shape {
        ParametricShape::Sphere => {
            outline(&mut out, &ellipse_points(c, r, r), color);
            for i in 1..=SPHERE_RINGS {
                let lat = -FRAC_PI_2 + i as f32 * PI / (SPHERE_RINGS + 1) as f32;
                let rx = r * lat.cos();
                let center = Point::new(c.x, c.y + r * lat.sin());
                outline(&mut out, &ellipse_points(center, rx, rx * FORESHORTEN), color);
            }
            for k in 0..SPHERE_MERIDIANS {
                let angle = spin + k as f32 * FRAC_PI_4;
                outline(&mut out, &ellipse_points(c, r * angle.cos().abs(), r), color);
            }
        }
        ParametricShape::Cylinder => {
            let ry = r * FORESHORTEN;
            let top = Point::new(c.x, c.y - r);
            let bottom = Point::new(c.x, c.y + r);
            outline(&mut out, &ellipse_points(top, r, ry), color);
            outline(&mut out, &ellipse_points(bottom, r, ry), color);
            for side in [-r, r] {
                out.push(Segment {
                    from: Point::new(c.x + side, top.y),
                    to: Point::new(c.x + side, bottom.y),
                    color,
                });
            }
            let seam_x = c.x + r * spin.sin();
            let seam_dy = ry * spin.cos();
            out.push(Segment {
                from: Point::new(seam_x, top.y + seam_dy),
                to: Point::new(seam_x, bottom.y + seam_dy),
                color,
            });
        }
        ParametricShape::Torus => {
            let ring = r * 0.7;
            let tube = r * 0.3;
            let outer = ring + tube;
            let inner = ring - tube;
            outline(&mut out, &ellipse_points(c, outer, outer * 0.5), color);
            outline(&mut out, &ellipse_points(c, inner, inner * 0.5), color);
            for k in 0..TORUS_SECTIONS {
                let angle = spin + k as f32 * TAU / TORUS_SECTIONS as f32;
                let center = Point::new(c.x + ring * angle.cos(), c.y + ring * 0.5 * angle.sin());
                let rx = tube * angle.sin().abs().max(0.2);
                outline(&mut out, &ellipse_points(center, rx, tube * 0.5), color);
            }
        }
        ParametricShape::Star => {
            let points: Vec<Point> = (0..STAR_POINTS * 2)
                .map(|k| {
                    let radius = if k % 2 == 0 { r } else { r * STAR_INNER_RATIO };
                    let angle = spin - FRAC_PI_2 + k as f32 * PI / STAR_POINTS as f32;
                    Point::new(c.x + radius * angle.cos(), c.y + radius * angle.sin())
                })
                .collect();
            outline(&mut out, &points, color);
        }
    }
    out
}

/// Append a closed polyline as segments.
fn outline(out: &mut Vec<Segment>, points: &[Point], color: Color) {
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        out.push(Segment { from, to, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_identity_projection_of_cube_corner() {
        let transform = Transform::new();
        let points = project_vertices(&[Vec3::new(1.0, 1.0, 0.0)], &transform, (100, 100));
        // unit = 1 * 1 * 100 * 0.3 = 30; z = 0 -> factor 1
        assert!(close(points[0], Point::new(80.0, 80.0)), "{:?}", points[0]);
    }

    #[test]
    fn test_rotate_y_90_moves_x_into_z() {
        let v = rotate_vertex(Vec3::new(1.0, 0.0, 0.0), Rotation::new(0.0, 90.0, 0.0));
        assert!(v.x.abs() < 1e-5);
        assert!((v.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_order_is_y_then_x() {
        // Y first sends x into z, then X sends that z into -y.
        let v = rotate_vertex(Vec3::new(1.0, 0.0, 0.0), Rotation::new(90.0, 90.0, 0.0));
        assert!((v.y + 1.0).abs() < 1e-5, "{v:?}");
        assert!(v.z.abs() < 1e-5);
    }

    #[test]
    fn test_perspective_factor_clamped() {
        assert!((perspective_factor(0.0) - 1.0).abs() < f32::EPSILON);
        assert!((perspective_factor(1000.0) - MAX_PERSPECTIVE).abs() < f32::EPSILON);
        assert!((perspective_factor(999.999) - MAX_PERSPECTIVE).abs() < f32::EPSILON);
        assert!((perspective_factor(5000.0) - MAX_PERSPECTIVE).abs() < f32::EPSILON);
        assert!(perspective_factor(-1000.0) < 1.0);
        assert!(perspective_factor(f32::NAN).is_finite());
    }

    #[test]
    fn test_cube_projects_twelve_segments() {
        let segments = project(&Primitive::cube(), &Transform::new(), (512, 512)).expect("cube");
        assert_eq!(segments.len(), 12);
        assert!(segments.iter().all(|s| s.color == Primitive::cube().color));
    }

    #[test]
    fn test_malformed_primitive_is_reported() {
        let bad = Primitive::mesh("bad", "Bad", Color::WHITE, vec![Vec3::zero()], vec![(0, 3)]);
        let result = project(&bad, &Transform::new(), (100, 100));
        assert!(matches!(result, Err(RenderError::MalformedPrimitive(_))));
    }

    #[test]
    fn test_parametric_ignores_x_rotation() {
        let star = Primitive::builtin("star").expect("star");
        let base = project(&star, &Transform::new(), (200, 200)).expect("base");
        let tilted = project(&star, &Transform::new().with_rotation(45.0, 0.0, 30.0), (200, 200))
            .expect("tilted");
        assert_eq!(base, tilted);
    }

    #[test]
    fn test_all_parametric_shapes_produce_segments() {
        for id in ["sphere", "cylinder", "torus", "star"] {
            let primitive = Primitive::builtin(id).expect("builtin");
            let segments = project(&primitive, &Transform::new(), (300, 200)).expect("project");
            assert!(!segments.is_empty(), "{id}");
            assert!(segments
                .iter()
                .all(|s| s.from.x.is_finite() && s.to.y.is_finite()));
        }
    }

    #[test]
    fn test_translation_and_zoom() {
        let t = Transform::new().with_translation(10.0, -5.0).with_zoom(2.0);
        let p = project_vertices(&[Vec3::new(1.0, 0.0, 0.0)], &t, (100, 100));
        // unit = 1 * 2 * 100 * 0.3 = 60
        assert!(close(p[0], Point::new(120.0, 45.0)), "{:?}", p[0]);
    }
}
