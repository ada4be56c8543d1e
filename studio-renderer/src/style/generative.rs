//! Generative: a particle system joined by distance-weighted lines.
//!
//! Connection search compares every unique pair, so it is O(n²). The particle
//! count is `complexity × 20`, capped at 200 by the complexity range, which
//! bounds the search at 19,900 pairs.

use rand::Rng;
use studio_core::{Color, Complexity, Palette};

use super::{pick, StyleStats};
use crate::surface::{Paint, Point, Surface};

/// Particles spawned per complexity step.
pub const PARTICLES_PER_LEVEL: usize = 20;

/// Pairs closer than this are connected.
pub const CONNECTION_DISTANCE: f32 = 100.0;

/// Line width of a zero-length connection.
const MAX_LINE_WIDTH: f32 = 2.0;

/// Connections never go thinner than one pixel, so opacity alone carries the
/// fade with distance.
const MIN_LINE_WIDTH: f32 = 1.0;

/// Largest per-step velocity component.
const MAX_SPEED: f32 = 2.0;

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in pixels.
    pub position: Point,
    /// Per-step displacement.
    pub velocity: Point,
    /// Radius in pixels (1 to 4).
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// A line between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle.
    pub a: usize,
    /// Index of the second particle (always greater than `a`).
    pub b: usize,
    /// Distance between them.
    pub distance: f32,
}

impl Connection {
    /// Strength in `(0, 1]`, falling linearly to zero at
    /// [`CONNECTION_DISTANCE`].
    #[must_use]
    pub fn strength(&self) -> f32 {
        1.0 - self.distance / CONNECTION_DISTANCE
    }
}

/// Spawn `count` particles inside a `width × height` area.
#[allow(clippy::cast_precision_loss)]
pub fn spawn_particles<R: Rng + ?Sized>(
    count: usize,
    width: u32,
    height: u32,
    palette: &Palette,
    rng: &mut R,
) -> Vec<Particle> {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    (0..count)
        .map(|_| Particle {
            position: Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h)),
            velocity: Point::new(
                rng.gen_range(-MAX_SPEED..=MAX_SPEED),
                rng.gen_range(-MAX_SPEED..=MAX_SPEED),
            ),
            radius: rng.gen_range(1.0..=4.0),
            color: pick(palette, rng),
        })
        .collect()
}

/// Move every particle `steps` times, reflecting off the area's edges.
#[allow(clippy::cast_precision_loss)]
pub fn advance(particles: &mut [Particle], steps: usize, width: u32, height: u32) {
    let (w, h) = (width as f32, height as f32);
    for _ in 0..steps {
        for p in particles.iter_mut() {
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            if p.position.x < 0.0 || p.position.x > w {
                p.velocity.x = -p.velocity.x;
                p.position.x = p.position.x.clamp(0.0, w);
            }
            if p.position.y < 0.0 || p.position.y > h {
                p.velocity.y = -p.velocity.y;
                p.position.y = p.position.y.clamp(0.0, h);
            }
        }
    }
}

/// Every unique pair closer than [`CONNECTION_DISTANCE`].
#[must_use]
pub fn connections(particles: &[Particle]) -> Vec<Connection> {
    let mut out = Vec::new();
    for (a, pa) in particles.iter().enumerate() {
        for (offset, pb) in particles[a + 1..].iter().enumerate() {
            let distance = pa.position.distance(&pb.position);
            if distance < CONNECTION_DISTANCE {
                out.push(Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                });
            }
        }
    }
    out
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
    let (width, height) = (surface.width(), surface.height());
    surface.clear(Color::BLACK);

    let mut particles = spawn_particles(
        complexity.as_usize() * PARTICLES_PER_LEVEL,
        width,
        height,
        palette,
        rng,
    );
    advance(&mut particles, complexity.as_usize(), width, height);

    for p in &particles {
        surface.draw_ellipse(p.position, p.radius, p.radius, Paint::Fill(p.color));
    }

    let links = connections(&particles);
    for link in &links {
        draw_connection(surface, &particles[link.a], &particles[link.b], link.strength());
    }

    StyleStats {
        shapes: particles.len(),
        connections: links.len(),
        ..StyleStats::default()
    }
}

/// Stroke one connection in the first particle's color, `strength` opaque.
pub fn draw_connection<S: Surface + ?Sized>(
    surface: &mut S,
    from: &Particle,
    to: &Particle,
    strength: f32,
) {
    surface.draw_line(
        from.position,
        to.position,
        from.color.with_opacity(strength),
        (MAX_LINE_WIDTH * strength).max(MIN_LINE_WIDTH),
    );
}
