//! End-to-end tests for the style engine.

use std::time::{Duration, Instant};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use studio_core::{Color, Complexity, Palette, Style};
use studio_renderer::style::{
    connections, depth_limit, node_budget, spawn_particles, CONNECTION_DISTANCE,
    PARTICLES_PER_LEVEL,
};
use studio_renderer::{GenerationRequest, Raster};

fn five_colors() -> Palette {
    Palette::parse("#ff0000,#00ff00,#0000ff,#ffff00,#ff00ff").expect("palette")
}

#[test]
fn test_geometric_draws_shapes_on_black() {
    let palette = five_colors();
    let mut raster = Raster::new(512, 512);
    let stats = GenerationRequest::new(Style::Geometric, &palette)
        .with_complexity(Complexity::saturating(5))
        .generate(&mut raster)
        .expect("generate");
    assert!(stats.shapes >= 1);
    assert!(raster.count_pixels_not(Color::BLACK) > 0);
}

#[test]
fn test_fractal_at_max_complexity_is_bounded() {
    let palette = five_colors();
    let complexity = Complexity::saturating(10);
    let mut raster = Raster::new(512, 512);

    let started = Instant::now();
    let stats = GenerationRequest::new(Style::Fractal, &palette)
        .with_complexity(complexity)
        .generate(&mut raster)
        .expect("generate");

    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(stats.depth_limit, 8);
    assert!(stats.fractal_nodes <= node_budget(depth_limit(complexity)));
    assert!(stats.fractal_nodes > 0);
}

#[test]
fn test_every_style_at_every_complexity() {
    let palette = Palette::preset("forest").expect("preset");
    for style in Style::ALL {
        for c in [1, 5, 10] {
            let mut raster = Raster::new(120, 80);
            GenerationRequest::new(style, &palette)
                .with_complexity(Complexity::saturating(c))
                .with_seed(Some(c.unsigned_abs()))
                .generate(&mut raster)
                .expect("generate");
        }
    }
}

#[test]
fn test_generative_stats_bounded_by_pair_count() {
    let palette = five_colors();
    let mut raster = Raster::new(512, 512);
    let stats = GenerationRequest::new(Style::Generative, &palette)
        .with_complexity(Complexity::saturating(10))
        .with_seed(Some(2024))
        .generate(&mut raster)
        .expect("generate");
    let n = 10 * PARTICLES_PER_LEVEL;
    assert_eq!(stats.shapes, n);
    assert!(stats.connections <= n * (n - 1) / 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_connections_never_exceed_distance(seed in any::<u64>(), level in 1usize..=10) {
        let palette = five_colors();
        let mut rng = StdRng::seed_from_u64(seed);
        let n = level * PARTICLES_PER_LEVEL;
        let particles = spawn_particles(n, 512, 512, &palette, &mut rng);
        let links = connections(&particles);

        prop_assert!(links.len() <= n * (n - 1) / 2);
        for link in &links {
            prop_assert!(link.a < link.b);
            let d = particles[link.a].position.distance(&particles[link.b].position);
            prop_assert!(d < CONNECTION_DISTANCE);
        }
    }
}
