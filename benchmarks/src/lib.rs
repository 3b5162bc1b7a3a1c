//! Shared setup for the benchmarks.

use glam::Vec3;
use rebound::terrain::generate;
use rebound::{BodyVariant, Heightfield, PhysicsConfig, Scene, Simulator};

/// Rolling square terrain with `n` samples per side.
pub fn rolling_field(n: usize) -> Heightfield {
    Heightfield::new(generate::rolling(n, n, 3.0, 20.0), 3.0)
        .unwrap_or_else(|err| panic!("benchmark terrain {n}x{n}: {err}"))
}

/// Deterministic query points spread over the terrain interior.
pub fn query_points(field: &Heightfield, count: usize) -> Vec<(f32, f32)> {
    let bounds = field.bounds();
    let (w, h) = (bounds.max_x - bounds.min_x, bounds.max_y - bounds.min_y);
    // Golden-ratio low-discrepancy sequence
    let step = 0.618_034_f32;
    (0..count)
        .map(|i| {
            let u = (i as f32 * step).fract();
            let v = (i as f32 * step * step).fract();
            (bounds.min_x + u * w, bounds.min_y + v * h)
        })
        .collect()
}

/// Procedural scene on the rolling terrain with the given body.
pub fn rolling_simulator(variant: BodyVariant) -> Simulator {
    let config = PhysicsConfig::default().launch(Vec3::new(0.0, 0.0, 10.0), Vec3::new(2.0, 1.0, 0.0));
    let mut sim = Scene::procedural(config).unwrap_or_else(|err| panic!("procedural scene: {err}"));
    sim.select_terrain_by_name("rollingland")
        .unwrap_or_else(|err| panic!("rolling terrain: {err}"));
    if sim.variant() != variant {
        sim.switch_variant();
    }
    sim
}
