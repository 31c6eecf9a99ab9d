//! Deterministic shape generation
//!
//! Randomness always comes from a caller-supplied RNG so a seeded `Pcg32`
//! reproduces the exact same vertex sets.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;

use crate::consts::MAX_POLY_VERTEX_COUNT;

use super::polygon::Polygon;
use super::shape::{Shape, ShapeKind};

/// Radius of circles spawned from input
pub const SPAWN_CIRCLE_RADIUS: f32 = 0.6;
/// Vertex count range for polygons spawned from input
pub const SPAWN_POLY_VERTICES: RangeInclusive<usize> = 3..=5;
/// Circumradius range for polygons spawned from input
pub const SPAWN_POLY_RADIUS: RangeInclusive<f32> = 0.5..=1.0;

/// Random convex polygon
///
/// Vertices sit at evenly spaced angles around the origin, each at a random
/// distance; the hull of that fan becomes the polygon.
pub fn random_polygon<R: Rng>(
    rng: &mut R,
    vertex_range: RangeInclusive<usize>,
    radius_range: RangeInclusive<f32>,
) -> Polygon {
    assert!(
        *vertex_range.start() >= 3 && *vertex_range.end() <= MAX_POLY_VERTEX_COUNT,
        "vertex range must lie within [3, {MAX_POLY_VERTEX_COUNT}]"
    );
    assert!(*radius_range.start() > 0.0, "polygon radius must be positive");

    let count = rng.random_range(vertex_range);
    let step = TAU / count as f32;

    let points: Vec<Vec2> = (0..count)
        .map(|i| {
            let radius = rng.random_range(radius_range.clone());
            let angle = step * i as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect();

    Polygon::from_points(&points)
}

/// Shape for an input-driven spawn of the given kind
pub fn spawn_shape<R: Rng>(rng: &mut R, kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::Circle => Shape::circle(SPAWN_CIRCLE_RADIUS),
        ShapeKind::Polygon => {
            Shape::Polygon(random_polygon(rng, SPAWN_POLY_VERTICES, SPAWN_POLY_RADIUS))
        }
    }
}
