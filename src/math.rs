//! 2D vector and rotation helpers
//!
//! Vectors and matrices are glam's `Vec2`/`Mat2`. glam already covers dot,
//! length, `normalize_or_zero`, the in-place `+=`/`-=`/`*=` operators,
//! matrix-vector and matrix-matrix products and transpose. What it lacks is
//! the 2D cross-product family the solver is written in terms of.

use glam::{Mat2, Vec2};

/// 2D cross product of two vectors (the z of the 3D cross), `a.x*b.y - a.y*b.x`
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Cross of a scalar (z-axis angular quantity) with a vector: `s × v`
#[inline]
pub fn cross_sv(s: f32, v: Vec2) -> Vec2 {
    Vec2::new(-s * v.y, s * v.x)
}

/// Cross of a vector with a scalar: `v × s`
#[inline]
pub fn cross_vs(v: Vec2, s: f32) -> Vec2 {
    Vec2::new(s * v.y, -s * v.x)
}

/// Pure rotation matrix for an angle in radians
///
/// Multiplying a local vector by this maps it into world orientation; its
/// transpose maps world vectors back.
#[inline]
pub fn rotation(radians: f32) -> Mat2 {
    Mat2::from_angle(radians)
}

/// Local point to world space: `u * local + position`
#[inline]
pub fn to_world(u: Mat2, position: Vec2, local: Vec2) -> Vec2 {
    u * local + position
}

/// World point to local space: `uᵀ * (world - position)`
#[inline]
pub fn to_local(u: Mat2, position: Vec2, world: Vec2) -> Vec2 {
    u.transpose() * (world - position)
}

/// Squared distance between two points
#[inline]
pub fn dist_sqr(a: Vec2, b: Vec2) -> f32 {
    (b - a).length_squared()
}

/// Reflect a vector off a surface: `v - 2(v·n)n`
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Outward normal of the edge `from -> to` for CCW winding (unit length, or zero for a degenerate edge)
#[inline]
pub fn edge_normal(from: Vec2, to: Vec2) -> Vec2 {
    let face = to - from;
    Vec2::new(face.y, -face.x).normalize_or_zero()
}
