//! Collision geometry owned by a body
//!
//! A closed set of shape kinds: the narrow phase dispatches on the ordered
//! pair of kinds, so adding a kind means adding a row and a column to the
//! table in `collision`.

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use super::polygon::Polygon;

/// Discriminant used to index the collision dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Polygon,
}

impl ShapeKind {
    /// Row/column in the dispatch table
    #[inline]
    pub fn index(self) -> usize {
        match self {
            ShapeKind::Circle => 0,
            ShapeKind::Polygon => 1,
        }
    }
}

/// Mass properties derived from a shape and a density
///
/// A zero mass (or inertia) yields a zero inverse, which is how static
/// bodies are represented.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassData {
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: f32,
    pub inv_inertia: f32,
}

impl MassData {
    pub fn new(mass: f32, inertia: f32) -> Self {
        Self {
            mass,
            inv_mass: if mass != 0.0 { 1.0 / mass } else { 0.0 },
            inertia,
            inv_inertia: if inertia != 0.0 { 1.0 / inertia } else { 0.0 },
        }
    }
}

/// A circle centered on its body's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// mass = π·r²·density, inertia = mass·r²
    pub fn compute_mass(&self, density: f32) -> MassData {
        let mass = std::f32::consts::PI * self.radius * self.radius * density;
        MassData::new(mass, mass * self.radius * self.radius)
    }
}

/// Body geometry
#[derive(Debug, Clone)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn circle(radius: f32) -> Self {
        Shape::Circle(Circle::new(radius))
    }

    /// Axis-aligned box with the given half extents
    pub fn boxed(half_width: f32, half_height: f32) -> Self {
        Shape::Polygon(Polygon::from_box(half_width, half_height))
    }

    /// Convex hull of an arbitrary point set
    pub fn polygon(points: &[Vec2]) -> Self {
        Shape::Polygon(Polygon::from_points(points))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Compute mass properties. Polygons re-center their vertices on the
    /// centroid as a side effect.
    pub fn compute_mass(&mut self, density: f32) -> MassData {
        match self {
            Shape::Circle(circle) => circle.compute_mass(density),
            Shape::Polygon(poly) => poly.compute_mass(density),
        }
    }

    /// Rebuild orientation state from the body's angle
    ///
    /// Circles are rotation invariant; the angle lives on the body only.
    pub fn set_orient(&mut self, radians: f32) {
        match self {
            Shape::Circle(_) => {}
            Shape::Polygon(poly) => poly.set_orient(radians),
        }
    }

    /// Orientation matrix (identity for circles)
    pub fn orient(&self) -> Mat2 {
        match self {
            Shape::Circle(_) => Mat2::IDENTITY,
            Shape::Polygon(poly) => poly.orient(),
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(circle) => Some(circle),
            Shape::Polygon(_) => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(poly) => Some(poly),
            Shape::Circle(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circle_mass() {
        let m = Circle::new(2.0).compute_mass(1.0);
        assert!((m.mass - 4.0 * PI).abs() < 1e-4);
        assert!((m.inertia - 16.0 * PI).abs() < 1e-3);
        assert!((m.inv_mass * m.mass - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_density_is_static() {
        let m = Circle::new(1.0).compute_mass(0.0);
        assert_eq!(m.inv_mass, 0.0);
        assert_eq!(m.inv_inertia, 0.0);
    }

    #[test]
    fn test_kind_index() {
        assert_eq!(Shape::circle(1.0).kind().index(), 0);
        assert_eq!(Shape::boxed(1.0, 1.0).kind().index(), 1);
    }

    #[test]
    fn test_circle_ignores_orientation() {
        let mut shape = Shape::circle(1.0);
        shape.set_orient(1.3);
        assert_eq!(shape.orient(), Mat2::IDENTITY);

        let mut shape = Shape::boxed(1.0, 1.0);
        shape.set_orient(1.3);
        assert_ne!(shape.orient(), Mat2::IDENTITY);
    }
}
