//! Deterministic simulation module
//!
//! This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body index)
//! - No rendering or transport dependencies

pub mod body;
pub mod collision;
pub mod manifold;
pub mod polygon;
pub mod scene;
pub mod shape;
pub mod spawn;

pub use body::{Body, BodyHandle, Material};
pub use collision::{
    CollisionResult, circle_to_circle, circle_to_polygon, collide, polygon_to_circle,
    polygon_to_polygon,
};
pub use manifold::Manifold;
pub use polygon::Polygon;
pub use scene::Scene;
pub use shape::{Circle, MassData, Shape, ShapeKind};
pub use spawn::{random_polygon, spawn_shape};
