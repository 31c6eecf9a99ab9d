//! Impulse 2D - a small rigid-body engine for circles and convex polygons
//!
//! Core modules:
//! - `math`: Vector/rotation helpers on top of glam
//! - `sim`: Deterministic simulation (shapes, bodies, narrow phase, solver loop)
//! - `replication`: Spawn/sync requests applied between steps
//! - `settings`: Data-driven scene configuration

pub mod error;
pub mod math;
pub mod replication;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::SceneConfig;
pub use sim::{Body, BodyHandle, Manifold, Scene, Shape, ShapeKind};

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Impulse iterations per step
    pub const SOLVER_ITERATIONS: u32 = 10;

    /// Small threshold used for "inside" tests and resting-contact detection
    pub const EPSILON: f32 = 0.0001;

    /// Default gravity (world units/s²)
    pub const GRAVITY_X: f32 = 0.0;
    pub const GRAVITY_Y: f32 = -10.0;

    /// Penetration allowed before positional correction kicks in
    pub const PENETRATION_SLOP: f32 = 0.05;
    /// Fraction of the remaining penetration removed per step
    pub const CORRECTION_PERCENT: f32 = 0.4;

    /// Polygon vertex capacity
    pub const MAX_POLY_VERTEX_COUNT: usize = 64;

    /// Density used when a body computes its own mass
    pub const DEFAULT_DENSITY: f32 = 1.0;

    /// Material defaults
    pub const DEFAULT_STATIC_FRICTION: f32 = 0.5;
    pub const DEFAULT_DYNAMIC_FRICTION: f32 = 0.3;
    pub const DEFAULT_RESTITUTION: f32 = 0.5;

    /// Reference-face selection bias (polygon vs polygon)
    pub const REFERENCE_BIAS_RELATIVE: f32 = 0.95;
    pub const REFERENCE_BIAS_ABSOLUTE: f32 = 0.01;
}
