//! Rigid bodies
//!
//! A body owns its shape by value. The narrow phase is always handed the
//! owning body alongside the shape, so the shape never needs a pointer back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::math::{cross, cross_sv};

use super::shape::{MassData, Shape};

/// Surface response coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Bounciness (0 = no bounce, 1 = fully elastic)
    pub restitution: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: DEFAULT_RESTITUTION,
            static_friction: DEFAULT_STATIC_FRICTION,
            dynamic_friction: DEFAULT_DYNAMIC_FRICTION,
        }
    }
}

/// Index of a body in its scene
///
/// Bodies are only ever appended, so a handle stays valid for the lifetime
/// of the scene that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

/// A simulated rigid object
#[derive(Debug, Clone)]
pub struct Body {
    /// Replication identity, assigned by the authority (never used for collision)
    pub id: Option<u32>,
    pub shape: Shape,

    // Linear state
    pub position: Vec2,
    pub velocity: Vec2,
    /// Accumulated force, cleared at the end of every step
    pub force: Vec2,

    // Angular state
    /// Orientation in radians
    pub angle: f32,
    pub angular_velocity: f32,
    pub torque: f32,

    // Mass properties (zero inverse = infinite)
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: f32,
    pub inv_inertia: f32,

    pub material: Material,
}

impl Body {
    /// Create a body at `position` with mass derived from the shape at the
    /// default density
    pub fn new(shape: Shape, position: Vec2) -> Self {
        Self::with_density(shape, position, DEFAULT_DENSITY)
    }

    pub fn with_density(mut shape: Shape, position: Vec2, density: f32) -> Self {
        let mass = shape.compute_mass(density);
        shape.set_orient(0.0);

        let mut body = Self {
            id: None,
            shape,
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            material: Material::default(),
        };
        body.set_mass_data(mass);
        body
    }

    pub fn set_mass_data(&mut self, data: MassData) {
        self.mass = data.mass;
        self.inv_mass = data.inv_mass;
        self.inertia = data.inertia;
        self.inv_inertia = data.inv_inertia;
    }

    /// Give the body infinite mass and inertia (floors, replicated bodies)
    pub fn set_static(&mut self) {
        self.inv_mass = 0.0;
        self.inv_inertia = 0.0;
    }

    /// True when the body has infinite mass
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Set the orientation and rebuild the shape's rotation
    pub fn set_angle(&mut self, radians: f32) {
        self.angle = radians;
        self.shape.set_orient(radians);
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Apply an impulse at `contact_arm` (contact point minus center of mass)
    pub fn apply_impulse(&mut self, impulse: Vec2, contact_arm: Vec2) {
        if self.is_static() {
            return;
        }
        self.velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * cross(contact_arm, impulse);
    }

    /// Velocity of the material point at `contact_arm`
    #[inline]
    pub fn velocity_at(&self, contact_arm: Vec2) -> Vec2 {
        self.velocity + cross_sv(self.angular_velocity, contact_arm)
    }

    /// Clear accumulated force and torque
    pub fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}
