//! Per-step contact records and the impulse solver

use glam::Vec2;

use crate::math::cross;

use super::body::{Body, BodyHandle};
use super::collision::{self, CollisionResult};

/// Contact between two bodies for a single step
///
/// Holds handles into the scene's body list rather than the bodies
/// themselves, and is discarded at the start of the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifold {
    pub a: BodyHandle,
    pub b: BodyHandle,

    /// Depth of overlap along `normal`
    pub penetration: f32,
    /// Unit normal from `a` toward `b`
    pub normal: Vec2,
    pub points: [Vec2; 2],
    pub contact_count: usize,

    // Combined material
    pub restitution: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
}

impl Manifold {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self {
            a,
            b,
            penetration: 0.0,
            normal: Vec2::ZERO,
            points: [Vec2::ZERO; 2],
            contact_count: 0,
            restitution: 0.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
        }
    }

    /// Run the narrow phase for the pair and store its result
    pub fn solve(&mut self, a: &Body, b: &Body) {
        let CollisionResult {
            normal,
            penetration,
            points,
            contact_count,
        } = collision::collide(a, b);

        self.normal = normal;
        self.penetration = penetration;
        self.points = points;
        self.contact_count = contact_count;
    }

    /// World-space contact points
    #[inline]
    pub fn contacts(&self) -> &[Vec2] {
        &self.points[..self.contact_count]
    }

    #[inline]
    pub fn is_touching(&self) -> bool {
        self.contact_count > 0
    }

    /// Combine materials and decide whether this is a resting contact
    ///
    /// Restitution is dropped for the pair when any contact's relative speed
    /// is below `resting_threshold` (a squared speed), so objects sitting on
    /// the ground stop micro-bouncing.
    pub fn initialize(&mut self, a: &Body, b: &Body, resting_threshold: f32) {
        self.restitution = a.material.restitution.min(b.material.restitution);
        self.static_friction = (a.material.static_friction * b.material.static_friction).sqrt();
        self.dynamic_friction = (a.material.dynamic_friction * b.material.dynamic_friction).sqrt();

        let resting = self.contacts().iter().any(|&contact| {
            let ra = contact - a.position;
            let rb = contact - b.position;
            let rv = b.velocity_at(rb) - a.velocity_at(ra);
            rv.length_squared() < resting_threshold
        });
        if resting {
            self.restitution = 0.0;
        }
    }

    /// One sequential-impulse pass over this manifold's contacts
    ///
    /// A contact that is already separating ends the pass for the whole
    /// manifold. A contact whose tangential impulse comes out exactly zero
    /// only skips its own friction; later contacts are still solved.
    pub fn apply_impulse(&self, a: &mut Body, b: &mut Body) {
        if a.is_static() && b.is_static() {
            infinite_mass_correction(a, b);
            return;
        }

        let count = self.contact_count as f32;

        for &contact in self.contacts() {
            let ra = contact - a.position;
            let rb = contact - b.position;

            let rv = b.velocity_at(rb) - a.velocity_at(ra);
            let contact_vel = rv.dot(self.normal);

            // Already separating
            if contact_vel > 0.0 {
                return;
            }

            let ra_cross_n = cross(ra, self.normal);
            let rb_cross_n = cross(rb, self.normal);
            let inv_mass_sum = a.inv_mass
                + b.inv_mass
                + ra_cross_n * ra_cross_n * a.inv_inertia
                + rb_cross_n * rb_cross_n * b.inv_inertia;

            // Normal impulse, shared across the contacts
            let j = -(1.0 + self.restitution) * contact_vel / inv_mass_sum / count;

            let impulse = self.normal * j;
            a.apply_impulse(-impulse, ra);
            b.apply_impulse(impulse, rb);

            // Friction
            let rv = b.velocity_at(rb) - a.velocity_at(ra);
            let t = (rv - self.normal * rv.dot(self.normal)).normalize_or_zero();

            let jt = -rv.dot(t) / inv_mass_sum / count;
            if jt == 0.0 {
                continue;
            }

            // Coulomb's law
            let tangent_impulse = if jt.abs() < j * self.static_friction {
                t * jt
            } else {
                t * (-j * self.dynamic_friction)
            };

            a.apply_impulse(-tangent_impulse, ra);
            b.apply_impulse(tangent_impulse, rb);
        }
    }

    /// Push the pair apart along the normal by part of the residual overlap
    pub fn positional_correction(&self, a: &mut Body, b: &mut Body, slop: f32, percent: f32) {
        let inv_mass_sum = a.inv_mass + b.inv_mass;
        if inv_mass_sum == 0.0 {
            return;
        }

        let depth = (self.penetration - slop).max(0.0);
        let correction = self.normal * (depth / inv_mass_sum * percent);

        a.position -= correction * a.inv_mass;
        b.position += correction * b.inv_mass;
    }
}

/// Two infinite-mass bodies in contact: stop both
pub fn infinite_mass_correction(a: &mut Body, b: &mut Body) {
    a.velocity = Vec2::ZERO;
    b.velocity = Vec2::ZERO;
}
