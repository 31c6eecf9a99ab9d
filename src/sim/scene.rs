//! Fixed timestep solver loop
//!
//! The scene owns every body and the current step's manifolds. One call to
//! [`Scene::step`] advances exactly one timestep:
//!
//! 1. Clear last step's manifolds
//! 2. Pairwise narrow phase over every pair with at least one finite mass
//! 3. Integrate forces and gravity into velocities
//! 4. Initialize manifolds (combined material, resting detection)
//! 5. Sequential impulse iterations
//! 6. Integrate velocities into positions and orientations
//! 7. Positional correction
//! 8. Clear accumulated forces

use glam::Vec2;

use crate::settings::SceneConfig;

use super::body::{Body, BodyHandle};
use super::manifold::Manifold;
use super::shape::Shape;

/// A world of rigid bodies stepped at a fixed rate
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    /// Append-only; a body's index is its handle
    bodies: Vec<Body>,
    manifolds: Vec<Manifold>,
    /// Next replication id handed out by `add_body_authority`
    next_id: u32,
    /// Steps taken so far
    pub ticks: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        log::info!(
            "Scene created: gravity=({}, {}), dt={}, iterations={}",
            config.gravity.x,
            config.gravity.y,
            config.dt,
            config.iterations
        );
        Self {
            config,
            bodies: Vec::new(),
            manifolds: Vec::new(),
            next_id: 0,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Advance the simulation by one fixed timestep
    pub fn step(&mut self) {
        let dt = self.config.dt;
        let gravity = self.config.gravity;

        self.manifolds.clear();

        // Narrow phase over all pairs, in index order
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let a = &self.bodies[i];
                let b = &self.bodies[j];
                if a.is_static() && b.is_static() {
                    continue;
                }

                let mut m = Manifold::new(BodyHandle(i), BodyHandle(j));
                m.solve(a, b);
                if m.is_touching() {
                    self.manifolds.push(m);
                }
            }
        }

        for body in &mut self.bodies {
            integrate_forces(body, gravity, dt);
        }

        let resting_threshold = self.config.resting_threshold();
        for m in &mut self.manifolds {
            m.initialize(&self.bodies[m.a.0], &self.bodies[m.b.0], resting_threshold);
        }

        for _ in 0..self.config.iterations {
            for m in &self.manifolds {
                let (a, b) = pair_mut(&mut self.bodies, m.a, m.b);
                m.apply_impulse(a, b);
            }
        }

        for body in &mut self.bodies {
            integrate_velocity(body, dt);
        }

        let slop = self.config.penetration_slop;
        let percent = self.config.correction_percent;
        for m in &self.manifolds {
            let (a, b) = pair_mut(&mut self.bodies, m.a, m.b);
            m.positional_correction(a, b, slop, percent);
        }

        for body in &mut self.bodies {
            body.clear_forces();
        }

        self.ticks += 1;
        log::trace!(
            "tick {}: {} bodies, {} manifolds",
            self.ticks,
            self.bodies.len(),
            self.manifolds.len()
        );
    }

    /// Add a body with no replication id
    pub fn add_body(&mut self, shape: Shape, position: Vec2) -> BodyHandle {
        self.insert_body(Body::new(shape, position))
    }

    /// Add a body and assign it the next replication id
    pub fn add_body_authority(&mut self, shape: Shape, position: Vec2) -> (BodyHandle, u32) {
        let id = self.next_id;
        self.next_id += 1;

        let mut body = Body::new(shape, position);
        body.id = Some(id);
        (self.insert_body(body), id)
    }

    /// Add a fully built body. Must not be called mid-step.
    pub fn insert_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len());
        log::debug!(
            "Body {} added: {:?} at ({}, {}), id={:?}",
            handle.0,
            body.shape.kind(),
            body.position.x,
            body.position.y,
            body.id
        );
        self.bodies.push(body);
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    pub fn find_body_by_id(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == Some(id))
    }

    pub fn find_body_by_id_mut(&mut self, id: u32) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == Some(id))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Manifolds produced by the most recent step
    pub fn manifolds(&self) -> &[Manifold] {
        &self.manifolds
    }

    /// Apply authoritative state to a body: position, orientation, and a
    /// zeroed velocity. Returns false if no body carries `id`.
    pub fn override_body(&mut self, id: u32, position: Vec2, angle: f32) -> bool {
        let Some(body) = self.find_body_by_id_mut(id) else {
            log::warn!("Override for unknown body id {id}");
            return false;
        };
        body.position = position;
        body.set_angle(angle);
        body.velocity = Vec2::ZERO;
        true
    }
}

/// Semi-implicit Euler, velocity half
fn integrate_forces(body: &mut Body, gravity: Vec2, dt: f32) {
    if body.is_static() {
        return;
    }
    body.velocity += (body.force * body.inv_mass + gravity) * dt;
    body.angular_velocity += body.torque * body.inv_inertia * dt;
}

/// Semi-implicit Euler, position half
fn integrate_velocity(body: &mut Body, dt: f32) {
    if body.is_static() {
        return;
    }
    body.position += body.velocity * dt;
    let angle = body.angle + body.angular_velocity * dt;
    body.set_angle(angle);
}

/// Mutable access to two distinct bodies
fn pair_mut(bodies: &mut [Body], a: BodyHandle, b: BodyHandle) -> (&mut Body, &mut Body) {
    assert_ne!(a, b, "manifold pairs a body with itself");
    if a.0 < b.0 {
        let (left, right) = bodies.split_at_mut(b.0);
        (&mut left[a.0], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(a.0);
        (&mut right[0], &mut left[b.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn floor_scene() -> (Scene, BodyHandle) {
        let mut scene = Scene::default();
        let floor = scene.add_body(Shape::boxed(20.0, 1.0), Vec2::new(0.0, -1.0));
        scene.body_mut(floor).unwrap().set_static();
        (scene, floor)
    }

    #[test]
    fn test_free_fall() {
        let mut scene = Scene::default();
        let ball = scene.add_body(Shape::circle(1.0), Vec2::ZERO);
        scene.step();

        let body = scene.body(ball).unwrap();
        let dt = SceneConfig::default().dt;
        assert!((body.velocity.y + 10.0 * dt).abs() < 1e-6);
        // Velocity is integrated before position
        assert!((body.position.y + 10.0 * dt * dt).abs() < 1e-6);
        assert_eq!(scene.ticks, 1);
    }

    #[test]
    fn test_forces_cleared_after_step() {
        let mut scene = Scene::new(SceneConfig {
            gravity: Vec2::ZERO,
            ..Default::default()
        });
        let ball = scene.add_body(Shape::circle(1.0), Vec2::ZERO);
        scene.body_mut(ball).unwrap().apply_force(Vec2::new(60.0, 0.0));
        scene.step();
        let vx = scene.body(ball).unwrap().velocity.x;
        assert!(vx > 0.0);
        assert_eq!(scene.body(ball).unwrap().force, Vec2::ZERO);

        scene.step();
        assert_eq!(scene.body(ball).unwrap().velocity.x, vx);
    }

    #[test]
    fn test_box_settles_on_floor() {
        let (mut scene, floor) = floor_scene();
        let crate_box = scene.add_body(Shape::boxed(2.0, 2.0), Vec2::new(0.0, 4.0));
        scene.body_mut(crate_box).unwrap().material.restitution = 0.0;

        for _ in 0..600 {
            scene.step();
        }

        let body = scene.body(crate_box).unwrap();
        // Floor top is y = 0, box bottom is y - 2
        let overlap = 2.0 - body.position.y;
        assert!(overlap <= 0.05 + 1e-3, "overlap {overlap}");
        assert!(overlap > -0.01, "box floating at {}", body.position.y);
        assert!(body.velocity.y.abs() < 0.1, "vy {}", body.velocity.y);

        let floor = scene.body(floor).unwrap();
        assert_eq!(floor.position, Vec2::new(0.0, -1.0));
        assert_eq!(floor.velocity, Vec2::ZERO);
        assert!(!scene.manifolds().is_empty());
    }

    #[test]
    fn test_static_pairs_skip_narrow_phase() {
        let mut scene = Scene::default();
        let a = scene.add_body(Shape::boxed(1.0, 1.0), Vec2::ZERO);
        let b = scene.add_body(Shape::boxed(1.0, 1.0), Vec2::new(0.5, 0.0));
        scene.body_mut(a).unwrap().set_static();
        scene.body_mut(b).unwrap().set_static();
        scene.step();
        assert!(scene.manifolds().is_empty());
    }

    #[test]
    fn test_authority_ids_increase() {
        let mut scene = Scene::default();
        let (_, first) = scene.add_body_authority(Shape::circle(1.0), Vec2::ZERO);
        let (h, second) = scene.add_body_authority(Shape::circle(1.0), Vec2::X);
        scene.add_body(Shape::circle(1.0), Vec2::Y);

        assert_eq!((first, second), (0, 1));
        assert_eq!(scene.find_body_by_id(1).unwrap().position, Vec2::X);
        assert_eq!(scene.body(h).unwrap().id, Some(1));
        assert!(scene.find_body_by_id(2).is_none());
    }

    #[test]
    fn test_override_body() {
        let mut scene = Scene::default();
        let (h, id) = scene.add_body_authority(Shape::boxed(1.0, 1.0), Vec2::ZERO);
        scene.body_mut(h).unwrap().velocity = Vec2::new(3.0, 3.0);

        assert!(scene.override_body(id, Vec2::new(5.0, 6.0), 0.5));
        let body = scene.body(h).unwrap();
        assert_eq!(body.position, Vec2::new(5.0, 6.0));
        assert_eq!(body.angle, 0.5);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.shape.orient(), crate::math::rotation(0.5));

        assert!(!scene.override_body(99, Vec2::ZERO, 0.0));
    }

    #[test]
    fn test_steps_are_deterministic() {
        let build = || {
            let (mut scene, _) = floor_scene();
            scene.add_body(Shape::circle(0.6), Vec2::new(0.3, 3.0));
            scene.add_body(Shape::boxed(0.5, 0.8), Vec2::new(-0.2, 5.0));
            scene.add_body(
                Shape::polygon(&[Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.2), Vec2::new(0.0, 1.0)]),
                Vec2::new(0.1, 7.0),
            );
            scene
        };

        let mut a = build();
        let mut b = build();
        for _ in 0..240 {
            a.step();
            b.step();
        }
        for (x, y) in a.bodies().iter().zip(b.bodies()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.angle, y.angle);
        }
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut bodies = vec![
            Body::new(Shape::circle(1.0), Vec2::ZERO),
            Body::new(Shape::circle(2.0), Vec2::X),
        ];
        let (a, b) = pair_mut(&mut bodies, BodyHandle(1), BodyHandle(0));
        assert_eq!(a.position, Vec2::X);
        assert_eq!(b.position, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_static_body_never_moves(
            x in -3.0f32..3.0,
            y in -1.0f32..4.0,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            radius in 0.1f32..2.0,
        ) {
            let (mut scene, floor) = floor_scene();
            let ball = scene.add_body(Shape::circle(radius), Vec2::new(x, y));
            scene.body_mut(ball).unwrap().velocity = Vec2::new(vx, vy);

            for _ in 0..30 {
                scene.step();
                let body = scene.body(floor).unwrap();
                prop_assert_eq!(body.position, Vec2::new(0.0, -1.0));
                prop_assert_eq!(body.velocity, Vec2::ZERO);
                prop_assert_eq!(body.angle, 0.0);
            }
        }
    }
}
