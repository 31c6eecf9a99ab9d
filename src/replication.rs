//! Replication requests
//!
//! Plain data a transport collaborator moves between an authority scene and
//! its replicas. Nothing here touches a socket: commands are queued as they
//! arrive and applied between steps, and applying them yields the commands
//! the collaborator should send on.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{EPSILON, MAX_POLY_VERTEX_COUNT};
use crate::math::{cross, dist_sqr};
use crate::sim::{Body, Scene, Shape, ShapeKind, spawn_shape};

/// Which side of the connection a scene is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Owns the simulation and hands out body ids
    Authority,
    /// Mirrors the authority; its bodies are driven by sync only
    Replica,
}

/// Shape geometry as it travels between scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Circle { radius: f32 },
    Box { half_width: f32, half_height: f32 },
    /// Local-space vertices (hull order)
    Polygon { vertices: Vec<Vec2> },
}

impl ShapeDesc {
    pub fn from_shape(shape: &Shape) -> Self {
        match shape {
            Shape::Circle(circle) => ShapeDesc::Circle {
                radius: circle.radius,
            },
            Shape::Polygon(poly) => ShapeDesc::Polygon {
                vertices: poly.vertices().to_vec(),
            },
        }
    }

    /// Build the shape, or `None` if the geometry would violate a
    /// construction precondition
    pub fn build(&self) -> Option<Shape> {
        match self {
            ShapeDesc::Circle { radius } => {
                (radius.is_finite() && *radius > 0.0).then(|| Shape::circle(*radius))
            }
            ShapeDesc::Box {
                half_width,
                half_height,
            } => {
                let valid = half_width.is_finite()
                    && half_height.is_finite()
                    && *half_width > 0.0
                    && *half_height > 0.0;
                valid.then(|| Shape::boxed(*half_width, *half_height))
            }
            ShapeDesc::Polygon { vertices } => {
                polygon_is_buildable(vertices).then(|| Shape::polygon(vertices))
            }
        }
    }
}

/// Vertex count in range, all finite, pairwise distinct and not colinear
fn polygon_is_buildable(points: &[Vec2]) -> bool {
    if !(3..=MAX_POLY_VERTEX_COUNT).contains(&points.len()) {
        return false;
    }
    if !points.iter().all(|p| p.is_finite()) {
        return false;
    }

    for (i, &p) in points.iter().enumerate() {
        if points[i + 1..].iter().any(|&q| dist_sqr(p, q) <= EPSILON) {
            return false;
        }
    }

    let origin = points[0];
    points.iter().enumerate().any(|(i, &p)| {
        points[i + 1..]
            .iter()
            .any(|&q| cross(p - origin, q - origin).abs() > EPSILON)
    })
}

/// A request exchanged between scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneCommand {
    /// User asked for a new body at `position`
    Input { kind: ShapeKind, position: Vec2 },
    /// Authority created body `id`
    Spawn {
        id: u32,
        shape: ShapeDesc,
        position: Vec2,
    },
    /// Authoritative pose for body `id`
    Sync { id: u32, position: Vec2, angle: f32 },
}

/// Commands waiting for the gap between two steps
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<SceneCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: SceneCommand) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain every pending command into `scene`
    ///
    /// Must be called between steps. Returns what should be sent to the
    /// other side: spawns created by the authority, and inputs a replica
    /// forwards to its authority.
    pub fn apply<R: Rng>(
        &mut self,
        scene: &mut Scene,
        role: Role,
        rng: &mut R,
    ) -> Vec<SceneCommand> {
        let mut outbound = Vec::new();
        while let Some(command) = self.pending.pop_front() {
            if let Some(reply) = apply_command(scene, role, rng, command) {
                outbound.push(reply);
            }
        }
        outbound
    }
}

fn apply_command<R: Rng>(
    scene: &mut Scene,
    role: Role,
    rng: &mut R,
    command: SceneCommand,
) -> Option<SceneCommand> {
    match (role, command) {
        (Role::Authority, SceneCommand::Input { kind, position }) => {
            let shape = spawn_shape(rng, kind);
            let (handle, id) = scene.add_body_authority(shape, position);
            // Send the recentered hull, not the raw fan
            let shape = ShapeDesc::from_shape(&scene.body(handle)?.shape);
            log::debug!("Spawned {kind:?} body {id} from input");
            Some(SceneCommand::Spawn {
                id,
                shape,
                position,
            })
        }
        (Role::Replica, command @ SceneCommand::Input { .. }) => Some(command),
        (Role::Replica, SceneCommand::Spawn { id, shape, position }) => {
            if scene.find_body_by_id(id).is_some() {
                log::warn!("Duplicate spawn for body id {id}");
                return None;
            }
            let Some(shape) = shape.build() else {
                log::warn!("Rejected spawn for body id {id}: invalid geometry");
                return None;
            };
            let mut body = Body::new(shape, position);
            body.id = Some(id);
            body.set_static();
            scene.insert_body(body);
            None
        }
        (Role::Replica, SceneCommand::Sync { id, position, angle }) => {
            scene.override_body(id, position, angle);
            None
        }
        (Role::Authority, command) => {
            log::debug!("Authority ignored {command:?}");
            None
        }
    }
}

/// Pose updates for every dynamic body that has a replication id
pub fn sync_commands(scene: &Scene) -> Vec<SceneCommand> {
    scene
        .bodies()
        .iter()
        .filter(|b| !b.is_static())
        .filter_map(|b| {
            b.id.map(|id| SceneCommand::Sync {
                id,
                position: b.position,
                angle: b.angle,
            })
        })
        .collect()
}
