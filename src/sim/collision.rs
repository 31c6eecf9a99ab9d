//! Narrow-phase collision detection
//!
//! The hard part of the engine: exact contact generation for every ordered
//! pair of shape kinds. Circles use a direct distance test, circle/polygon
//! finds the least-penetrated face and then the Voronoi region of the circle
//! center, and polygon/polygon runs SAT on both polygons' face normals
//! followed by reference/incident face clipping.
//!
//! Every routine reports a normal pointing from the first shape toward the
//! second.

use glam::Vec2;

use crate::consts::{EPSILON, REFERENCE_BIAS_ABSOLUTE, REFERENCE_BIAS_RELATIVE};
use crate::math::{dist_sqr, to_local, to_world};

use super::body::Body;
use super::polygon::Polygon;
use super::shape::{Circle, Shape};

/// Result of a narrow-phase test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Unit contact normal, from the first shape toward the second
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub penetration: f32,
    /// World-space contact points (first `contact_count` are valid)
    pub points: [Vec2; 2],
    pub contact_count: usize,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            normal: Vec2::ZERO,
            penetration: 0.0,
            points: [Vec2::ZERO; 2],
            contact_count: 0,
        }
    }

    fn single(normal: Vec2, penetration: f32, point: Vec2) -> Self {
        Self {
            normal,
            penetration,
            points: [point, Vec2::ZERO],
            contact_count: 1,
        }
    }

    #[inline]
    pub fn hit(&self) -> bool {
        self.contact_count > 0
    }

    #[inline]
    pub fn contacts(&self) -> &[Vec2] {
        &self.points[..self.contact_count]
    }
}

/// Run the narrow phase for two bodies, dispatching on their shape kinds
pub fn collide(a: &Body, b: &Body) -> CollisionResult {
    match (&a.shape, &b.shape) {
        (Shape::Circle(ca), Shape::Circle(cb)) => circle_to_circle(a.position, ca, b.position, cb),
        (Shape::Circle(ca), Shape::Polygon(pb)) => {
            circle_to_polygon(a.position, ca, b.position, pb)
        }
        (Shape::Polygon(pa), Shape::Circle(cb)) => {
            polygon_to_circle(a.position, pa, b.position, cb)
        }
        (Shape::Polygon(pa), Shape::Polygon(pb)) => {
            polygon_to_polygon(a.position, pa, b.position, pb)
        }
    }
}

/// Circle vs circle
pub fn circle_to_circle(pos_a: Vec2, a: &Circle, pos_b: Vec2, b: &Circle) -> CollisionResult {
    let d = pos_b - pos_a;
    let dist_sqr = d.length_squared();
    let radius = a.radius + b.radius;

    if dist_sqr >= radius * radius {
        return CollisionResult::miss();
    }

    let distance = dist_sqr.sqrt();
    if distance == 0.0 {
        // Coincident centers: any normal will do
        return CollisionResult::single(Vec2::X, a.radius, pos_a);
    }

    let normal = d / distance;
    CollisionResult::single(normal, radius - distance, pos_a + normal * a.radius)
}

/// Circle vs polygon
///
/// Works in the polygon's local frame: the circle center is moved there,
/// the face of least penetration is found, and the center is classified
/// against that face's two vertices.
pub fn circle_to_polygon(pos_a: Vec2, a: &Circle, pos_b: Vec2, b: &Polygon) -> CollisionResult {
    let radius = a.radius;
    let u = b.orient();
    let center = to_local(u, pos_b, pos_a);

    let mut separation = f32::MIN;
    let mut face = 0;
    for (i, (&n, &v)) in b.normals().iter().zip(b.vertices()).enumerate() {
        let s = n.dot(center - v);
        if s > radius {
            return CollisionResult::miss();
        }
        if s > separation {
            separation = s;
            face = i;
        }
    }

    let v1 = b.vertex(face);
    let v2 = b.vertex(b.next_index(face));

    // Center inside the polygon
    if separation < EPSILON {
        let normal = -(u * b.normal(face));
        return CollisionResult::single(normal, radius, pos_a + normal * radius);
    }

    let dot1 = (center - v1).dot(v2 - v1);
    let dot2 = (center - v2).dot(v1 - v2);
    let penetration = radius - separation;

    if dot1 <= 0.0 {
        // Closest to v1
        if dist_sqr(center, v1) > radius * radius {
            return CollisionResult::miss();
        }
        let normal = (u * (v1 - center)).normalize_or_zero();
        CollisionResult::single(normal, penetration, to_world(u, pos_b, v1))
    } else if dot2 <= 0.0 {
        // Closest to v2
        if dist_sqr(center, v2) > radius * radius {
            return CollisionResult::miss();
        }
        let normal = (u * (v2 - center)).normalize_or_zero();
        CollisionResult::single(normal, penetration, to_world(u, pos_b, v2))
    } else {
        // Closest to the face itself
        let n = b.normal(face);
        if (center - v1).dot(n) > radius {
            return CollisionResult::miss();
        }
        let normal = -(u * n);
        CollisionResult::single(normal, penetration, pos_a + normal * radius)
    }
}

/// Polygon vs circle: the circle/polygon test with the roles swapped back
pub fn polygon_to_circle(pos_a: Vec2, a: &Polygon, pos_b: Vec2, b: &Circle) -> CollisionResult {
    let mut result = circle_to_polygon(pos_b, b, pos_a, a);
    result.normal = -result.normal;
    result
}

/// Polygon vs polygon (SAT + reference face clipping)
pub fn polygon_to_polygon(pos_a: Vec2, a: &Polygon, pos_b: Vec2, b: &Polygon) -> CollisionResult {
    let Some((face_a, penetration_a)) = find_axis_least_penetration(pos_a, a, pos_b, b) else {
        return CollisionResult::miss();
    };
    let Some((face_b, penetration_b)) = find_axis_least_penetration(pos_b, b, pos_a, a) else {
        return CollisionResult::miss();
    };

    // Separations are <= 0. A is the reference only while its separation is
    // shallower than B's by a small margin, so ties go to B and the choice
    // does not flicker between near-equal faces from one step to the next
    let (ref_pos, ref_poly, inc_pos, inc_poly, ref_index, flip) =
        if bias_greater_than(penetration_a, penetration_b) {
            (pos_a, a, pos_b, b, face_a, false)
        } else {
            (pos_b, b, pos_a, a, face_b, true)
        };

    let ref_u = ref_poly.orient();
    let ref_normal = ref_u * ref_poly.normal(ref_index);

    let mut incident = find_incident_face(ref_normal, inc_pos, inc_poly);

    let v1 = to_world(ref_u, ref_pos, ref_poly.vertex(ref_index));
    let v2 = to_world(ref_u, ref_pos, ref_poly.vertex(ref_poly.next_index(ref_index)));

    let side_normal = (v2 - v1).normalize_or_zero();
    let ref_face_offset = ref_normal.dot(v1);
    let neg_side = -side_normal.dot(v1);
    let pos_side = side_normal.dot(v2);

    // Clip the incident face to the reference face's side planes
    if clip(-side_normal, neg_side, &mut incident) < 2 {
        return CollisionResult::miss();
    }
    if clip(side_normal, pos_side, &mut incident) < 2 {
        return CollisionResult::miss();
    }

    let mut result = CollisionResult::miss();
    result.normal = if flip { -ref_normal } else { ref_normal };

    // Keep points behind the reference face; depth is the deepest of them
    for p in incident {
        let separation = ref_normal.dot(p) - ref_face_offset;
        if separation <= 0.0 {
            result.points[result.contact_count] = p;
            result.penetration = result.penetration.max(-separation);
            result.contact_count += 1;
        }
    }

    result
}

/// Face of `a` with the greatest (least negative) separation from `b`
///
/// Returns `None` as soon as any face separates the two polygons.
fn find_axis_least_penetration(
    pos_a: Vec2,
    a: &Polygon,
    pos_b: Vec2,
    b: &Polygon,
) -> Option<(usize, f32)> {
    let u_a = a.orient();
    let u_b = b.orient();

    let mut best_distance = f32::MIN;
    let mut best_index = 0;

    for (i, (&n, &v)) in a.normals().iter().zip(a.vertices()).enumerate() {
        let nw = u_a * n;

        // Deepest point of B against this face
        let support = b.support(-(u_b.transpose() * nw));
        let support = to_world(u_b, pos_b, support);
        let face_point = to_world(u_a, pos_a, v);

        let d = nw.dot(support - face_point);
        if d > 0.0 {
            return None;
        }
        if d > best_distance {
            best_distance = d;
            best_index = i;
        }
    }

    Some((best_index, best_distance))
}

/// World-space endpoints of the incident polygon's face most anti-parallel
/// to the reference normal
fn find_incident_face(ref_normal: Vec2, inc_pos: Vec2, inc: &Polygon) -> [Vec2; 2] {
    let u = inc.orient();
    let ref_local = u.transpose() * ref_normal;

    let mut min_dot = f32::MAX;
    let mut face = 0;
    for (i, n) in inc.normals().iter().enumerate() {
        let dot = ref_local.dot(*n);
        if dot < min_dot {
            min_dot = dot;
            face = i;
        }
    }

    [
        to_world(u, inc_pos, inc.vertex(face)),
        to_world(u, inc_pos, inc.vertex(inc.next_index(face))),
    ]
}

/// Clip a segment against the half-plane `n·p <= c`
///
/// Returns how many points survive; a crossing segment has its outside end
/// replaced by the intersection point.
fn clip(n: Vec2, c: f32, face: &mut [Vec2; 2]) -> usize {
    let mut sp = 0;
    let mut out = *face;

    let d1 = n.dot(face[0]) - c;
    let d2 = n.dot(face[1]) - c;

    if d1 <= 0.0 {
        out[sp] = face[0];
        sp += 1;
    }
    if d2 <= 0.0 {
        out[sp] = face[1];
        sp += 1;
    }

    if d1 * d2 < 0.0 {
        let alpha = d1 / (d1 - d2);
        out[sp] = face[0] + (face[1] - face[0]) * alpha;
        sp += 1;
    }

    *face = out;
    sp
}

#[inline]
fn bias_greater_than(a: f32, b: f32) -> bool {
    a >= b * REFERENCE_BIAS_RELATIVE + a * REFERENCE_BIAS_ABSOLUTE
}
