//! Convex polygon geometry
//!
//! Vertices and edge normals live in fixed-capacity arrays in local space
//! (centroid at the origin once mass has been computed, CCW winding). The
//! orientation matrix `u` is rebuilt from the owning body's angle.

use glam::{Mat2, Vec2};

use crate::consts::{EPSILON, MAX_POLY_VERTEX_COUNT};
use crate::math::{cross, edge_normal, rotation, to_world};

use super::shape::MassData;

/// A convex polygon with at most `MAX_POLY_VERTEX_COUNT` vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertex_count: usize,
    vertices: [Vec2; MAX_POLY_VERTEX_COUNT],
    /// `normals[i]` is the outward unit normal of edge `vertices[i] -> vertices[i + 1]`
    normals: [Vec2; MAX_POLY_VERTEX_COUNT],
    u: Mat2,
}

impl Polygon {
    fn empty() -> Self {
        Self {
            vertex_count: 0,
            vertices: [Vec2::ZERO; MAX_POLY_VERTEX_COUNT],
            normals: [Vec2::ZERO; MAX_POLY_VERTEX_COUNT],
            u: Mat2::IDENTITY,
        }
    }

    /// Axis-aligned box centered on the origin
    pub fn from_box(half_width: f32, half_height: f32) -> Self {
        let mut poly = Self::empty();
        poly.set_box(half_width, half_height);
        poly
    }

    /// Convex hull of `points`
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut poly = Self::empty();
        poly.set(points);
        poly
    }

    /// Make this polygon a box: vertices CCW from bottom-left, normals
    /// down, right, up, left.
    pub fn set_box(&mut self, half_width: f32, half_height: f32) {
        self.vertex_count = 4;
        self.vertices[0] = Vec2::new(-half_width, -half_height);
        self.vertices[1] = Vec2::new(half_width, -half_height);
        self.vertices[2] = Vec2::new(half_width, half_height);
        self.vertices[3] = Vec2::new(-half_width, half_height);

        self.normals[0] = Vec2::new(0.0, -1.0);
        self.normals[1] = Vec2::new(1.0, 0.0);
        self.normals[2] = Vec2::new(0.0, 1.0);
        self.normals[3] = Vec2::new(-1.0, 0.0);
    }

    /// Replace the geometry with the convex hull of `points` (gift wrapping)
    ///
    /// Interior and intermediate colinear points are dropped, so the result
    /// may have fewer vertices than the input.
    ///
    /// # Panics
    /// If `points` has fewer than 3 or more than `MAX_POLY_VERTEX_COUNT`
    /// entries, or the hull ends up with a zero-length edge.
    pub fn set(&mut self, points: &[Vec2]) {
        let count = points.len();
        assert!(
            (3..=MAX_POLY_VERTEX_COUNT).contains(&count),
            "polygon needs 3..={} points, got {}",
            MAX_POLY_VERTEX_COUNT,
            count
        );

        // Rightmost point, lowest y on ties
        let mut right_most = 0;
        let mut highest_x = points[0].x;
        for (i, p) in points.iter().enumerate().skip(1) {
            if p.x > highest_x {
                highest_x = p.x;
                right_most = i;
            } else if p.x == highest_x && p.y < points[right_most].y {
                right_most = i;
            }
        }

        let mut hull = [0usize; MAX_POLY_VERTEX_COUNT];
        let mut out_count = 0;
        let mut index_hull = right_most;

        loop {
            hull[out_count] = index_hull;
            let current = points[index_hull];

            // Pick the point with every other point on its left
            let mut next = 0;
            for i in 1..count {
                if next == index_hull {
                    next = i;
                    continue;
                }

                let e1 = points[next] - current;
                let e2 = points[i] - current;
                let c = cross(e1, e2);
                if c < 0.0 {
                    next = i;
                }
                // Colinear: keep the farther one
                if c == 0.0 && e2.length_squared() > e1.length_squared() {
                    next = i;
                }
            }

            out_count += 1;
            index_hull = next;

            // A hull never has more vertices than its input; the second
            // condition only trips on coincident input points.
            if next == right_most || out_count == count {
                break;
            }
        }

        self.vertex_count = out_count;
        for (dst, &src) in self.vertices.iter_mut().zip(&hull[..out_count]) {
            *dst = points[src];
        }

        for i1 in 0..self.vertex_count {
            let i2 = self.next_index(i1);
            let face = self.vertices[i2] - self.vertices[i1];
            assert!(
                face.length_squared() > EPSILON,
                "zero-length polygon edge at vertex {}",
                i1
            );
            self.normals[i1] = edge_normal(self.vertices[i1], self.vertices[i2]);
        }
    }

    /// Mass and inertia from a triangle fan around the local origin
    ///
    /// Vertices are translated so the centroid becomes the local origin, and
    /// the inertia is reported about that centroid.
    pub fn compute_mass(&mut self, density: f32) -> MassData {
        const K_INV3: f32 = 1.0 / 3.0;

        let mut centroid = Vec2::ZERO;
        let mut area = 0.0;
        let mut inertia = 0.0;

        for i1 in 0..self.vertex_count {
            let p1 = self.vertices[i1];
            let p2 = self.vertices[self.next_index(i1)];

            let d = cross(p1, p2);
            let triangle_area = 0.5 * d;
            area += triangle_area;

            centroid += (p1 + p2) * (triangle_area * K_INV3);

            let intx2 = p1.x * p1.x + p2.x * p1.x + p2.x * p2.x;
            let inty2 = p1.y * p1.y + p2.y * p1.y + p2.y * p2.y;
            inertia += (0.25 * K_INV3 * d) * (intx2 + inty2);
        }

        if area != 0.0 {
            centroid *= 1.0 / area;
        }

        for v in &mut self.vertices[..self.vertex_count] {
            *v -= centroid;
        }

        let mass = density * area;
        // Parallel axis: the fan was summed about the old origin
        let inertia = density * inertia - mass * centroid.length_squared();
        MassData::new(mass, inertia)
    }

    /// Rebuild the orientation matrix from an angle
    pub fn set_orient(&mut self, radians: f32) {
        self.u = rotation(radians);
    }

    #[inline]
    pub fn orient(&self) -> Mat2 {
        self.u
    }

    /// Vertex farthest along `dir` (local space)
    pub fn support(&self, dir: Vec2) -> Vec2 {
        let mut best_projection = f32::MIN;
        let mut best_vertex = self.vertices[0];

        for &v in self.vertices() {
            let projection = v.dot(dir);
            if projection > best_projection {
                best_vertex = v;
                best_projection = projection;
            }
        }

        best_vertex
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices[..self.vertex_count]
    }

    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals[..self.vertex_count]
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vec2 {
        self.vertices[i]
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Vec2 {
        self.normals[i]
    }

    /// Index of the vertex after `i`, wrapping to 0
    #[inline]
    pub fn next_index(&self, i: usize) -> usize {
        if i + 1 < self.vertex_count { i + 1 } else { 0 }
    }

    /// Vertices in world space for a body at `position`
    pub fn world_vertices(&self, position: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices()
            .iter()
            .map(move |&v| to_world(self.u, position, v))
    }
}
