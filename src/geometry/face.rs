// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle faces: geometry queries, classification state and the 2D
//! containment test

use super::{Bound, Vertex, VertexStatus, TOL};
use nalgebra::{Point3, Vector3};

/// Face classification relative to the other solid. `Same` and
/// `Opposite` denote coplanar overlap with matching and opposing
/// orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceStatus {
    Unknown,
    Inside,
    Outside,
    Same,
    Opposite,
}

impl FaceStatus {
    /// Status a vertex inherits when a face status floods into it.
    /// Coplanar statuses pin the vertex on the boundary.
    pub(crate) fn vertex_status(self) -> VertexStatus {
        match self {
            FaceStatus::Unknown => VertexStatus::Unknown,
            FaceStatus::Inside => VertexStatus::Inside,
            FaceStatus::Outside => VertexStatus::Outside,
            FaceStatus::Same | FaceStatus::Opposite => VertexStatus::Boundary,
        }
    }
}

/// Relation of a projected point to a projected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeRelation {
    Up,
    Down,
    On,
    None,
}

/// A triangle on a solid: three indices into the owning vertex pool,
/// a classification, and a cursor into the opposing face list up to
/// which the splitter has already tested this face.
#[derive(Debug, Clone)]
pub struct Face {
    pub v: [usize; 3],
    pub status: FaceStatus,
    pub tested_until: usize,
}

impl Face {
    pub fn new(v1: usize, v2: usize, v3: usize, tested_until: usize) -> Self {
        Self {
            v: [v1, v2, v3],
            status: FaceStatus::Unknown,
            tested_until,
        }
    }

    pub fn positions(&self, vertices: &[Vertex]) -> [Point3<f64>; 3] {
        [
            vertices[self.v[0]].position,
            vertices[self.v[1]].position,
            vertices[self.v[2]].position,
        ]
    }

    pub fn normal(&self, vertices: &[Vertex]) -> Vector3<f64> {
        let [p1, p2, p3] = self.positions(vertices);
        (p2 - p1).cross(&(p3 - p1)).normalize()
    }

    pub fn area(&self, vertices: &[Vertex]) -> f64 {
        let [p1, p2, p3] = self.positions(vertices);
        (p2 - p1).cross(&(p3 - p1)).norm() / 2.0
    }

    pub fn bound(&self, vertices: &[Vertex]) -> Bound {
        let [p1, p2, p3] = self.positions(vertices);
        Bound::from_triangle(&p1, &p2, &p3)
    }

    pub fn centroid(&self, vertices: &[Vertex]) -> Point3<f64> {
        let [p1, p2, p3] = self.positions(vertices);
        Point3::from((p1.coords + p2.coords + p3.coords) / 3.0)
    }

    /// Unordered vertex-set equality. Valid because the pool is
    /// deduplicated and a face's vertices are pairwise distinct.
    pub fn same_vertices(&self, other: &Face) -> bool {
        self.v.iter().all(|index| other.v.contains(index))
    }

    /// Reverses the winding so the normal flips.
    pub fn invert(&mut self) {
        self.v.swap(0, 1);
    }

    /// Adopts the status of any vertex already known to be inside or
    /// outside the other solid.
    pub fn simple_classify(&self, vertices: &[Vertex]) -> Option<FaceStatus> {
        for &index in &self.v {
            match vertices[index].status {
                VertexStatus::Inside => return Some(FaceStatus::Inside),
                VertexStatus::Outside => return Some(FaceStatus::Outside),
                _ => {}
            }
        }
        None
    }

    /// 2D containment test for a point assumed to lie in the face
    /// plane, after projection onto the dominant axis of the normal.
    /// The point is inside iff some edge reports it On, or some edge
    /// reports it Up and another Down.
    pub fn contains_point(&self, vertices: &[Vertex], point: &Point3<f64>) -> bool {
        let normal = self.normal(vertices);
        let [p1, p2, p3] = self.positions(vertices);
        let axis = dominant_axis(&normal);

        let q = project(point, axis);
        let a = project(&p1, axis);
        let b = project(&p2, axis);
        let c = project(&p3, axis);

        let relations = [
            edge_relation(q, a, b),
            edge_relation(q, b, c),
            edge_relation(q, c, a),
        ];

        if relations.contains(&EdgeRelation::On) {
            return true;
        }
        relations.contains(&EdgeRelation::Up) && relations.contains(&EdgeRelation::Down)
    }
}

/// Index of the normal component with the largest magnitude.
fn dominant_axis(normal: &Vector3<f64>) -> usize {
    let ax = normal.x.abs();
    let ay = normal.y.abs();
    let az = normal.z.abs();
    if ax >= ay && ax >= az {
        0
    } else if ay >= az {
        1
    } else {
        2
    }
}

/// Drops the dominant coordinate, keeping the other two in axis order.
fn project(point: &Point3<f64>, axis: usize) -> (f64, f64) {
    match axis {
        0 => (point.y, point.z),
        1 => (point.x, point.z),
        _ => (point.x, point.y),
    }
}

/// Classifies the projected point against the projected edge `a`-`b`:
/// Up/Down/On when the edge spans the point's first coordinate, None
/// when the edge is vertical in the projection or the point lies
/// outside its parameter range.
fn edge_relation(point: (f64, f64), a: (f64, f64), b: (f64, f64)) -> EdgeRelation {
    let (pu, pv) = point;
    let (au, av) = a;
    let (bu, bv) = b;

    if (au - bu).abs() > TOL && ((pu >= au && pu <= bu) || (pu <= au && pu >= bu)) {
        let slope = (bv - av) / (bu - au);
        let value = slope * (pu - au) + av;
        if value > pv + TOL {
            EdgeRelation::Up
        } else if value < pv - TOL {
            EdgeRelation::Down
        } else {
            EdgeRelation::On
        }
    } else {
        EdgeRelation::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;

    fn pool(points: &[(f64, f64, f64)]) -> Vec<Vertex> {
        points
            .iter()
            .map(|&(x, y, z)| {
                Vertex::new(Point3::new(x, y, z), Color::default(), VertexStatus::Unknown)
            })
            .collect()
    }

    #[test]
    fn test_normal_and_area() {
        let vertices = pool(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        assert!((face.normal(&vertices) - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
        assert!((face.area(&vertices) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invert_flips_normal() {
        let vertices = pool(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
        let mut face = Face::new(0, 1, 2, 0);
        face.invert();
        assert!((face.normal(&vertices) - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_contains_point() {
        let vertices = pool(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        assert!(face.contains_point(&vertices, &Point3::new(0.5, 0.5, 0.0)));
        assert!(!face.contains_point(&vertices, &Point3::new(1.5, 1.5, 0.0)));
        assert!(!face.contains_point(&vertices, &Point3::new(-0.5, 0.5, 0.0)));
        // on an edge
        assert!(face.contains_point(&vertices, &Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_contains_point_tilted_face() {
        let vertices = pool(&[(0.0, 0.0, 0.0), (2.0, 0.0, 2.0), (0.0, 2.0, 1.0)]);
        let face = Face::new(0, 1, 2, 0);
        let inside = face.centroid(&vertices);
        assert!(face.contains_point(&vertices, &inside));
    }

    #[test]
    fn test_simple_classify() {
        let mut vertices = pool(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        assert_eq!(face.simple_classify(&vertices), None);

        vertices[1].status = VertexStatus::Boundary;
        assert_eq!(face.simple_classify(&vertices), None);

        vertices[2].status = VertexStatus::Outside;
        assert_eq!(face.simple_classify(&vertices), Some(FaceStatus::Outside));
    }

    #[test]
    fn test_same_vertices() {
        let a = Face::new(0, 1, 2, 0);
        let b = Face::new(2, 0, 1, 5);
        let c = Face::new(0, 1, 3, 0);
        assert!(a.same_vertices(&b));
        assert!(!a.same_vertices(&c));
    }
}
