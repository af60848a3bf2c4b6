// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Intersection segments of a face with an opposing plane

use super::{Face, Line, Vertex, TOL};
use nalgebra::Point3;

/// Where a segment endpoint lies on its face: at a vertex, on an
/// edge, or in the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndType {
    Vertex,
    Edge,
    Face,
}

/// The 1D intersection of a face with the carrier line of an opposing
/// plane. Endpoints are ordered by signed distance along the carrier.
#[derive(Debug, Clone)]
pub struct Segment {
    line: Line,
    ends_set: usize,

    pub start_dist: f64,
    pub end_dist: f64,

    pub start_type: EndType,
    pub middle_type: EndType,
    pub end_type: EndType,

    /// Pool index of the face vertex nearest each end.
    pub start_vertex: usize,
    pub end_vertex: usize,

    pub start_pos: Point3<f64>,
    pub end_pos: Point3<f64>,
}

impl Segment {
    /// Builds the intersection segment of `face` with the carrier
    /// `line`, from the signs (-1, 0, +1) of the face vertices' signed
    /// distances to the opposing plane.
    ///
    /// Vertices on the plane become `Vertex` ends first; if the other
    /// two vertices lie on the same side the segment degenerates to a
    /// single repeated vertex. Remaining ends come from edges whose
    /// endpoints sit on opposite sides, located at the edge's
    /// intersection with the carrier.
    pub fn new(line: Line, face: &Face, vertices: &[Vertex], signs: [i32; 3]) -> Self {
        let mut segment = Self {
            line,
            ends_set: 0,
            start_dist: 0.0,
            end_dist: 0.0,
            start_type: EndType::Vertex,
            middle_type: EndType::Vertex,
            end_type: EndType::Vertex,
            start_vertex: 0,
            end_vertex: 0,
            start_pos: Point3::origin(),
            end_pos: Point3::origin(),
        };

        let [sign1, sign2, sign3] = signs;
        let [v1, v2, v3] = face.v;

        if sign1 == 0 {
            segment.set_vertex(v1, vertices);
            if sign2 == sign3 {
                segment.set_vertex(v1, vertices);
            }
        }
        if sign2 == 0 {
            segment.set_vertex(v2, vertices);
            if sign1 == sign3 {
                segment.set_vertex(v2, vertices);
            }
        }
        if sign3 == 0 {
            segment.set_vertex(v3, vertices);
            if sign1 == sign2 {
                segment.set_vertex(v3, vertices);
            }
        }

        if segment.ends_set != 2 {
            if (sign1 == 1 && sign2 == -1) || (sign1 == -1 && sign2 == 1) {
                segment.set_edge(v1, v2, vertices);
            }
            if (sign2 == 1 && sign3 == -1) || (sign2 == -1 && sign3 == 1) {
                segment.set_edge(v2, v3, vertices);
            }
            if (sign3 == 1 && sign1 == -1) || (sign3 == -1 && sign1 == 1) {
                segment.set_edge(v3, v1, vertices);
            }
        }

        segment
    }

    pub fn ends_set(&self) -> usize {
        self.ends_set
    }

    /// Two segments on the same carrier overlap iff each reaches past
    /// the other's start by more than the tolerance.
    pub fn intersects(&self, other: &Segment) -> bool {
        self.end_dist >= other.start_dist + TOL && other.end_dist >= self.start_dist + TOL
    }

    fn set_vertex(&mut self, vertex: usize, vertices: &[Vertex]) -> bool {
        let position = vertices[vertex].position;
        match self.ends_set {
            0 => {
                self.start_vertex = vertex;
                self.start_type = EndType::Vertex;
                self.start_dist = self.line.signed_distance(&position);
                self.start_pos = position;
                self.ends_set = 1;
                true
            }
            1 => {
                self.end_vertex = vertex;
                self.end_type = EndType::Vertex;
                self.end_dist = self.line.signed_distance(&position);
                self.end_pos = position;
                self.ends_set = 2;

                if self.start_vertex == self.end_vertex {
                    // degenerate: the whole intersection is one vertex
                    self.middle_type = EndType::Vertex;
                } else if self.start_type == EndType::Vertex {
                    self.middle_type = EndType::Edge;
                }

                if self.start_dist > self.end_dist {
                    self.swap_ends();
                }
                true
            }
            _ => false,
        }
    }

    fn set_edge(&mut self, v1: usize, v2: usize, vertices: &[Vertex]) -> bool {
        let p1 = vertices[v1].position;
        let p2 = vertices[v2].position;
        let edge_line = Line::new(p2 - p1, p1);
        let position = self.line.line_intersection(&edge_line);

        match self.ends_set {
            0 => {
                self.start_vertex = v1;
                self.start_type = EndType::Edge;
                self.start_pos = position;
                self.start_dist = self.line.signed_distance(&position);
                self.middle_type = EndType::Face;
                self.ends_set = 1;
                true
            }
            1 => {
                self.end_vertex = v1;
                self.end_type = EndType::Edge;
                self.end_pos = position;
                self.end_dist = self.line.signed_distance(&position);
                self.middle_type = EndType::Face;
                self.ends_set = 2;

                if self.start_dist > self.end_dist {
                    self.swap_ends();
                }
                true
            }
            _ => false,
        }
    }

    fn swap_ends(&mut self) {
        std::mem::swap(&mut self.start_dist, &mut self.end_dist);
        std::mem::swap(&mut self.start_type, &mut self.end_type);
        std::mem::swap(&mut self.start_vertex, &mut self.end_vertex);
        std::mem::swap(&mut self.start_pos, &mut self.end_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, VertexStatus};
    use nalgebra::Vector3;

    fn pool(points: &[(f64, f64, f64)]) -> Vec<Vertex> {
        points
            .iter()
            .map(|&(x, y, z)| {
                Vertex::new(Point3::new(x, y, z), Color::default(), VertexStatus::Unknown)
            })
            .collect()
    }

    #[test]
    fn test_edge_crossing_segment() {
        // triangle in the xy plane straddling the plane x = 1
        let vertices = pool(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        // carrier: intersection of the face plane (z = 0) with x = 1
        let line = Line::from_planes(
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        // signs of the vertices against x = 1: -1, +1, -1
        let segment = Segment::new(line, &face, &vertices, [-1, 1, -1]);

        assert_eq!(segment.ends_set(), 2);
        assert_eq!(segment.start_type, EndType::Edge);
        assert_eq!(segment.middle_type, EndType::Face);
        assert_eq!(segment.end_type, EndType::Edge);
        assert!(segment.start_dist <= segment.end_dist);
        // the two crossings are (1, 0, 0) and (1, 1, 0)
        let mut hits = [segment.start_pos, segment.end_pos];
        hits.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
        assert!((hits[0] - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((hits[1] - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_single_vertex_touch_degenerates() {
        // only vertex 0 lies on the plane; the others sit on one side
        let vertices = pool(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (2.0, 2.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        let line = Line::from_planes(
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        let segment = Segment::new(line, &face, &vertices, [0, 1, 1]);

        assert_eq!(segment.ends_set(), 2);
        assert_eq!(segment.start_type, EndType::Vertex);
        assert_eq!(segment.middle_type, EndType::Vertex);
        assert_eq!(segment.end_type, EndType::Vertex);
        assert_eq!(segment.start_vertex, segment.end_vertex);
        assert!((segment.start_dist - segment.end_dist).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_to_edge_segment() {
        // vertex 0 on the plane, vertices 1 and 2 on opposite sides
        let vertices = pool(&[(1.0, 2.0, 0.0), (0.0, 0.0, 0.0), (2.0, 0.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        let line = Line::from_planes(
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        let segment = Segment::new(line, &face, &vertices, [0, -1, 1]);

        assert_eq!(segment.ends_set(), 2);
        let types = [segment.start_type, segment.end_type];
        assert!(types.contains(&EndType::Vertex));
        assert!(types.contains(&EndType::Edge));
        assert_eq!(segment.middle_type, EndType::Face);
    }

    #[test]
    fn test_disjoint_segments_do_not_intersect() {
        let vertices = pool(&[(0.0, 0.0, 0.0), (2.0, 0.0, 0.0), (0.0, 2.0, 0.0)]);
        let face = Face::new(0, 1, 2, 0);
        let line = Line::from_planes(
            &Vector3::new(0.0, 0.0, 1.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        let a = Segment::new(line, &face, &vertices, [-1, 1, -1]);
        let mut b = a.clone();
        b.start_dist = a.end_dist + 1.0;
        b.end_dist = a.end_dist + 2.0;
        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.clone()));
    }
}
