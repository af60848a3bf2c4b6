// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The per-solid working mesh: a deduplicated vertex pool and a face
//! list that gets refined against the other solid's surface, then
//! classified face by face.

use super::vertex::mark;
use super::{
    point_is_nan, Bound, Color, EndType, Face, FaceStatus, Line, Segment, Vertex, VertexStatus,
    TOL,
};
use crate::error::{CsgError, Result};
use crate::solid::SolidView;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;

/// A split pass that multiplies the face count past this factor is
/// treated as divergent.
const MAX_SPLIT_GROWTH: usize = 20;

/// Retry budget for ray perturbation during classification.
const MAX_PERTURBATIONS: usize = 64;

/// One solid prepared for boolean evaluation.
///
/// Vertex indices are stable: vertices are deduplicated on insertion
/// and never removed. Face positions are not stable: the splitter
/// removes faces by swap-with-last and appends replacements, so any
/// face index is invalidated across a split.
#[derive(Debug, Clone)]
pub struct Object3D {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    bound: Bound,
}

impl Object3D {
    /// Builds the working mesh from an indexed triangle view.
    pub fn from_view<V: SolidView + ?Sized>(solid: &V) -> Self {
        let positions = solid.positions();
        let colors = solid.colors();
        let indices = solid.indices();

        let mut object = Self {
            vertices: Vec::with_capacity(positions.len()),
            faces: Vec::with_capacity(indices.len() / 3),
            bound: Bound::from_points(positions.iter().copied()),
        };

        let mut pool_index = Vec::with_capacity(positions.len());
        for (position, color) in positions.iter().zip(colors) {
            pool_index.push(object.add_vertex(*position, *color, VertexStatus::Unknown));
        }
        for triangle in indices.chunks_exact(3) {
            object.add_face(
                pool_index[triangle[0]],
                pool_index[triangle[1]],
                pool_index[triangle[2]],
                0,
            );
        }
        object
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn face(&self, index: usize) -> &Face {
        &self.faces[index]
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    pub fn total_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|face| face.area(&self.vertices))
            .sum()
    }

    /// Deduplicating insertion. A rediscovered vertex adopts the
    /// supplied status unless it is `Unknown`.
    fn add_vertex(&mut self, position: Point3<f64>, color: Color, status: VertexStatus) -> usize {
        let vertex = Vertex::new(position, color, status);
        for (index, existing) in self.vertices.iter_mut().enumerate() {
            if existing.approx_eq(&vertex) {
                existing.set_status(status);
                return index;
            }
        }
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Appends a face unless it is degenerate (two equal vertices or
    /// area below tolerance). Degenerate faces are silently dropped.
    fn add_face(&mut self, v1: usize, v2: usize, v3: usize, tested_until: usize) -> bool {
        if self.vertices[v1].approx_eq(&self.vertices[v2])
            || self.vertices[v1].approx_eq(&self.vertices[v3])
            || self.vertices[v2].approx_eq(&self.vertices[v3])
        {
            return false;
        }
        let face = Face::new(v1, v2, v3, tested_until);
        if face.area(&self.vertices) > TOL {
            self.faces.push(face);
            true
        } else {
            false
        }
    }

    /// Signed distance from a vertex to the plane carrying a face.
    fn distance_to_plane(
        vertex: &Vertex,
        normal: &Vector3<f64>,
        plane_point: &Point3<f64>,
    ) -> f64 {
        let d = -normal.dot(&plane_point.coords);
        normal.dot(&vertex.position.coords) + d
    }

    /// Splits faces until none is crossed by a face of `other`.
    ///
    /// Face pairs are pruned by bounds, then by the signs of each
    /// face's vertex distances to the other's plane; surviving pairs
    /// build their intersection segments on the shared carrier line
    /// and the face is subdivided when the segments overlap. A face
    /// replaced at its position is re-tested before the scan moves on.
    pub fn split_faces(&mut self, other: &Object3D) -> Result<()> {
        let faces_at_start = self.faces.len();

        if !self.bound.overlap(other.bound()) {
            return Ok(());
        }

        let mut i = 0;
        'faces: while i < self.faces.len() {
            if self.faces.len() > faces_at_start * MAX_SPLIT_GROWTH {
                return Err(CsgError::SplitFailed {
                    faces: self.faces.len(),
                });
            }

            let face1 = self.faces[i].clone();
            let bound1 = face1.bound(&self.vertices);
            if bound1.overlap(other.bound()) {
                for j in face1.tested_until..other.num_faces() {
                    let face2 = other.face(j);
                    if !bound1.overlap(&face2.bound(other.vertices())) {
                        continue;
                    }

                    // distances from face1's vertices to face2's plane
                    let normal2 = face2.normal(other.vertices());
                    let point2 = other.vertex(face2.v[0]).position;
                    let signs1 = face1.v.map(|v| {
                        sign(Self::distance_to_plane(
                            &self.vertices[v],
                            &normal2,
                            &point2,
                        ))
                    });

                    // all on one side (or coplanar): no crossing
                    if signs1[0] == signs1[1] && signs1[1] == signs1[2] {
                        continue;
                    }

                    // distances from face2's vertices to face1's plane
                    let normal1 = face1.normal(&self.vertices);
                    let point1 = self.vertices[face1.v[0]].position;
                    let signs2 = face2.v.map(|v| {
                        sign(Self::distance_to_plane(
                            other.vertex(v),
                            &normal1,
                            &point1,
                        ))
                    });

                    if signs2[0] == signs2[1] && signs2[1] == signs2[2] {
                        continue;
                    }

                    let line = Line::from_planes(&normal1, &point1, &normal2, &point2);
                    let segment1 = Segment::new(line, &face1, &self.vertices, signs1);
                    let segment2 = Segment::new(line, face2, other.vertices(), signs2);

                    if !segment1.intersects(&segment2) {
                        continue;
                    }

                    self.split_face(i, &segment1, &segment2, j + 1);

                    // the face at this position was replaced (or the
                    // list shrank past it): its sub-faces still have
                    // to be tested
                    if i >= self.faces.len() || !face1.same_vertices(&self.faces[i]) {
                        continue 'faces;
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Subdivides the face at `face_pos` along the overlap of the two
    /// segments, dispatching on the (start, middle, end) end types
    /// after deepening the segment to the tighter of the two.
    fn split_face(
        &mut self,
        face_pos: usize,
        segment1: &Segment,
        segment2: &Segment,
        tested_until: usize,
    ) {
        let face = self.faces[face_pos].clone();
        let start_vertex = segment1.start_vertex;
        let end_vertex = segment1.end_vertex;

        // starting point: the deeper of the two starts
        let (start_dist, start_type, start_pos);
        if segment2.start_dist > segment1.start_dist + TOL {
            start_dist = segment2.start_dist;
            start_type = segment1.middle_type;
            start_pos = segment2.start_pos;
        } else {
            start_dist = segment1.start_dist;
            start_type = segment1.start_type;
            start_pos = segment1.start_pos;
        }

        // ending point: the deeper of the two ends
        let (end_dist, end_type, end_pos);
        if segment2.end_dist < segment1.end_dist - TOL {
            end_dist = segment2.end_dist;
            end_type = segment1.middle_type;
            end_pos = segment2.end_pos;
        } else {
            end_dist = segment1.end_dist;
            end_type = segment1.end_type;
            end_pos = segment1.end_pos;
        }

        let middle_type = segment1.middle_type;

        if start_type == EndType::Vertex {
            self.vertices[start_vertex].set_status(VertexStatus::Boundary);
        }
        if end_type == EndType::Vertex {
            self.vertices[end_vertex].set_status(VertexStatus::Boundary);
        }

        match (start_type, middle_type, end_type) {
            // both ends are existing vertices: nothing to subdivide
            (EndType::Vertex, _, EndType::Vertex) => {}

            (_, EndType::Edge, _) => {
                // the segment runs along one edge of the face
                let split_edge = if (start_vertex == face.v[0] && end_vertex == face.v[1])
                    || (start_vertex == face.v[1] && end_vertex == face.v[0])
                {
                    1
                } else if (start_vertex == face.v[1] && end_vertex == face.v[2])
                    || (start_vertex == face.v[2] && end_vertex == face.v[1])
                {
                    2
                } else {
                    3
                };

                if start_type == EndType::Vertex {
                    self.break_face_in_two_on_edge(face_pos, end_pos, split_edge, tested_until);
                } else if end_type == EndType::Vertex {
                    self.break_face_in_two_on_edge(face_pos, start_pos, split_edge, tested_until);
                } else if (start_dist - end_dist).abs() < TOL {
                    self.break_face_in_two_on_edge(face_pos, end_pos, split_edge, tested_until);
                } else if (start_vertex == face.v[0] && end_vertex == face.v[1])
                    || (start_vertex == face.v[1] && end_vertex == face.v[2])
                    || (start_vertex == face.v[2] && end_vertex == face.v[0])
                {
                    // keep the inserted points in the face's winding order
                    self.break_face_in_three_on_edge(
                        face_pos,
                        start_pos,
                        end_pos,
                        split_edge,
                        tested_until,
                    );
                } else {
                    self.break_face_in_three_on_edge(
                        face_pos,
                        end_pos,
                        start_pos,
                        split_edge,
                        tested_until,
                    );
                }
            }

            (EndType::Vertex, EndType::Face, EndType::Edge) => {
                self.break_face_in_two_at_vertex(face_pos, end_pos, end_vertex, tested_until);
            }
            (EndType::Edge, EndType::Face, EndType::Vertex) => {
                self.break_face_in_two_at_vertex(face_pos, start_pos, start_vertex, tested_until);
            }
            (EndType::Vertex, EndType::Face, EndType::Face) => {
                self.break_face_in_three_at_vertex(face_pos, end_pos, start_vertex, tested_until);
            }
            (EndType::Face, EndType::Face, EndType::Vertex) => {
                self.break_face_in_three_at_vertex(face_pos, start_pos, end_vertex, tested_until);
            }
            (EndType::Edge, EndType::Face, EndType::Edge) => {
                self.break_face_in_three_on_two_edges(
                    face_pos,
                    start_pos,
                    end_pos,
                    start_vertex,
                    end_vertex,
                    tested_until,
                );
            }
            (EndType::Edge, EndType::Face, EndType::Face) => {
                self.break_face_in_four(face_pos, start_pos, end_pos, start_vertex, tested_until);
            }
            (EndType::Face, EndType::Face, EndType::Edge) => {
                self.break_face_in_four(face_pos, end_pos, start_pos, end_vertex, tested_until);
            }
            (EndType::Face, EndType::Face, EndType::Face) => {
                let segment_vector = start_pos - end_pos;

                // the intersection collapsed to a single interior point
                if segment_vector.x.abs() < TOL
                    && segment_vector.y.abs() < TOL
                    && segment_vector.z.abs() < TOL
                {
                    self.break_face_in_three_at_point(face_pos, start_pos, tested_until);
                    return;
                }

                // the face vertex most aligned with the segment
                let mut lined_slot = 0;
                let mut best = -1.0;
                for (slot, &v) in face.v.iter().enumerate() {
                    let vertex_vector = (end_pos - self.vertices[v].position).normalize();
                    let alignment = segment_vector.dot(&vertex_vector).abs();
                    if alignment >= best {
                        best = alignment;
                        lined_slot = slot;
                    }
                }

                // anchor the farther endpoint to the aligned vertex
                let lined_pos = self.vertices[face.v[lined_slot]].position;
                if (lined_pos - start_pos).norm() > (lined_pos - end_pos).norm() {
                    self.break_face_in_five(face_pos, start_pos, end_pos, lined_slot, tested_until);
                } else {
                    self.break_face_in_five(face_pos, end_pos, start_pos, lined_slot, tested_until);
                }
            }

            // remaining combinations cannot be produced by the builder
            _ => {}
        }
    }

    /// VERTEX-EDGE-EDGE / EDGE-EDGE-VERTEX: one new vertex on the
    /// numbered edge.
    fn break_face_in_two_on_edge(
        &mut self,
        face_pos: usize,
        new_pos: Point3<f64>,
        split_edge: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex = self.add_vertex(new_pos, color, VertexStatus::Boundary);

        match split_edge {
            1 => {
                self.add_face(face.v[0], vertex, face.v[2], tested_until);
                self.add_face(vertex, face.v[1], face.v[2], tested_until);
            }
            2 => {
                self.add_face(face.v[1], vertex, face.v[0], tested_until);
                self.add_face(vertex, face.v[2], face.v[0], tested_until);
            }
            _ => {
                self.add_face(face.v[2], vertex, face.v[1], tested_until);
                self.add_face(vertex, face.v[0], face.v[1], tested_until);
            }
        }
    }

    /// VERTEX-FACE-EDGE / EDGE-FACE-VERTEX: one new vertex, pivoting
    /// on the existing vertex at the other end.
    fn break_face_in_two_at_vertex(
        &mut self,
        face_pos: usize,
        new_pos: Point3<f64>,
        pivot_vertex: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex = self.add_vertex(new_pos, color, VertexStatus::Boundary);

        if pivot_vertex == face.v[0] {
            self.add_face(face.v[0], vertex, face.v[2], tested_until);
            self.add_face(vertex, face.v[1], face.v[2], tested_until);
        } else if pivot_vertex == face.v[1] {
            self.add_face(face.v[1], vertex, face.v[0], tested_until);
            self.add_face(vertex, face.v[2], face.v[0], tested_until);
        } else {
            self.add_face(face.v[2], vertex, face.v[1], tested_until);
            self.add_face(vertex, face.v[0], face.v[1], tested_until);
        }
    }

    /// EDGE-EDGE-EDGE: two new vertices along the numbered edge, in
    /// winding order.
    fn break_face_in_three_on_edge(
        &mut self,
        face_pos: usize,
        new_pos1: Point3<f64>,
        new_pos2: Point3<f64>,
        split_edge: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex1 = self.add_vertex(new_pos1, color, VertexStatus::Boundary);
        let vertex2 = self.add_vertex(new_pos2, color, VertexStatus::Boundary);

        match split_edge {
            1 => {
                self.add_face(face.v[0], vertex1, face.v[2], tested_until);
                self.add_face(vertex1, vertex2, face.v[2], tested_until);
                self.add_face(vertex2, face.v[1], face.v[2], tested_until);
            }
            2 => {
                self.add_face(face.v[1], vertex1, face.v[0], tested_until);
                self.add_face(vertex1, vertex2, face.v[0], tested_until);
                self.add_face(vertex2, face.v[2], face.v[0], tested_until);
            }
            _ => {
                self.add_face(face.v[2], vertex1, face.v[1], tested_until);
                self.add_face(vertex1, vertex2, face.v[1], tested_until);
                self.add_face(vertex2, face.v[0], face.v[1], tested_until);
            }
        }
    }

    /// VERTEX-FACE-FACE / FACE-FACE-VERTEX: fan from the interior
    /// point, starting at the pivot vertex.
    fn break_face_in_three_at_vertex(
        &mut self,
        face_pos: usize,
        new_pos: Point3<f64>,
        pivot_vertex: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex = self.add_vertex(new_pos, color, VertexStatus::Boundary);

        if pivot_vertex == face.v[0] {
            self.add_face(face.v[0], face.v[1], vertex, tested_until);
            self.add_face(face.v[1], face.v[2], vertex, tested_until);
            self.add_face(face.v[2], face.v[0], vertex, tested_until);
        } else if pivot_vertex == face.v[1] {
            self.add_face(face.v[1], face.v[2], vertex, tested_until);
            self.add_face(face.v[2], face.v[0], vertex, tested_until);
            self.add_face(face.v[0], face.v[1], vertex, tested_until);
        } else {
            self.add_face(face.v[2], face.v[0], vertex, tested_until);
            self.add_face(face.v[0], face.v[1], vertex, tested_until);
            self.add_face(face.v[1], face.v[2], vertex, tested_until);
        }
    }

    /// EDGE-FACE-EDGE: two new vertices on two different edges.
    fn break_face_in_three_on_two_edges(
        &mut self,
        face_pos: usize,
        new_pos1: Point3<f64>,
        new_pos2: Point3<f64>,
        start_vertex: usize,
        end_vertex: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex1 = self.add_vertex(new_pos1, color, VertexStatus::Boundary);
        let vertex2 = self.add_vertex(new_pos2, color, VertexStatus::Boundary);

        if start_vertex == face.v[0] && end_vertex == face.v[1] {
            self.add_face(face.v[0], vertex1, vertex2, tested_until);
            self.add_face(face.v[0], vertex2, face.v[2], tested_until);
            self.add_face(vertex1, face.v[1], vertex2, tested_until);
        } else if start_vertex == face.v[1] && end_vertex == face.v[0] {
            self.add_face(face.v[0], vertex2, vertex1, tested_until);
            self.add_face(face.v[0], vertex1, face.v[2], tested_until);
            self.add_face(vertex2, face.v[1], vertex1, tested_until);
        } else if start_vertex == face.v[1] && end_vertex == face.v[2] {
            self.add_face(face.v[1], vertex1, vertex2, tested_until);
            self.add_face(face.v[1], vertex2, face.v[0], tested_until);
            self.add_face(vertex1, face.v[2], vertex2, tested_until);
        } else if start_vertex == face.v[2] && end_vertex == face.v[1] {
            self.add_face(face.v[1], vertex2, vertex1, tested_until);
            self.add_face(face.v[1], vertex1, face.v[0], tested_until);
            self.add_face(vertex2, face.v[2], vertex1, tested_until);
        } else if start_vertex == face.v[2] && end_vertex == face.v[0] {
            self.add_face(face.v[2], vertex1, vertex2, tested_until);
            self.add_face(face.v[2], vertex2, face.v[1], tested_until);
            self.add_face(vertex1, face.v[0], vertex2, tested_until);
        } else {
            self.add_face(face.v[2], vertex2, vertex1, tested_until);
            self.add_face(face.v[2], vertex1, face.v[1], tested_until);
            self.add_face(vertex2, face.v[0], vertex1, tested_until);
        }
    }

    /// FACE-FACE-FACE collapsed to a point: fan around the interior
    /// point.
    fn break_face_in_three_at_point(
        &mut self,
        face_pos: usize,
        new_pos: Point3<f64>,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex = self.add_vertex(new_pos, color, VertexStatus::Boundary);

        self.add_face(face.v[0], face.v[1], vertex, tested_until);
        self.add_face(face.v[1], face.v[2], vertex, tested_until);
        self.add_face(face.v[2], face.v[0], vertex, tested_until);
    }

    /// EDGE-FACE-FACE / FACE-FACE-EDGE: a new vertex on an edge plus
    /// one in the interior.
    fn break_face_in_four(
        &mut self,
        face_pos: usize,
        new_pos1: Point3<f64>,
        new_pos2: Point3<f64>,
        pivot_vertex: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex1 = self.add_vertex(new_pos1, color, VertexStatus::Boundary);
        let vertex2 = self.add_vertex(new_pos2, color, VertexStatus::Boundary);

        if pivot_vertex == face.v[0] {
            self.add_face(face.v[0], vertex1, vertex2, tested_until);
            self.add_face(vertex1, face.v[1], vertex2, tested_until);
            self.add_face(face.v[1], face.v[2], vertex2, tested_until);
            self.add_face(face.v[2], face.v[0], vertex2, tested_until);
        } else if pivot_vertex == face.v[1] {
            self.add_face(face.v[1], vertex1, vertex2, tested_until);
            self.add_face(vertex1, face.v[2], vertex2, tested_until);
            self.add_face(face.v[2], face.v[0], vertex2, tested_until);
            self.add_face(face.v[0], face.v[1], vertex2, tested_until);
        } else {
            self.add_face(face.v[2], vertex1, vertex2, tested_until);
            self.add_face(vertex1, face.v[0], vertex2, tested_until);
            self.add_face(face.v[0], face.v[1], vertex2, tested_until);
            self.add_face(face.v[1], face.v[2], vertex2, tested_until);
        }
    }

    /// FACE-FACE-FACE: both endpoints interior; five sub-faces hung
    /// off the vertex most aligned with the segment.
    fn break_face_in_five(
        &mut self,
        face_pos: usize,
        new_pos1: Point3<f64>,
        new_pos2: Point3<f64>,
        lined_slot: usize,
        tested_until: usize,
    ) {
        let face = self.faces.swap_remove(face_pos);
        let color = self.vertices[face.v[0]].color;
        let vertex1 = self.add_vertex(new_pos1, color, VertexStatus::Boundary);
        let vertex2 = self.add_vertex(new_pos2, color, VertexStatus::Boundary);

        match lined_slot {
            0 => {
                self.add_face(face.v[1], face.v[2], vertex1, tested_until);
                self.add_face(face.v[1], vertex1, vertex2, tested_until);
                self.add_face(face.v[2], vertex2, vertex1, tested_until);
                self.add_face(face.v[1], vertex2, face.v[0], tested_until);
                self.add_face(face.v[2], face.v[0], vertex2, tested_until);
            }
            1 => {
                self.add_face(face.v[2], face.v[0], vertex1, tested_until);
                self.add_face(face.v[2], vertex1, vertex2, tested_until);
                self.add_face(face.v[0], vertex2, vertex1, tested_until);
                self.add_face(face.v[2], vertex2, face.v[1], tested_until);
                self.add_face(face.v[0], face.v[1], vertex2, tested_until);
            }
            _ => {
                self.add_face(face.v[0], face.v[1], vertex1, tested_until);
                self.add_face(face.v[0], vertex1, vertex2, tested_until);
                self.add_face(face.v[1], vertex2, vertex1, tested_until);
                self.add_face(face.v[0], vertex2, face.v[2], tested_until);
                self.add_face(face.v[1], face.v[2], vertex2, tested_until);
            }
        }
    }

    /// Labels every face Inside/Outside/Same/Opposite relative to
    /// `other`. Faces whose vertices are still unclassified are ray
    /// traced; the resulting status then floods through the vertex
    /// adjacency graph so later faces classify cheaply.
    pub fn classify_faces(&mut self, other: &Object3D, rng: &mut StdRng) -> Result<()> {
        // adjacency from the face list
        for i in 0..self.faces.len() {
            let [a, b, c] = self.faces[i].v;
            self.vertices[a].add_adjacent(b);
            self.vertices[a].add_adjacent(c);
            self.vertices[b].add_adjacent(a);
            self.vertices[b].add_adjacent(c);
            self.vertices[c].add_adjacent(a);
            self.vertices[c].add_adjacent(b);
        }

        for i in 0..self.faces.len() {
            if let Some(status) = self.faces[i].simple_classify(&self.vertices) {
                self.faces[i].status = status;
                continue;
            }

            let face = self.faces[i].clone();
            let status = self.ray_trace_status(&face, other, rng)?;
            self.faces[i].status = status;

            for &v in &face.v {
                if self.vertices[v].status == VertexStatus::Unknown {
                    mark(&mut self.vertices, v, status.vertex_status());
                }
            }
        }
        Ok(())
    }

    /// Classifies a face by shooting a ray from its centroid along its
    /// normal and inspecting the nearest face of `other` it hits.
    ///
    /// A ray that lies in some candidate's plane is perturbed and the
    /// scan restarted; the budget for that is bounded.
    fn ray_trace_status(
        &self,
        face: &Face,
        other: &Object3D,
        rng: &mut StdRng,
    ) -> Result<FaceStatus> {
        let mut ray = Line::new(face.normal(&self.vertices), face.centroid(&self.vertices));
        let mut perturbations = 0;

        let (closest_face, closest_distance) = 'scan: loop {
            let mut closest: Option<usize> = None;
            let mut closest_distance = f64::MAX;

            for (j, candidate) in other.faces().iter().enumerate() {
                let normal = candidate.normal(other.vertices());
                let plane_point = other.vertex(candidate.v[0]).position;
                let dot_product = normal.dot(&ray.direction());
                let intersection = ray.plane_intersection(&normal, &plane_point);

                if point_is_nan(&intersection) {
                    continue;
                }
                let distance = ray.signed_distance(&intersection);

                if distance.abs() < TOL && dot_product.abs() < TOL {
                    // ray lies in the candidate's plane
                    if perturbations >= MAX_PERTURBATIONS {
                        return Err(CsgError::ClassificationFailed);
                    }
                    ray.perturb_direction(rng);
                    perturbations += 1;
                    continue 'scan;
                }

                if distance.abs() < TOL && dot_product.abs() > TOL {
                    if candidate.contains_point(other.vertices(), &intersection) {
                        // ray starts on this face: coincident
                        closest = Some(j);
                        closest_distance = 0.0;
                        break;
                    }
                } else if dot_product.abs() > TOL
                    && distance > TOL
                    && distance < closest_distance
                    && candidate.contains_point(other.vertices(), &intersection)
                {
                    closest = Some(j);
                    closest_distance = distance;
                }
            }

            break 'scan (closest, closest_distance);
        };

        let Some(winner) = closest_face else {
            // the ray escaped without hitting anything
            return Ok(FaceStatus::Outside);
        };

        let dot_product = other.face(winner).normal(other.vertices()).dot(&ray.direction());
        if closest_distance.abs() < TOL {
            if dot_product > TOL {
                Ok(FaceStatus::Same)
            } else if dot_product < -TOL {
                Ok(FaceStatus::Opposite)
            } else {
                Err(CsgError::ClassificationFailed)
            }
        } else if dot_product > TOL {
            Ok(FaceStatus::Inside)
        } else if dot_product < -TOL {
            Ok(FaceStatus::Outside)
        } else {
            Err(CsgError::ClassificationFailed)
        }
    }

    /// Flips faces classified as inside so their normals point
    /// outward. Applied to the second operand of a difference.
    pub fn invert_inside_faces(&mut self) {
        for face in &mut self.faces {
            if face.status == FaceStatus::Inside {
                face.invert();
            }
        }
    }
}

fn sign(distance: f64) -> i32 {
    if distance > TOL {
        1
    } else if distance < -TOL {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;
    use rand::SeedableRng;

    fn unit_cube() -> crate::solid::Solid {
        Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(Color::default())
    }

    #[test]
    fn test_from_view_dedups_vertices() {
        let object = Object3D::from_view(&unit_cube());
        assert_eq!(object.vertices().len(), 8);
        assert_eq!(object.num_faces(), 12);
    }

    #[test]
    fn test_add_face_rejects_degenerates() {
        let mut object = Object3D::from_view(&unit_cube());
        let faces_before = object.num_faces();
        assert!(!object.add_face(0, 0, 1, 0));
        // collinear corners of one cube edge
        let a = object.add_vertex(Point3::new(5.0, 0.0, 0.0), Color::default(), VertexStatus::Unknown);
        let b = object.add_vertex(Point3::new(6.0, 0.0, 0.0), Color::default(), VertexStatus::Unknown);
        let c = object.add_vertex(Point3::new(7.0, 0.0, 0.0), Color::default(), VertexStatus::Unknown);
        assert!(!object.add_face(a, b, c, 0));
        assert_eq!(object.num_faces(), faces_before);
    }

    #[test]
    fn test_split_preserves_total_area() {
        let mut a = Object3D::from_view(&unit_cube());
        let mut b_solid = unit_cube();
        b_solid.translate(0.5, 0.5, 0.5);
        let b = Object3D::from_view(&b_solid);

        let area_before = a.total_area();
        a.split_faces(&b).unwrap();
        let area_after = a.total_area();

        assert!(a.num_faces() > 12);
        assert!((area_before - area_after).abs() < 1e-6);
    }

    #[test]
    fn test_split_leaves_no_crossing_faces() {
        let mut a = Object3D::from_view(&unit_cube());
        let mut b_solid = unit_cube();
        b_solid.translate(0.5, 0.5, 0.5);
        let b = Object3D::from_view(&b_solid);
        a.split_faces(&b).unwrap();

        // a fresh pair scan (ignoring the tested-until cursors) finds
        // no face of a whose intersection segment still overlaps an
        // opposing face's segment
        for face1 in a.faces() {
            let bound1 = face1.bound(a.vertices());
            for face2 in b.faces() {
                if !bound1.overlap(&face2.bound(b.vertices())) {
                    continue;
                }
                let normal2 = face2.normal(b.vertices());
                let point2 = b.vertex(face2.v[0]).position;
                let signs1 = face1
                    .v
                    .map(|v| sign(Object3D::distance_to_plane(a.vertex(v), &normal2, &point2)));
                if signs1[0] == signs1[1] && signs1[1] == signs1[2] {
                    continue;
                }
                let normal1 = face1.normal(a.vertices());
                let point1 = a.vertex(face1.v[0]).position;
                let signs2 = face2
                    .v
                    .map(|v| sign(Object3D::distance_to_plane(b.vertex(v), &normal1, &point1)));
                if signs2[0] == signs2[1] && signs2[1] == signs2[2] {
                    continue;
                }
                let line = Line::from_planes(&normal1, &point1, &normal2, &point2);
                let segment1 = Segment::new(line, face1, a.vertices(), signs1);
                let segment2 = Segment::new(line, face2, b.vertices(), signs2);
                assert!(
                    !segment1.intersects(&segment2),
                    "a face of the split mesh still crosses an opposing face"
                );
            }
        }
    }

    #[test]
    fn test_disjoint_solids_classify_outside() {
        let mut a = Object3D::from_view(&unit_cube());
        let mut b_solid = unit_cube();
        b_solid.translate(5.0, 0.0, 0.0);
        let b = Object3D::from_view(&b_solid);

        let mut rng = StdRng::seed_from_u64(1);
        a.classify_faces(&b, &mut rng).unwrap();

        assert!(a
            .faces()
            .iter()
            .all(|face| face.status == FaceStatus::Outside));
    }

    #[test]
    fn test_contained_solid_classifies_inside() {
        let mut inner_solid =
            Primitive::cube(Vector3::new(0.5, 0.5, 0.5), true).to_solid(Color::default());
        inner_solid.translate(0.5, 0.5, 0.5);
        let mut inner = Object3D::from_view(&inner_solid);
        let outer = Object3D::from_view(&unit_cube());

        let mut rng = StdRng::seed_from_u64(1);
        inner.classify_faces(&outer, &mut rng).unwrap();

        assert!(inner
            .faces()
            .iter()
            .all(|face| face.status == FaceStatus::Inside));
    }

    #[test]
    fn test_coincident_faces_classify_same() {
        let mut a = Object3D::from_view(&unit_cube());
        let b = Object3D::from_view(&unit_cube());

        let mut rng = StdRng::seed_from_u64(1);
        a.classify_faces(&b, &mut rng).unwrap();

        assert!(a.faces().iter().all(|face| face.status == FaceStatus::Same));
    }

    #[test]
    fn test_classification_is_total_after_split() {
        let mut a = Object3D::from_view(&unit_cube());
        let mut b_solid = unit_cube();
        b_solid.translate(0.5, 0.0, 0.0);
        let mut b = Object3D::from_view(&b_solid);

        a.split_faces(&b).unwrap();
        b.split_faces(&a).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        a.classify_faces(&b, &mut rng).unwrap();

        assert!(a.faces().iter().all(|face| face.status != FaceStatus::Unknown));
    }

    #[test]
    fn test_invert_inside_faces_flips_only_inside() {
        let mut inner_solid =
            Primitive::cube(Vector3::new(0.5, 0.5, 0.5), true).to_solid(Color::default());
        inner_solid.translate(0.5, 0.5, 0.5);
        let mut inner = Object3D::from_view(&inner_solid);
        let outer = Object3D::from_view(&unit_cube());

        let mut rng = StdRng::seed_from_u64(1);
        inner.classify_faces(&outer, &mut rng).unwrap();
        let normals_before: Vec<_> = inner
            .faces()
            .iter()
            .map(|f| f.normal(inner.vertices()))
            .collect();

        inner.invert_inside_faces();

        for (face, before) in inner.faces().iter().zip(&normals_before) {
            let after = face.normal(inner.vertices());
            assert!((after + before).norm() < 1e-9);
        }
    }
}
