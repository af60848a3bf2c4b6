// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pooled solid vertices with classification and adjacency

use super::Color;
use nalgebra::Point3;

/// Tolerance for vertex coordinate comparisons. Looser than the core
/// tolerance so that numerically close split points collapse into one
/// pool entry.
const POSITION_TOL: f64 = 1e-5;

/// Vertex classification relative to the other solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStatus {
    Unknown,
    Inside,
    Outside,
    Boundary,
}

/// A vertex in a solid's pool: position, colour, classification and
/// the pool indices of its edge-adjacent neighbours.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub color: Color,
    pub status: VertexStatus,
    adjacent: Vec<usize>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, color: Color, status: VertexStatus) -> Self {
        Self {
            position,
            color,
            status,
            adjacent: Vec::new(),
        }
    }

    /// Coordinate-wise tolerant equality; colours must also match.
    pub fn approx_eq(&self, other: &Vertex) -> bool {
        (self.position.x - other.position.x).abs() < POSITION_TOL
            && (self.position.y - other.position.y).abs() < POSITION_TOL
            && (self.position.z - other.position.z).abs() < POSITION_TOL
            && self.color.approx_eq(&other.color)
    }

    /// Assigns a status. `Unknown` never clobbers a known one.
    pub fn set_status(&mut self, status: VertexStatus) {
        if status != VertexStatus::Unknown {
            self.status = status;
        }
    }

    pub fn add_adjacent(&mut self, index: usize) {
        if !self.adjacent.contains(&index) {
            self.adjacent.push(index);
        }
    }

    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }
}

/// Floods `status` from `start` through the adjacency graph, stopping
/// at vertices that are no longer `Unknown`.
pub(crate) fn mark(vertices: &mut [Vertex], start: usize, status: VertexStatus) {
    if status == VertexStatus::Unknown {
        return;
    }
    vertices[start].status = status;
    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
        for i in 0..vertices[index].adjacent.len() {
            let neighbour = vertices[index].adjacent[i];
            if vertices[neighbour].status == VertexStatus::Unknown {
                vertices[neighbour].status = status;
                stack.push(neighbour);
            }
        }
    }
}
