// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The external-facing solid: an indexed triangle mesh with per-vertex
//! colours, plus the affine helpers and volume query.

use crate::error::{CsgError, Result};
use crate::geometry::{Bound, Color};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Read access to an indexed triangle mesh as three parallel arrays.
/// The boolean kernel consumes its operands through this trait.
pub trait SolidView {
    fn positions(&self) -> &[Point3<f64>];
    fn colors(&self) -> &[Color];
    fn indices(&self) -> &[usize];
}

/// Sink for an indexed triangle mesh. The boolean kernel emits its
/// result through this trait.
pub trait SolidBuilder {
    fn add_vertex(&mut self, position: Point3<f64>, color: Color) -> usize;
    fn add_triangle(&mut self, v1: usize, v2: usize, v3: usize);
}

/// A closed triangulated polyhedron: the input and output unit of the
/// boolean operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solid {
    vertices: Vec<Point3<f64>>,
    indices: Vec<usize>,
    colors: Vec<Color>,
}

impl Solid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a solid from parallel arrays, rejecting inconsistent
    /// input.
    pub fn from_arrays(
        vertices: Vec<Point3<f64>>,
        indices: Vec<usize>,
        colors: Vec<Color>,
    ) -> Result<Self> {
        if colors.len() != vertices.len() {
            return Err(CsgError::MalformedSolid(format!(
                "{} colours for {} vertices",
                colors.len(),
                vertices.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(CsgError::MalformedSolid(format!(
                "index count {} is not a multiple of three",
                indices.len()
            )));
        }
        if let Some(&index) = indices.iter().find(|&&index| index >= vertices.len()) {
            return Err(CsgError::MalformedSolid(format!(
                "index {} out of range for {} vertices",
                index,
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            indices,
            colors,
        })
    }

    /// Builds a solid with the same colour on every vertex.
    pub fn from_arrays_uniform(
        vertices: Vec<Point3<f64>>,
        indices: Vec<usize>,
        color: Color,
    ) -> Result<Self> {
        let colors = vec![color; vertices.len()];
        Self::from_arrays(vertices, indices, colors)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bound(&self) -> Bound {
        Bound::from_points(self.vertices.iter().copied())
    }

    /// Moves every vertex by the given deltas.
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        if dx != 0.0 || dy != 0.0 || dz != 0.0 {
            for vertex in &mut self.vertices {
                vertex.x += dx;
                vertex.y += dy;
                vertex.z += dz;
            }
        }
    }

    /// Rotates the solid about its vertex mean, first about the x axis
    /// then about the y axis.
    pub fn rotate(&mut self, rx: f64, ry: f64) {
        if rx == 0.0 && ry == 0.0 {
            return;
        }
        let (sin_x, cos_x) = rx.sin_cos();
        let (sin_y, cos_y) = ry.sin_cos();
        let mean = self.mean();

        for vertex in &mut self.vertices {
            vertex.x -= mean.x;
            vertex.y -= mean.y;
            vertex.z -= mean.z;

            if rx != 0.0 {
                let new_y = vertex.y * cos_x - vertex.z * sin_x;
                let new_z = vertex.y * sin_x + vertex.z * cos_x;
                vertex.y = new_y;
                vertex.z = new_z;
            }
            if ry != 0.0 {
                let new_x = vertex.x * cos_y + vertex.z * sin_y;
                let new_z = -vertex.x * sin_y + vertex.z * cos_y;
                vertex.x = new_x;
                vertex.z = new_z;
            }

            vertex.x += mean.x;
            vertex.y += mean.y;
            vertex.z += mean.z;
        }
    }

    /// Scales each coordinate by the given factors.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        for vertex in &mut self.vertices {
            vertex.x *= sx;
            vertex.y *= sy;
            vertex.z *= sz;
        }
    }

    /// Shifts the solid along the z axis.
    pub fn zoom(&mut self, dz: f64) {
        if dz != 0.0 {
            for vertex in &mut self.vertices {
                vertex.z += dz;
            }
        }
    }

    /// The mean of all vertex positions.
    pub fn mean(&self) -> Point3<f64> {
        let mut mean = Point3::origin();
        if self.vertices.is_empty() {
            return mean;
        }
        for vertex in &self.vertices {
            mean.x += vertex.x;
            mean.y += vertex.y;
            mean.z += vertex.z;
        }
        mean / self.vertices.len() as f64
    }

    /// Enclosed volume, as the magnitude of the summed signed
    /// tetrahedron volumes.
    pub fn volume(&self) -> f64 {
        let mut volume = 0.0;
        for triangle in self.indices.chunks_exact(3) {
            volume += signed_tetrahedron_volume(
                &self.vertices[triangle[0]],
                &self.vertices[triangle[1]],
                &self.vertices[triangle[2]],
            );
        }
        volume.abs()
    }
}

/// Signed volume of the tetrahedron spanned by the origin and a
/// triangle.
fn signed_tetrahedron_volume(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    let v321 = p3.x * p2.y * p1.z;
    let v231 = p2.x * p3.y * p1.z;
    let v312 = p3.x * p1.y * p2.z;
    let v132 = p1.x * p3.y * p2.z;
    let v213 = p2.x * p1.y * p3.z;
    let v123 = p1.x * p2.y * p3.z;
    (-v321 + v231 + v312 - v132 - v213 + v123) / 6.0
}

impl SolidView for Solid {
    fn positions(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    fn colors(&self) -> &[Color] {
        &self.colors
    }

    fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl SolidBuilder for Solid {
    fn add_vertex(&mut self, position: Point3<f64>, color: Color) -> usize {
        self.vertices.push(position);
        self.colors.push(color);
        self.vertices.len() - 1
    }

    fn add_triangle(&mut self, v1: usize, v2: usize, v3: usize) {
        self.indices.extend_from_slice(&[v1, v2, v3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;

    fn unit_cube() -> Solid {
        Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(Color::default())
    }

    #[test]
    fn test_rejects_color_count_mismatch() {
        let result = Solid::from_arrays(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            vec![],
            vec![Color::default()],
        );
        assert!(matches!(result, Err(CsgError::MalformedSolid(_))));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = Solid::from_arrays_uniform(
            vec![
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 3],
            Color::default(),
        );
        assert!(matches!(result, Err(CsgError::MalformedSolid(_))));
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let result = Solid::from_arrays_uniform(
            vec![
                Point3::origin(),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1],
            Color::default(),
        );
        assert!(matches!(result, Err(CsgError::MalformedSolid(_))));
    }

    #[test]
    fn test_cube_volume() {
        assert!((unit_cube().volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_moves_all_axes() {
        let mut cube = unit_cube();
        cube.translate(0.0, 0.0, 2.0);
        let bound = cube.bound();
        assert!((bound.min.z - 2.0).abs() < 1e-12);
        assert!((bound.max.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_changes_volume() {
        let mut cube = unit_cube();
        cube.scale(2.0, 1.0, 1.0);
        assert!((cube.volume() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_preserves_volume() {
        let mut cube = unit_cube();
        cube.rotate(0.3, 0.7);
        assert!((cube.volume() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_unit_cube() {
        let mean = unit_cube().mean();
        assert!((mean - Point3::new(0.5, 0.5, 0.5)).norm() < 1e-12);
    }
}
