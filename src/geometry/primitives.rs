// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solid generators for the common primitives

use super::Color;
use crate::solid::Solid;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives, emitted as solids with a uniform colour.
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Sphere { r: f64, segments: u32 },
    Cylinder { h: f64, r: f64, segments: u32 },
    Cone { h: f64, r1: f64, r2: f64, segments: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(r: f64, segments: u32) -> Self {
        let segments = if segments > 0 { segments } else { 32 };
        Self::Sphere { r, segments }
    }

    pub fn cylinder(h: f64, r: f64, segments: u32) -> Self {
        let segments = if segments > 0 { segments } else { 32 };
        Self::Cylinder { h, r, segments }
    }

    pub fn cone(h: f64, r1: f64, r2: f64, segments: u32) -> Self {
        let segments = if segments > 0 { segments } else { 32 };
        Self::Cone {
            h,
            r1,
            r2,
            segments,
        }
    }

    pub fn to_solid(&self, color: Color) -> Solid {
        match self {
            Self::Cube { size, center } => generate_cube(*size, *center, color),
            Self::Sphere { r, segments } => generate_sphere(*r, *segments, color),
            Self::Cylinder { h, r, segments } => generate_cone(*h, *r, *r, *segments, color),
            Self::Cone { h, r1, r2, segments } => generate_cone(*h, *r1, *r2, *segments, color),
        }
    }
}

fn generate_cube(size: Vector3<f64>, center: bool, color: Color) -> Solid {
    let (min_x, max_x) = if center {
        (-size.x / 2.0, size.x / 2.0)
    } else {
        (0.0, size.x)
    };
    let (min_y, max_y) = if center {
        (-size.y / 2.0, size.y / 2.0)
    } else {
        (0.0, size.y)
    };
    let (min_z, max_z) = if center {
        (-size.z / 2.0, size.z / 2.0)
    } else {
        (0.0, size.z)
    };

    let vertices = vec![
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, min_y, min_z),
        Point3::new(max_x, max_y, min_z),
        Point3::new(min_x, max_y, min_z),
        Point3::new(min_x, min_y, max_z),
        Point3::new(max_x, min_y, max_z),
        Point3::new(max_x, max_y, max_z),
        Point3::new(min_x, max_y, max_z),
    ];

    // outward-wound faces
    let indices = vec![
        4, 5, 6, 4, 6, 7, // front (z+)
        1, 0, 3, 1, 3, 2, // back (z-)
        5, 1, 2, 5, 2, 6, // right (x+)
        0, 4, 7, 0, 7, 3, // left (x-)
        7, 6, 2, 7, 2, 3, // top (y+)
        0, 1, 5, 0, 5, 4, // bottom (y-)
    ];

    Solid::from_arrays_uniform(vertices, indices, color)
        .expect("cube arrays are consistent")
}

fn generate_sphere(radius: f64, segments: u32, color: Color) -> Solid {
    let stacks = segments as usize;
    let slices = segments as usize;
    let mut vertices = Vec::with_capacity((stacks + 1) * (slices + 1));
    let mut indices = Vec::new();

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let ring = radius * phi.sin();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            vertices.push(Point3::new(ring * theta.cos(), y, ring * theta.sin()));
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;
            // pole rings collapse to degenerate triangles; ingestion
            // drops them
            indices.extend_from_slice(&[first, first + 1, second]);
            indices.extend_from_slice(&[first + 1, second + 1, second]);
        }
    }

    Solid::from_arrays_uniform(vertices, indices, color)
        .expect("sphere arrays are consistent")
}

fn generate_cone(height: f64, r1: f64, r2: f64, segments: u32, color: Color) -> Solid {
    let segments = segments as usize;
    let mut vertices = Vec::with_capacity(2 * segments + 2);
    let mut indices = Vec::new();

    // caps centered at z = 0 and z = height
    let bottom_center = 0;
    let top_center = 1;
    vertices.push(Point3::new(0.0, 0.0, 0.0));
    vertices.push(Point3::new(0.0, 0.0, height));

    let mut bottom = Vec::with_capacity(segments);
    let mut top = Vec::with_capacity(segments);
    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (sin, cos) = angle.sin_cos();
        bottom.push(vertices.len());
        vertices.push(Point3::new(r1 * cos, r1 * sin, 0.0));
        top.push(vertices.len());
        vertices.push(Point3::new(r2 * cos, r2 * sin, height));
    }

    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[bottom_center, bottom[next], bottom[i]]);
        indices.extend_from_slice(&[top_center, top[i], top[next]]);
        indices.extend_from_slice(&[bottom[i], bottom[next], top[i]]);
        indices.extend_from_slice(&[bottom[next], top[next], top[i]]);
    }

    Solid::from_arrays_uniform(vertices, indices, color)
        .expect("cone arrays are consistent")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts_and_volume() {
        let cube = Primitive::cube(Vector3::new(2.0, 3.0, 4.0), false).to_solid(Color::default());
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert!((cube.volume() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_cube_straddles_origin() {
        let cube = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), true).to_solid(Color::default());
        let bound = cube.bound();
        assert!((bound.min.x + 1.0).abs() < 1e-12);
        assert!((bound.max.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_volume_approaches_exact() {
        let sphere = Primitive::sphere(1.0, 32).to_solid(Color::default());
        let exact = 4.0 / 3.0 * PI;
        let volume = sphere.volume();
        assert!(volume > 0.9 * exact && volume < exact + 1e-9);
    }

    #[test]
    fn test_cylinder_volume_approaches_exact() {
        let cylinder = Primitive::cylinder(2.0, 1.0, 64).to_solid(Color::default());
        let exact = 2.0 * PI;
        let volume = cylinder.volume();
        assert!(volume > 0.95 * exact && volume < exact + 1e-9);
    }
}
