// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - the boolean kernel and its supporting types

mod bound;
mod boolean;
mod color;
mod face;
mod line;
mod object3d;
mod primitives;
mod segment;
mod vertex;

pub use bound::Bound;
pub use boolean::{difference, intersection, union, BooleanModeller, BooleanOp};
pub use color::Color;
pub use face::{Face, FaceStatus};
pub use line::Line;
pub use object3d::Object3D;
pub use primitives::Primitive;
pub use segment::{EndType, Segment};
pub use vertex::{Vertex, VertexStatus};

use nalgebra::Point3;

/// Tolerance for plane-distance and direction-magnitude comparisons.
pub(crate) const TOL: f64 = 1e-10;

pub(crate) fn nan_point() -> Point3<f64> {
    Point3::new(f64::NAN, f64::NAN, f64::NAN)
}

pub(crate) fn point_is_nan(point: &Point3<f64>) -> bool {
    point.x.is_nan() || point.y.is_nan() || point.z.is_nan()
}
