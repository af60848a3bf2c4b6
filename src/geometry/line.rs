// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lines and rays: the intersection constructions behind splitting
//! and ray-trace classification

use super::{nan_point, point_is_nan, TOL};
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// A line or ray: an origin point and a unit direction. NaN components
/// signal an undefined line (e.g. the intersection of parallel
/// planes).
#[derive(Debug, Clone, Copy)]
pub struct Line {
    point: Point3<f64>,
    direction: Vector3<f64>,
}

impl Line {
    /// A ray from `point` along `direction`.
    pub fn new(direction: Vector3<f64>, point: Point3<f64>) -> Self {
        Self {
            point,
            direction: direction.normalize(),
        }
    }

    pub fn undefined() -> Self {
        Self {
            point: nan_point(),
            direction: Vector3::new(f64::NAN, f64::NAN, f64::NAN),
        }
    }

    /// The intersection line of two planes, each given by a normal and
    /// a contained point. Undefined when the planes are parallel.
    ///
    /// A point on the line is found by zeroing the coordinate whose
    /// direction component has the largest magnitude and solving the
    /// remaining 2x2 system of the two plane equations.
    pub fn from_planes(
        normal1: &Vector3<f64>,
        point1: &Point3<f64>,
        normal2: &Vector3<f64>,
        point2: &Point3<f64>,
    ) -> Self {
        let direction = normal1.cross(normal2);
        if direction.norm() < TOL {
            return Self::undefined();
        }

        let d1 = -normal1.dot(&point1.coords);
        let d2 = -normal2.dot(&point2.coords);

        let ax = direction.x.abs();
        let ay = direction.y.abs();
        let az = direction.z.abs();

        let point = if ax >= ay && ax >= az {
            Point3::new(
                0.0,
                (d2 * normal1.z - d1 * normal2.z) / direction.x,
                (d1 * normal2.y - d2 * normal1.y) / direction.x,
            )
        } else if ay >= az {
            Point3::new(
                (d1 * normal2.z - d2 * normal1.z) / direction.y,
                0.0,
                (d2 * normal1.x - d1 * normal2.x) / direction.y,
            )
        } else {
            Point3::new(
                (d2 * normal1.y - d1 * normal2.y) / direction.z,
                (d1 * normal2.x - d2 * normal1.x) / direction.z,
                0.0,
            )
        };

        Self {
            point,
            direction: direction.normalize(),
        }
    }

    pub fn point(&self) -> Point3<f64> {
        self.point
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    pub fn is_nan(&self) -> bool {
        point_is_nan(&self.point)
            || self.direction.x.is_nan()
            || self.direction.y.is_nan()
            || self.direction.z.is_nan()
    }

    /// Signed distance from the line origin to a point assumed to lie
    /// on the line. Negative when the point is behind the direction.
    pub fn signed_distance(&self, other: &Point3<f64>) -> f64 {
        let vec = other - self.point;
        let distance = vec.norm();
        if vec.dot(&self.direction) < 0.0 {
            -distance
        } else {
            distance
        }
    }

    /// The intersection point with another line, assumed coplanar.
    /// NaN when the lines are parallel.
    ///
    /// Solved for the parameter along whichever coordinate pair has a
    /// non-degenerate determinant.
    pub fn line_intersection(&self, other: &Line) -> Point3<f64> {
        let p = self.point;
        let d = self.direction;
        let q = other.point;
        let e = other.direction;

        let t = if (d.y * e.x - d.x * e.y).abs() > TOL {
            (-p.y * e.x + q.y * e.x + e.y * p.x - e.y * q.x) / (d.y * e.x - d.x * e.y)
        } else if (-d.x * e.z + d.z * e.x).abs() > TOL {
            -(-e.z * p.x + e.z * q.x + e.x * p.z - e.x * q.z) / (-d.x * e.z + d.z * e.x)
        } else if (-d.z * e.y + d.y * e.z).abs() > TOL {
            (p.z * e.y - q.z * e.y - e.z * p.y + e.z * q.y) / (-d.z * e.y + d.y * e.z)
        } else {
            return nan_point();
        };

        p + d * t
    }

    /// The intersection point with a plane given by a normal and a
    /// contained point. Returns the line origin when the line lies in
    /// the plane, NaN when the line is parallel to it.
    pub fn plane_intersection(
        &self,
        normal: &Vector3<f64>,
        plane_point: &Point3<f64>,
    ) -> Point3<f64> {
        let d = -normal.dot(&plane_point.coords);
        let numerator = normal.dot(&self.point.coords) + d;
        let denominator = normal.dot(&self.direction);

        if denominator.abs() < TOL {
            if numerator.abs() < TOL {
                self.point
            } else {
                nan_point()
            }
        } else {
            self.point + self.direction * (-numerator / denominator)
        }
    }

    /// Nudges the direction so a ray that fell into a plane no longer
    /// lies in it.
    pub fn perturb_direction<R: Rng>(&mut self, rng: &mut R) {
        self.direction.x += 1e-5 * rng.gen::<f64>();
        self.direction.y += 1e-5 * rng.gen::<f64>();
        self.direction.z += 1e-5 * rng.gen::<f64>();
    }
}
