// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Axis-aligned bounds with tolerant overlap

use super::TOL;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// The extremes of a face or solid along each coordinate axis. Used to
/// prune face pairs before the expensive intersection tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bound {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bound {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut bound = Self::empty();
        for point in points {
            bound.expand_to_include(&point);
        }
        bound
    }

    pub fn from_triangle(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Self {
        let mut bound = Self::empty();
        bound.expand_to_include(p1);
        bound.expand_to_include(p2);
        bound.expand_to_include(p3);
        bound
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Tolerant overlap test. An empty bound overlaps nothing.
    pub fn overlap(&self, other: &Bound) -> bool {
        !(self.min.x > other.max.x + TOL
            || self.max.x < other.min.x - TOL
            || self.min.y > other.max.y + TOL
            || self.max.y < other.min.y - TOL
            || self.min.z > other.max.z + TOL
            || self.max.z < other.min.z - TOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bound = Bound::from_points([
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-1.0, -2.0, -3.0),
        ]);
        assert_eq!(bound.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bound.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_overlap() {
        let a = Bound::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]);
        let b = Bound::from_points([Point3::new(0.5, 0.5, 0.5), Point3::new(2.0, 2.0, 2.0)]);
        let c = Bound::from_points([Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0)]);
        assert!(a.overlap(&b));
        assert!(b.overlap(&a));
        assert!(!a.overlap(&c));
    }

    #[test]
    fn test_touching_bounds_overlap() {
        // shared plane counts as overlap under the tolerance
        let a = Bound::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]);
        let b = Bound::from_points([Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)]);
        assert!(a.overlap(&b));
    }

    #[test]
    fn test_empty_overlaps_nothing() {
        let a = Bound::from_points([Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)]);
        assert!(!Bound::empty().overlap(&a));
        assert!(!a.overlap(&Bound::empty()));
    }
}
