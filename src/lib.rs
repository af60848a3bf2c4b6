// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean set operations on closed triangulated solids.
//!
//! Each operand is refined until no triangle straddles the other
//! solid's surface, every resulting face is classified against the
//! other solid, and the output surface is assembled from the faces
//! each operation selects.

pub mod error;
pub mod geometry;
pub mod io;
pub mod solid;

pub use error::{CsgError, Result};
pub use geometry::{difference, intersection, union, BooleanModeller, BooleanOp, Primitive};
pub use solid::{Solid, SolidBuilder, SolidView};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Color;
    use nalgebra::Vector3;

    #[test]
    fn test_union_of_two_cubes() {
        let a = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(Color::default());
        let mut b = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(Color::default());
        b.translate(0.5, 0.5, 0.5);

        let result = union(&a, &b).unwrap();
        assert!(!result.is_empty());
        assert!((result.volume() - 1.875).abs() < 1e-6);
    }
}
