// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean operations: operation table, modeller and entry points
//!
//! Two working meshes are built from the operands, split against each
//! other, classified, and the faces selected per operation are
//! assembled into the output solid.

use super::{FaceStatus, Object3D};
use crate::error::Result;
use crate::solid::{Solid, SolidBuilder, SolidView};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

/// Seed for the ray-perturbation source, fixed so runs are
/// deterministic.
const PERTURB_SEED: u64 = 0x1986;

/// A boolean set operation on two solids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    Difference,
}

/// Which face statuses each operand contributes to an operation's
/// result, and whether the second operand's inside faces are flipped
/// first.
struct Selection {
    from_first: &'static [FaceStatus],
    from_second: &'static [FaceStatus],
    invert_second_inside: bool,
}

impl BooleanOp {
    fn selection(self) -> Selection {
        match self {
            BooleanOp::Union => Selection {
                from_first: &[FaceStatus::Outside, FaceStatus::Same],
                from_second: &[FaceStatus::Outside],
                invert_second_inside: false,
            },
            BooleanOp::Intersection => Selection {
                from_first: &[FaceStatus::Inside, FaceStatus::Same],
                from_second: &[FaceStatus::Inside],
                invert_second_inside: false,
            },
            BooleanOp::Difference => Selection {
                from_first: &[FaceStatus::Outside, FaceStatus::Opposite],
                from_second: &[FaceStatus::Inside],
                invert_second_inside: true,
            },
        }
    }
}

/// Applies boolean operations to a prepared pair of solids.
///
/// The splitting and classification work happens once in `new`; each
/// operation afterwards only selects and re-indexes faces, so several
/// operations on the same pair share the expensive part.
pub struct BooleanModeller {
    object1: Object3D,
    object2: Object3D,
}

impl BooleanModeller {
    pub fn new<A, B>(first: &A, second: &B) -> Result<Self>
    where
        A: SolidView + ?Sized,
        B: SolidView + ?Sized,
    {
        let mut object1 = Object3D::from_view(first);
        let mut object2 = Object3D::from_view(second);
        let mut rng = StdRng::seed_from_u64(PERTURB_SEED);

        object1.split_faces(&object2)?;
        object2.split_faces(&object1)?;
        object1.classify_faces(&object2, &mut rng)?;
        object2.classify_faces(&object1, &mut rng)?;

        Ok(Self { object1, object2 })
    }

    pub fn union(&self) -> Solid {
        self.compose(BooleanOp::Union)
    }

    pub fn intersection(&self) -> Solid {
        self.compose(BooleanOp::Intersection)
    }

    pub fn difference(&self) -> Solid {
        self.compose(BooleanOp::Difference)
    }

    pub fn evaluate(&self, op: BooleanOp) -> Solid {
        self.compose(op)
    }

    fn compose(&self, op: BooleanOp) -> Solid {
        let selection = op.selection();
        let mut result = Solid::new();

        collect_faces(&self.object1, selection.from_first, &mut result);
        if selection.invert_second_inside {
            let mut second = self.object2.clone();
            second.invert_inside_faces();
            collect_faces(&second, selection.from_second, &mut result);
        } else {
            collect_faces(&self.object2, selection.from_second, &mut result);
        }
        result
    }
}

/// Emits the faces of `object` whose status is in `statuses`,
/// re-indexing their vertices into the builder.
fn collect_faces<B: SolidBuilder>(object: &Object3D, statuses: &[FaceStatus], builder: &mut B) {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    for face in object.faces() {
        if !statuses.contains(&face.status) {
            continue;
        }
        let mut triangle = [0usize; 3];
        for (slot, &v) in face.v.iter().enumerate() {
            let index = *remap.entry(v).or_insert_with(|| {
                let vertex = object.vertex(v);
                builder.add_vertex(vertex.position, vertex.color)
            });
            triangle[slot] = index;
        }
        builder.add_triangle(triangle[0], triangle[1], triangle[2]);
    }
}

/// Union of two solids.
pub fn union<A, B>(first: &A, second: &B) -> Result<Solid>
where
    A: SolidView + ?Sized,
    B: SolidView + ?Sized,
{
    Ok(BooleanModeller::new(first, second)?.union())
}

/// Intersection of two solids.
pub fn intersection<A, B>(first: &A, second: &B) -> Result<Solid>
where
    A: SolidView + ?Sized,
    B: SolidView + ?Sized,
{
    Ok(BooleanModeller::new(first, second)?.intersection())
}

/// Difference of two solids (first minus second).
pub fn difference<A, B>(first: &A, second: &B) -> Result<Solid>
where
    A: SolidView + ?Sized,
    B: SolidView + ?Sized,
{
    Ok(BooleanModeller::new(first, second)?.difference())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Primitive};
    use nalgebra::Vector3;

    fn unit_cube() -> Solid {
        Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(Color::default())
    }

    #[test]
    fn test_modeller_shares_preparation() {
        let a = unit_cube();
        let mut b = unit_cube();
        b.translate(0.5, 0.0, 0.0);

        let modeller = BooleanModeller::new(&a, &b).unwrap();
        let union = modeller.union();
        let intersection = modeller.intersection();
        let difference = modeller.difference();

        assert!((union.volume() - 1.5).abs() < 1e-6);
        assert!((intersection.volume() - 0.5).abs() < 1e-6);
        assert!((difference.volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_matches_named_operations() {
        let a = unit_cube();
        let mut b = unit_cube();
        b.translate(0.5, 0.0, 0.0);
        let modeller = BooleanModeller::new(&a, &b).unwrap();

        assert_eq!(
            modeller.evaluate(BooleanOp::Union).triangle_count(),
            modeller.union().triangle_count()
        );
        assert_eq!(
            modeller.evaluate(BooleanOp::Difference).triangle_count(),
            modeller.difference().triangle_count()
        );
    }

    #[test]
    fn test_output_preserves_colors() {
        let red = Color::new(1.0, 0.0, 0.0);
        let blue = Color::new(0.0, 0.0, 1.0);
        let a = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(red);
        let mut b = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_solid(blue);
        b.translate(0.5, 0.0, 0.0);

        let result = union(&a, &b).unwrap();
        assert!(result.colors().iter().any(|c| c.approx_eq(&red)));
        assert!(result.colors().iter().any(|c| c.approx_eq(&blue)));
    }
}
