// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-vertex RGB colour

use serde::{Deserialize, Serialize};

/// Tolerance for colour comparisons (L1 distance).
const COLOR_TOL: f32 = 3e-5;

/// RGB colour attached to a solid vertex. Carried through splitting
/// and re-emitted on output vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// L1 distance under tolerance.
    pub fn approx_eq(&self, other: &Color) -> bool {
        (self.r - other.r).abs() + (self.g - other.g).abs() + (self.b - other.b).abs() < COLOR_TOL
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_within_tolerance() {
        let a = Color::new(0.2, 0.4, 0.6);
        let b = Color::new(0.2 + 1e-6, 0.4 - 1e-6, 0.6);
        assert!(a.approx_eq(&b));
    }

    #[test]
    fn test_approx_eq_each_channel() {
        let a = Color::new(0.2, 0.4, 0.6);
        assert!(!a.approx_eq(&Color::new(0.3, 0.4, 0.6)));
        assert!(!a.approx_eq(&Color::new(0.2, 0.5, 0.6)));
        assert!(!a.approx_eq(&Color::new(0.2, 0.4, 0.7)));
    }
}
