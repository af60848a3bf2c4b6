// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solid text format: vertex count, one `x y z` line per vertex,
//! triangle count, one index triple per triangle. Whitespace
//! separated ASCII.

use crate::geometry::Color;
use crate::solid::{Solid, SolidView};
use anyhow::{Context, Result};
use nalgebra::Point3;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Reads a solid from a coordinate file, colouring every vertex with
/// `color`.
pub fn read_solid(path: &Path, color: Color) -> Result<Solid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read solid file: {}", path.display()))?;
    parse_solid(&text, color).with_context(|| format!("in solid file: {}", path.display()))
}

/// Writes a solid to a coordinate file.
pub fn write_solid(path: &Path, solid: &Solid) -> Result<()> {
    fs::write(path, format_solid(solid))
        .with_context(|| format!("failed to write solid file: {}", path.display()))
}

/// Parses the coordinate format from a string.
pub fn parse_solid(text: &str, color: Color) -> Result<Solid> {
    let mut tokens = text.split_whitespace();

    let vertex_count: usize = take(&mut tokens, "vertex count")?
        .parse()
        .context("invalid vertex count")?;
    let mut vertices = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let x = take_f64(&mut tokens, i, "x")?;
        let y = take_f64(&mut tokens, i, "y")?;
        let z = take_f64(&mut tokens, i, "z")?;
        vertices.push(Point3::new(x, y, z));
    }

    let triangle_count: usize = take(&mut tokens, "triangle count")?
        .parse()
        .context("invalid triangle count")?;
    let mut indices = Vec::with_capacity(triangle_count * 3);
    for i in 0..triangle_count {
        for _ in 0..3 {
            let index: usize = take(&mut tokens, "triangle index")?
                .parse()
                .with_context(|| format!("invalid index in triangle {i}"))?;
            indices.push(index);
        }
    }

    Ok(Solid::from_arrays_uniform(vertices, indices, color)?)
}

/// Formats a solid in the coordinate format.
pub fn format_solid(solid: &Solid) -> String {
    let mut out = String::new();
    let positions = solid.positions();
    let indices = solid.indices();

    let _ = writeln!(out, "{}", positions.len());
    for position in positions {
        let _ = writeln!(out, "{} {} {}", position.x, position.y, position.z);
    }
    let _ = writeln!(out, "{}", indices.len() / 3);
    for triangle in indices.chunks_exact(3) {
        let _ = writeln!(out, "{} {} {}", triangle[0], triangle[1], triangle[2]);
    }
    out
}

fn take<'a, I>(tokens: &mut I, what: &str) -> Result<&'a str>
where
    I: Iterator<Item = &'a str>,
{
    tokens
        .next()
        .with_context(|| format!("unexpected end of input reading {what}"))
}

fn take_f64<'a, I>(tokens: &mut I, vertex: usize, coordinate: &str) -> Result<f64>
where
    I: Iterator<Item = &'a str>,
{
    take(tokens, "vertex coordinate")?
        .parse()
        .with_context(|| format!("invalid {coordinate} coordinate in vertex {vertex}"))
}
