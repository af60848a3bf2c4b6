// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solid boolean CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use solidcsg::geometry::{BooleanModeller, BooleanOp, Color};
use solidcsg::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "solidcsg")]
#[command(about = "Boolean operations on triangulated solids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Union of two solids
    Union {
        a: PathBuf,
        b: PathBuf,

        /// Output solid file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Intersection of two solids
    Intersection {
        a: PathBuf,
        b: PathBuf,

        /// Output solid file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Difference of two solids (A minus B)
    Difference {
        a: PathBuf,
        b: PathBuf,

        /// Output solid file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the volume of a solid
    Volume { input: PathBuf },

    /// Print solid statistics
    Info {
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Union { a, b, output } => {
            operation_command(BooleanOp::Union, a, b, output, cli.verbose)
        }
        Commands::Intersection { a, b, output } => {
            operation_command(BooleanOp::Intersection, a, b, output, cli.verbose)
        }
        Commands::Difference { a, b, output } => {
            operation_command(BooleanOp::Difference, a, b, output, cli.verbose)
        }
        Commands::Volume { input } => {
            let solid = io::read_solid(input, Color::default())?;
            println!("{}", solid.volume());
            Ok(())
        }
        Commands::Info { input, json } => info_command(input, *json),
    }
}

fn operation_command(
    op: BooleanOp,
    a: &Path,
    b: &Path,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    let first = io::read_solid(a, Color::default())?;
    let second = io::read_solid(b, Color::default())?;

    if verbose {
        println!("A: {} vertices, {} triangles", first.vertex_count(), first.triangle_count());
        println!("B: {} vertices, {} triangles", second.vertex_count(), second.triangle_count());
    }

    let start = std::time::Instant::now();
    let modeller = BooleanModeller::new(&first, &second)?;
    let result = modeller.evaluate(op);
    let elapsed = start.elapsed();

    io::write_solid(output, &result)?;

    if verbose {
        println!("Evaluated in {:.2?}", elapsed);
        println!("Result: {} vertices, {} triangles", result.vertex_count(), result.triangle_count());
        println!("Volume: {}", result.volume());
    }
    println!(
        "{} {} -> {}",
        "Wrote".green(),
        describe(op),
        output.display()
    );
    Ok(())
}

fn describe(op: BooleanOp) -> &'static str {
    match op {
        BooleanOp::Union => "union",
        BooleanOp::Intersection => "intersection",
        BooleanOp::Difference => "difference",
    }
}

fn info_command(input: &Path, json: bool) -> Result<()> {
    let solid = io::read_solid(input, Color::default())?;
    let bound = solid.bound();

    if json {
        let report = serde_json::json!({
            "vertices": solid.vertex_count(),
            "triangles": solid.triangle_count(),
            "volume": solid.volume(),
            "bound": {
                "min": [bound.min.x, bound.min.y, bound.min.z],
                "max": [bound.max.x, bound.max.y, bound.max.z],
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", input.display().to_string().bold());
    print_stat("Vertices", &solid.vertex_count().to_string());
    print_stat("Triangles", &solid.triangle_count().to_string());
    print_stat("Volume", &format!("{:.6}", solid.volume()));
    print_stat(
        "Bound",
        &format!(
            "[{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            bound.min.x, bound.min.y, bound.min.z, bound.max.x, bound.max.y, bound.max.z
        ),
    );
    if solid.is_empty() {
        println!("  {}", "empty solid".yellow());
    }
    Ok(())
}

fn print_stat(label: &str, value: &str) {
    println!("  {} {}", format!("{label}:").bright_black(), value.cyan());
}
