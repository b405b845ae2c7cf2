#![deny(unsafe_code)]
//! CLI binary for the cartoflow projection engine.
//!
//! Subcommands:
//! - `project <map>`: densify and project a map through a displacement grid
//! - `list`: print available strategies and warp sources
//! - `search <map>`: diagnostic point search over a coordinate rectangle

mod error;

use cartoflow_core::{GridDims, Point};
use cartoflow_geom::GeoDiv;
use cartoflow_project::{
    point_search, DisplacementGrid, DisplacementSource, Identity, Inset, PerlinWarp, RadialBulge,
    SearchRect, Strategy,
};
use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "cartoflow", about = "Cartogram projection engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Densify a map and project it through a displacement grid.
    Project {
        /// Path to the map JSON ({"lx", "ly", "divs": [...]}).
        map: PathBuf,

        /// Path to a displacement grid JSON ({"lx", "ly", "points": [...]}).
        /// Mutually exclusive with --warp.
        #[arg(long)]
        displacement: Option<PathBuf>,

        /// Synthetic warp source (identity, perlin, bulge) used when no
        /// displacement file is given.
        #[arg(long, default_value = "identity")]
        warp: String,

        /// Seed for the perlin warp.
        #[arg(long, default_value_t = 42)]
        warp_seed: u32,

        /// Strength of the synthetic warp.
        #[arg(long, default_value_t = 0.25)]
        warp_strength: f64,

        /// Spatial scale of the perlin warp.
        #[arg(long, default_value_t = 0.4)]
        warp_scale: f64,

        /// Projection strategy (bilinear, triangulation).
        #[arg(short, long, default_value = "triangulation")]
        strategy: String,

        /// Skip the boundary densification pass.
        #[arg(long)]
        skip_densify: bool,

        /// Round output coordinates to the fixed decimal precision.
        #[arg(long)]
        round: bool,

        /// Output file path.
        #[arg(short, long, default_value = "projected.json")]
        output: PathBuf,
    },
    /// List available strategies and warp sources.
    List,
    /// Report polygon vertices within a coordinate rectangle, with their
    /// graticule cells and chosen diagonals.
    Search {
        /// Path to the map JSON.
        map: PathBuf,

        /// Path to a displacement grid JSON used for the diagonal report.
        #[arg(long)]
        displacement: Option<PathBuf>,

        #[arg(long)]
        x_min: f64,
        #[arg(long)]
        x_max: f64,
        #[arg(long)]
        y_min: f64,
        #[arg(long)]
        y_max: f64,
    },
}

/// Names of the synthetic warp sources.
const WARP_NAMES: &[&str] = &["identity", "perlin", "bulge"];

/// On-disk map representation.
#[derive(Serialize, Deserialize)]
struct MapFile {
    lx: usize,
    ly: usize,
    divs: Vec<GeoDiv>,
}

/// On-disk displacement grid: vertex positions in row-major order
/// (row = constant j).
#[derive(Serialize, Deserialize)]
struct DisplacementFile {
    lx: usize,
    ly: usize,
    points: Vec<Point>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_str(&text)?)
}

fn load_map(path: &Path) -> Result<(GridDims, Vec<GeoDiv>), CliError> {
    let map: MapFile = read_json(path)?;
    let dims = GridDims::new(map.lx, map.ly)?;
    Ok((dims, map.divs))
}

fn load_displacement(path: &Path, dims: GridDims) -> Result<DisplacementGrid, CliError> {
    let file: DisplacementFile = read_json(path)?;
    if file.lx != dims.lx() || file.ly != dims.ly() {
        return Err(CliError::Input(format!(
            "displacement grid is {}x{} but the map grid is {}x{}",
            file.lx,
            file.ly,
            dims.lx(),
            dims.ly()
        )));
    }
    let positions = file.points.into_iter().map(DVec2::from).collect();
    Ok(DisplacementGrid::from_positions(dims, positions)?)
}

fn warp_source(
    name: &str,
    seed: u32,
    strength: f64,
    scale: f64,
    dims: GridDims,
) -> Result<Box<dyn DisplacementSource>, CliError> {
    match name {
        "identity" => Ok(Box::new(Identity)),
        "perlin" => Ok(Box::new(PerlinWarp::new(scale, strength, seed))),
        "bulge" => Ok(Box::new(RadialBulge {
            x: dims.lx() as f64 / 2.0,
            y: dims.ly() as f64 / 2.0,
            strength,
            radius: dims.lx().min(dims.ly()) as f64 / 2.0,
        })),
        _ => Err(CliError::Input(format!("unknown warp source: {name}"))),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_project(
    cli_json: bool,
    map: PathBuf,
    displacement: Option<PathBuf>,
    warp: String,
    warp_seed: u32,
    warp_strength: f64,
    warp_scale: f64,
    strategy: String,
    skip_densify: bool,
    round: bool,
    output: PathBuf,
) -> Result<(), CliError> {
    let strategy = Strategy::from_name(&strategy)?;
    let (dims, divs) = load_map(&map)?;
    let mut inset = Inset::new(dims);
    inset.set_geo_divs(divs);

    let proj = match &displacement {
        Some(path) => load_displacement(path, dims)?,
        None => DisplacementGrid::from_source(
            dims,
            warp_source(&warp, warp_seed, warp_strength, warp_scale, dims)?.as_ref(),
        ),
    };
    inset.set_proj(proj)?;

    if !skip_densify {
        inset.densify();
    }
    let stats = match strategy {
        Strategy::Triangulation => Some(inset.choose_diagonals()?),
        Strategy::Bilinear => None,
    };
    inset.project(strategy)?;
    if round {
        inset.round_geo_divs();
    }
    inset.integration_finished();

    let out_file = MapFile {
        lx: dims.lx(),
        ly: dims.ly(),
        divs: inset.geo_divs().to_vec(),
    };
    fs::write(&output, serde_json::to_string_pretty(&out_file)?)
        .map_err(|e| CliError::Io(format!("{}: {e}", output.display())))?;

    if cli_json {
        let info = serde_json::json!({
            "map": map.display().to_string(),
            "strategy": strategy.name(),
            "lx": dims.lx(),
            "ly": dims.ly(),
            "divs": out_file.divs.len(),
            "concave_cells": stats.map(|s| s.concave_cells),
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        if let Some(stats) = stats {
            eprintln!("concave graticule cells: {}", stats.concave_cells);
        }
        eprintln!(
            "projected {} ({}x{}, {} divs, {}) -> {}",
            map.display(),
            dims.lx(),
            dims.ly(),
            out_file.divs.len(),
            strategy.name(),
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let info = serde_json::json!({
                    "strategies": Strategy::list_names(),
                    "warps": WARP_NAMES,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Strategies:");
                for name in Strategy::list_names() {
                    println!("  {name}");
                }
                println!("Warp sources:");
                println!("  {}", WARP_NAMES.join(", "));
            }
            Ok(())
        }
        Command::Project {
            map,
            displacement,
            warp,
            warp_seed,
            warp_strength,
            warp_scale,
            strategy,
            skip_densify,
            round,
            output,
        } => run_project(
            cli.json,
            map,
            displacement,
            warp,
            warp_seed,
            warp_strength,
            warp_scale,
            strategy,
            skip_densify,
            round,
            output,
        ),
        Command::Search {
            map,
            displacement,
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            let (dims, divs) = load_map(&map)?;
            let mut inset = Inset::new(dims);
            inset.set_geo_divs(divs);
            if let Some(path) = &displacement {
                inset.set_proj(load_displacement(path, dims)?)?;
                inset.choose_diagonals()?;
            }
            let rect = SearchRect {
                x_min,
                x_max,
                y_min,
                y_max,
            };
            let mut stdout = std::io::stdout();
            point_search(&inset, rect, &mut stdout)?;
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
