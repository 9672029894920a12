//! campus — build, repair, and route over a corridor network.
//!
//! Loads the built-in synthetic campus (or a GeoJSON file), repairs its
//! connectivity, builds the obstacle-aware corridor graph, and prints a few
//! routes as JSON.  Set `RUST_LOG=debug` to see each bridge and excluded
//! segment.

mod layers;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde::Deserialize;

use wf_core::Coord;
use wf_repair::{RepairConfig, RepairStatus, repair};
use wf_spatial::{
    AStarRouter, CampusLayers, CorridorGraph, GraphConfig, Router, SearchConfig, WALKING_SPEED_MPS,
    read_geojson,
};

use layers::campus_layers;

// ── Built-in queries ──────────────────────────────────────────────────────────

const ROUTES: &[(&str, (f64, f64), (f64, f64))] = &[
    ("kiosk to east wing", (-88.17995, 30.69002), (-88.1760, 30.6905)),
    ("library to gym", (-88.1785, 30.6911), (-88.1800, 30.6896)),
    ("across the quad", (-88.1799, 30.6910), (-88.1781, 30.6900)),
];

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Corridor and obstacle GeoJSON to load instead of the built-in campus.
    #[arg(long)]
    layers: Option<PathBuf>,

    /// JSON file with optional `graph`, `search`, and `repair` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route start as `lon,lat`.
    #[arg(long, value_parser = parse_coord, requires = "to", allow_hyphen_values = true)]
    from: Option<Coord>,

    /// Route end as `lon,lat`.
    #[arg(long, value_parser = parse_coord, requires = "from", allow_hyphen_values = true)]
    to: Option<Coord>,

    /// Build the graph from the corridors as loaded, without repair.
    #[arg(long)]
    no_repair: bool,

    /// Print each route as a GeoJSON feature.
    #[arg(long)]
    features: bool,
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected lon,lat, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad longitude {x:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad latitude {y:?}: {e}"))?;
    Ok(Coord { x, y })
}

/// Settings read from `--config`; missing sections use the geographic
/// presets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct DemoConfig {
    graph: GraphConfig,
    search: SearchConfig,
    repair: RepairConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::geographic(),
            search: SearchConfig::geographic(),
            repair: RepairConfig::geographic(),
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config: DemoConfig = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => DemoConfig::default(),
    };

    // 1. Layers.
    let layers = match &args.layers {
        Some(path) => CampusLayers::from_geojson(&read_geojson(path)?),
        None => campus_layers()?,
    };
    println!(
        "Layers: {} corridors, {} obstacles, {} skipped",
        layers.corridors.len(),
        layers.obstacles.len(),
        layers.skipped
    );

    // 2. Repair.
    let corridors = if args.no_repair {
        layers.corridors.clone()
    } else {
        let outcome = repair(&layers.corridors, &config.repair)?;
        println!(
            "Repair: {} components, {} bridges",
            outcome.initial_components,
            outcome.bridges.len()
        );
        for bridge in &outcome.bridges {
            println!("  + {bridge}");
        }
        if let RepairStatus::NeedsReview { components } = outcome.status {
            warn!("{components} components remain; some routes will fail");
        }
        outcome.corridors
    };

    // 3. Graph.
    let t0 = Instant::now();
    let graph = CorridorGraph::build(&corridors, &layers.obstacles, &config.graph)?;
    println!("Graph built in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);
    println!("{}", graph.stats());
    println!();

    // 4. Routes.
    let queries: Vec<(String, Coord, Coord)> = match (args.from, args.to) {
        (Some(from), Some(to)) => vec![("query".to_string(), from, to)],
        _ => ROUTES
            .iter()
            .map(|&(name, (ax, ay), (bx, by))| (name.to_string(), Coord { x: ax, y: ay }, Coord { x: bx, y: by }))
            .collect(),
    };

    let router = AStarRouter::new(config.search.clone());
    for (name, from, to) in queries {
        let route = router.find_path(&graph, from, to)?;
        match route.error {
            None => println!(
                "{name}: {:.1} m, {:.1} min walk, {} waypoints",
                route.distance,
                route.walking_minutes(WALKING_SPEED_MPS),
                route.waypoints
            ),
            Some(failure) => println!("{name}: {failure} (straight line {:.1} m)", route.distance),
        }
        let json = if args.features {
            serde_json::to_value(route.to_feature())?
        } else {
            route.to_json()
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    Ok(())
}
