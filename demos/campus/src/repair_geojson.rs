//! repair_geojson — connect a corridor GeoJSON into one network.
//!
//! Reads a FeatureCollection, appends tagged bridge corridors until the
//! `LineString` features form one connected component, and writes the
//! result next to the input.  Every input feature is kept as is.
//!
//! ```text
//! repair_geojson corridors.geojson --geographic --near-miss best-match --audit bridges.csv
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::warn;

use wf_repair::{NearMissConfig, NearMissMode, RepairConfig, RepairStatus, read_collection, repair, write_audit_csv};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NearMiss {
    Off,
    AllPairs,
    BestMatch,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input corridor FeatureCollection.
    input: PathBuf,

    /// Output path; defaults to `<input stem>_repaired.geojson`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a CSV row per added bridge.
    #[arg(long)]
    audit: Option<PathBuf>,

    /// Join near-miss dead ends before bridging components.
    #[arg(long, value_enum, default_value_t = NearMiss::Off)]
    near_miss: NearMiss,

    /// Input is lon/lat; measure distances and thresholds in metres.
    #[arg(long)]
    geographic: bool,

    /// Stop bridging after this many iterations.
    #[arg(long)]
    max_iterations: Option<usize>,
}

impl Args {
    fn repair_config(&self) -> RepairConfig {
        let (base, near) = if self.geographic {
            (RepairConfig::geographic(), NearMissConfig::geographic())
        } else {
            (RepairConfig::default(), NearMissConfig::default())
        };
        let mode = match self.near_miss {
            NearMiss::Off => None,
            NearMiss::AllPairs => Some(NearMissMode::AllPairs),
            NearMiss::BestMatch => Some(NearMissMode::BestMatch),
        };
        RepairConfig {
            near_miss: mode.map(|mode| NearMissConfig { mode, ..near }),
            max_iterations: self.max_iterations,
            ..base
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self.input.file_stem().and_then(|s| s.to_str()).unwrap_or("corridors");
            self.input.with_file_name(format!("{stem}_repaired.geojson"))
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut doc = read_collection(&args.input)?;
    if doc.skipped() > 0 {
        warn!("{} malformed corridor lines left unrepaired", doc.skipped());
    }

    let outcome = repair(doc.corridors(), &args.repair_config())?;
    doc.append_bridges(&outcome.bridges);

    let output = args.output_path();
    doc.write(&output)?;
    println!("Wrote {} ({} features)", output.display(), doc.feature_count());

    if let Some(audit) = &args.audit {
        write_audit_csv(audit, &outcome.bridges)?;
        println!("Wrote {} ({} bridges)", audit.display(), outcome.bridges.len());
    }

    println!(
        "{} components -> {} bridges in {} iterations",
        outcome.initial_components,
        outcome.bridges.len(),
        outcome.iterations
    );
    match outcome.status {
        RepairStatus::Connected => println!("Status: connected"),
        RepairStatus::NeedsReview { components } => {
            println!("Status: needs review ({components} components remain)")
        }
    }
    Ok(())
}
