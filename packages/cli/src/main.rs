#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line runner for launch-site threat analysis.
//!
//! Loads the four GeoJSON input layers, runs one analysis around the
//! target point, and writes the scored feature collection as JSON to
//! stdout or a file.

mod layers;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use skysweep_pipeline::{AnalysisConfig, AnalysisInput, analyze};
use skysweep_scoring::{CompositeWeights, ScoringModel};
use skysweep_server_models::AnalysisRequest;

/// Analyze drone launch-site threats around a target point.
#[derive(Parser)]
#[command(name = "skysweep")]
#[command(about = "Launch-site threat analysis over GeoJSON layers")]
struct Cli {
    /// Target latitude (WGS84 degrees).
    #[arg(long)]
    lat: f64,

    /// Target longitude (WGS84 degrees).
    #[arg(long)]
    lon: f64,

    /// Search radius in meters.
    #[arg(long, default_value_t = 1000.0)]
    radius: f64,

    /// Building footprint layer (GeoJSON).
    #[arg(long)]
    buildings: PathBuf,

    /// Vegetation/open-land layer (GeoJSON).
    #[arg(long)]
    vegetation: PathBuf,

    /// Security location layer (GeoJSON).
    #[arg(long)]
    security: PathBuf,

    /// Road layer (GeoJSON).
    #[arg(long)]
    roads: PathBuf,

    /// Elevation service base URL. Omit to skip elevation lookups and
    /// score with a flat 0.0 elevation.
    #[arg(long)]
    elevation_url: Option<String>,

    /// Scoring model.
    #[arg(long, value_enum, default_value_t = Model::Composite)]
    model: Model,

    /// Output file. Writes to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Selectable scoring model names.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    /// Seven-factor weighted composite.
    Composite,
    /// Legacy 60/40 access/stealth heuristic.
    AccessStealth,
}

impl From<Model> for ScoringModel {
    fn from(model: Model) -> Self {
        match model {
            Model::Composite => Self::Composite(CompositeWeights::standard()),
            Model::AccessStealth => Self::AccessStealth,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let input = AnalysisInput {
        buildings: layers::load_buildings(&cli.buildings)?,
        vegetation: layers::load_vegetation(&cli.vegetation)?,
        security: layers::load_security(&cli.security)?,
        road_segments: layers::load_roads(&cli.roads)?,
    };
    let request = AnalysisRequest {
        lat: cli.lat,
        lon: cli.lon,
        radius_meters: cli.radius,
    };
    let config = AnalysisConfig {
        model: cli.model.into(),
        elevation_base_url: cli.elevation_url,
        deadline: None,
    };

    let response = analyze(&request, input, &config).await?;

    log::info!(
        "{} candidates scored ({} critical, {} high)",
        response.stats.total_candidates,
        response.stats.critical_count,
        response.stats.high_count
    );

    let json = serde_json::to_string_pretty(&response)?;
    match cli.output {
        Some(path) => std::fs::write(&path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
