//! Point lookups against a generated land bitmap.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use landmask::{validate, GridSpec, LandBitmap, REFERENCE_POINTS};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Look up points in a generated land bitmap")]
struct Args {
    /// File containing the emitted constant (or a bare base64 string)
    #[arg(short, long)]
    bitmap: PathBuf,

    /// Degrees per grid cell the bitmap was generated with
    #[arg(long, default_value = "0.1")]
    res: f64,

    /// Latitude to look up
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude to look up
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Re-run the reference point checks against the bitmap
    #[arg(long)]
    validate: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LookupResponse {
    lat: f64,
    lng: f64,
    row: usize,
    col: usize,
    land: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let spec = GridSpec::with_resolution(args.res).context("Invalid grid resolution")?;

    let text = fs::read_to_string(&args.bitmap)
        .with_context(|| format!("Failed to read {}", args.bitmap.display()))?;
    let bitmap = LandBitmap::parse_constant(&text, spec).context("Failed to decode bitmap")?;
    info!(
        "Loaded {} bitmap ({} land cells)",
        spec,
        bitmap.grid().land_count()
    );

    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let (row, col) = spec.cell_index(lat, lng);
        let response = LookupResponse {
            lat,
            lng,
            row,
            col,
            land: bitmap.is_land(lat, lng),
        };

        if args.json {
            println!("{}", serde_json::to_string(&response)?);
        } else {
            println!("{}", if response.land { "land" } else { "water" });
        }
    }

    if args.validate {
        let report = validate(bitmap.grid(), REFERENCE_POINTS);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        if !report.all_passed() {
            anyhow::bail!(
                "validation failed for {} points",
                report.failures().count()
            );
        }
    }

    Ok(())
}
