//! Land bitmap generator.
//!
//! Loads land polygons, rasterizes them onto a lat/lng grid, checks the
//! grid against known points and prints the encoded bitmap as a JavaScript
//! constant.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use landmask::encode::encode_grid;
use landmask::raster::RasterProgress;
use landmask::{load_land_geometry, rasterize, validate, GridSpec, REFERENCE_POINTS};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(about = "Generate an RLE + base64 land/water bitmap from land polygons")]
struct Args {
    /// Land polygon shapefile
    #[arg(short, long, default_value = "ne_50m_land/ne_50m_land.shp")]
    shapefile: PathBuf,

    /// Degrees per grid cell
    #[arg(long, default_value = "0.1")]
    res: f64,

    /// Grid rows (derived from --res when omitted)
    #[arg(long, requires = "cols")]
    rows: Option<usize>,

    /// Grid columns (derived from --res when omitted)
    #[arg(long, requires = "rows")]
    cols: Option<usize>,

    /// Write the constant to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads for rasterization (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Exit non-zero if any validation check fails
    #[arg(long)]
    strict: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn grid_spec(&self) -> Result<GridSpec> {
        let spec = match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => GridSpec::new(rows, cols, self.res)?,
            _ => GridSpec::with_resolution(self.res)?,
        };
        Ok(spec)
    }
}

fn main() -> Result<()> {
    // Stdout carries the bitmap, so diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let spec = args.grid_spec().context("Invalid grid configuration")?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    info!("Landmask Generator");
    info!("Shapefile: {}", args.shapefile.display());

    let land = load_land_geometry(&args.shapefile).context("Failed to load land polygons")?;
    info!(
        "Land geometry ready: {} polygons, {} edges",
        land.polygon_count(),
        land.edge_count()
    );

    let pb = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(spec.rows as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let log_every = (spec.rows / 10).max(1);
    let report_progress = |p: RasterProgress| {
        pb.inc(1);
        if p.rows_done % log_every == 0 {
            pb.suspend(|| {
                info!(
                    "  {:.0}% ({}/{} rows, {:.0} pts/s)",
                    p.percent(),
                    p.rows_done,
                    p.total_rows,
                    p.rate()
                )
            });
        }
    };

    let (grid, _stats) = rasterize(&land, spec, report_progress);
    pb.finish_and_clear();

    let report = validate(&grid, REFERENCE_POINTS);

    let encoded = encode_grid(&grid);
    let line = encoded.js_constant();

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", line))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", line).context("Failed to write to stdout")?;
        }
    }
    info!("  Output: {} character JS constant", encoded.base64.len());

    if !report.all_passed() {
        if args.strict {
            anyhow::bail!("validation failed for {} points", report.failures().count());
        }
        warn!("WARNING: Some validation checks failed!");
    }

    Ok(())
}
