//! Multi-sample rasterization of the land geometry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::info;

use super::{Grid, GridSpec};
use crate::geometry::ContainsPoint;

/// Fractional sub-sample positions within a cell, on both axes.
///
/// A 3x3 pattern catches narrow coastal cells whose center alone falls
/// just offshore.
pub const SUBSAMPLE_OFFSETS: [f64; 3] = [0.17, 0.5, 0.83];

/// Snapshot handed to progress observers after each finished row
#[derive(Debug, Clone, Copy)]
pub struct RasterProgress {
    pub rows_done: usize,
    pub total_rows: usize,
    pub cells_done: usize,
    pub elapsed: Duration,
}

impl RasterProgress {
    pub fn percent(&self) -> f64 {
        self.rows_done as f64 / self.total_rows as f64 * 100.0
    }

    /// Sampled cells per second so far
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.cells_done as f64 / secs
        } else {
            0.0
        }
    }
}

/// Summary of a finished rasterization
#[derive(Debug, Clone, Copy)]
pub struct RasterStats {
    pub land_cells: usize,
    pub total_cells: usize,
    pub elapsed: Duration,
}

impl RasterStats {
    pub fn land_percent(&self) -> f64 {
        self.land_cells as f64 / self.total_cells as f64 * 100.0
    }
}

/// Classify a single cell by testing its sub-sample points.
///
/// Stops at the first sample that hits land.
pub fn sample_cell<G: ContainsPoint + ?Sized>(
    geometry: &G,
    spec: &GridSpec,
    row: usize,
    col: usize,
) -> bool {
    SUBSAMPLE_OFFSETS.iter().any(|yo| {
        let lat = 90.0 - (row as f64 + yo) * spec.res;
        SUBSAMPLE_OFFSETS.iter().any(|xo| {
            let lng = -180.0 + (col as f64 + xo) * spec.res;
            geometry.contains_point(lat, lng)
        })
    })
}

/// Rasterize `geometry` onto a fresh grid.
///
/// Rows are sampled in parallel; every row slice of the output belongs to
/// exactly one task, so the result does not depend on scheduling. The
/// `progress` observer runs once per finished row, from worker threads.
pub fn rasterize<G, F>(geometry: &G, spec: GridSpec, progress: F) -> (Grid, RasterStats)
where
    G: ContainsPoint + ?Sized,
    F: Fn(RasterProgress) + Sync,
{
    info!("Rasterizing {} grid...", spec);

    let started = Instant::now();
    let rows_done = AtomicUsize::new(0);
    let mut grid = Grid::new(spec);

    grid.cells_mut()
        .par_chunks_mut(spec.cols)
        .enumerate()
        .for_each(|(row, cells)| {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = sample_cell(geometry, &spec, row, col);
            }

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            progress(RasterProgress {
                rows_done: done,
                total_rows: spec.rows,
                cells_done: done * spec.cols,
                elapsed: started.elapsed(),
            });
        });

    let stats = RasterStats {
        land_cells: grid.land_count(),
        total_cells: spec.cell_count(),
        elapsed: started.elapsed(),
    };

    info!(
        "Done in {:.1}s. Land cells: {} / {} ({:.1}%)",
        stats.elapsed.as_secs_f64(),
        stats.land_cells,
        stats.total_cells,
        stats.land_percent()
    );

    (grid, stats)
}
