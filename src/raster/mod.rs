//! Lat/lng grid rasterization.

mod grid;
mod rasterizer;

pub use grid::{Grid, GridError, GridSpec};
pub use rasterizer::{rasterize, sample_cell, RasterProgress, RasterStats, SUBSAMPLE_OFFSETS};
