//! Land geometry loading and point containment.
//!
//! Reads land polygons from a shapefile, merges them into a single
//! geometry and indexes its edges for fast repeated containment queries.

mod index;
mod land;
mod loader;

pub use index::{EdgeIndex, EdgeSegment};
pub use land::LandGeometry;
pub use loader::{load_land_geometry, shape_to_multipolygon};

use std::path::PathBuf;

/// Anything that can answer "is this coordinate on land".
///
/// The rasterizer only needs this one primitive, so tests can plug in
/// closures instead of real geometry.
pub trait ContainsPoint: Sync {
    fn contains_point(&self, lat: f64, lng: f64) -> bool;
}

impl<F> ContainsPoint for F
where
    F: Fn(f64, f64) -> bool + Sync,
{
    fn contains_point(&self, lat: f64, lng: f64) -> bool {
        self(lat, lng)
    }
}

/// Errors raised while building the land geometry
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read land polygons from {path}: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("no usable land polygons found")]
    EmptyGeometry,
}
