//! Landmask - a land/water bitmap generator
//!
//! This library rasterizes land polygons onto a lat/lng grid and packs the
//! grid into a compact base64 constant, plus the decoder used to look points
//! up in that constant.

pub mod bitmap;
pub mod encode;
pub mod geometry;
pub mod raster;
pub mod validate;

pub use bitmap::LandBitmap;
pub use geometry::{load_land_geometry, ContainsPoint, LandGeometry, LoadError};
pub use raster::{rasterize, Grid, GridSpec};
pub use validate::{validate, ValidationReport, REFERENCE_POINTS};
