//! The merged land geometry.

use geo::algorithm::bool_ops::unary_union;
use geo::{Area, MultiPolygon, Polygon};
use tracing::info;

use super::{ContainsPoint, EdgeIndex, LoadError};

/// All land on Earth as one merged, indexed multipolygon.
///
/// Built once and never mutated. Coordinates are `x = lng`, `y = lat`.
pub struct LandGeometry {
    merged: MultiPolygon<f64>,
    index: EdgeIndex,
}

impl LandGeometry {
    /// Merge a set of (possibly missing) polygons into one land geometry.
    ///
    /// `None` entries are dropped before the union. Fails with
    /// [`LoadError::EmptyGeometry`] if nothing usable is left.
    pub fn from_polygons<I>(geometries: I) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = Option<MultiPolygon<f64>>>,
    {
        let polygons: Vec<Polygon<f64>> = geometries
            .into_iter()
            .flatten()
            .flat_map(|mp| mp.0)
            .filter(|p| p.exterior().0.len() >= 4)
            .collect();

        if polygons.is_empty() {
            return Err(LoadError::EmptyGeometry);
        }

        info!("Merging {} polygons...", polygons.len());
        let merged = unary_union(&polygons);

        if merged.0.is_empty() || merged.unsigned_area() == 0.0 {
            return Err(LoadError::EmptyGeometry);
        }

        info!("Merged into {} land polygons", merged.0.len());
        let index = EdgeIndex::build(&merged);

        Ok(Self { merged, index })
    }

    /// The merged multipolygon
    pub fn merged(&self) -> &MultiPolygon<f64> {
        &self.merged
    }

    /// Number of polygons after the union
    pub fn polygon_count(&self) -> usize {
        self.merged.0.len()
    }

    /// Number of indexed edges
    pub fn edge_count(&self) -> usize {
        self.index.len()
    }
}

impl ContainsPoint for LandGeometry {
    fn contains_point(&self, lat: f64, lng: f64) -> bool {
        self.index.contains(lng, lat)
    }
}
