//! Shapefile reading.

use std::path::Path;

use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use shapefile::{PolygonRing, Shape, ShapeReader};
use tracing::{debug, info};

use super::{LandGeometry, LoadError};

/// Load every polygon in a shapefile and merge them into one land geometry.
///
/// Null shapes are skipped. Non-polygon shapes are skipped with a debug log.
pub fn load_land_geometry(path: &Path) -> Result<LandGeometry, LoadError> {
    info!("Loading land polygons from {}", path.display());

    let data_source = |source| LoadError::DataSource {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ShapeReader::from_path(path).map_err(data_source)?;

    let mut geometries = Vec::new();
    let mut null_count = 0usize;

    for (idx, result) in reader.iter_shapes().enumerate() {
        let shape = result.map_err(data_source)?;
        let geometry = shape_to_multipolygon(&shape);
        match (&shape, &geometry) {
            (Shape::NullShape, _) => null_count += 1,
            (_, None) => {
                debug!("Skipping non-polygon shape #{}: {:?}", idx, shape.shapetype())
            }
            _ => {}
        }
        geometries.push(geometry);
    }

    info!("Read {} shapes ({} null)", geometries.len(), null_count);

    LandGeometry::from_polygons(geometries)
}

/// Convert a shapefile shape into a multipolygon.
///
/// Returns `None` for null and non-polygon shapes. Every outer ring starts
/// a new polygon; each inner ring becomes a hole of the outer ring that
/// contains it, or of the most recent outer ring if none does.
pub fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    let rings: Vec<(bool, Vec<Coord<f64>>)> = match shape {
        Shape::Polygon(poly) => poly
            .rings()
            .iter()
            .map(|ring| {
                let coords = ring.points().iter().map(|p| Coord { x: p.x, y: p.y });
                (is_outer(ring), coords.collect())
            })
            .collect(),
        Shape::PolygonM(poly) => poly
            .rings()
            .iter()
            .map(|ring| {
                let coords = ring.points().iter().map(|p| Coord { x: p.x, y: p.y });
                (is_outer(ring), coords.collect())
            })
            .collect(),
        Shape::PolygonZ(poly) => poly
            .rings()
            .iter()
            .map(|ring| {
                let coords = ring.points().iter().map(|p| Coord { x: p.x, y: p.y });
                (is_outer(ring), coords.collect())
            })
            .collect(),
        _ => return None,
    };

    let polygons = assemble_polygons(rings);
    if polygons.is_empty() {
        return None;
    }

    Some(MultiPolygon::new(polygons))
}

fn is_outer<P>(ring: &PolygonRing<P>) -> bool {
    matches!(ring, PolygonRing::Outer(_))
}

fn assemble_polygons(rings: Vec<(bool, Vec<Coord<f64>>)>) -> Vec<Polygon<f64>> {
    let mut outers: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for (outer, coords) in rings {
        // Shorter rings cannot enclose any area.
        if coords.len() < 3 {
            continue;
        }
        let ring = LineString::new(coords);

        if outer {
            outers.push((ring, Vec::new()));
            continue;
        }

        let probe = Point::from(ring.0[0]);
        let owner = outers
            .iter()
            .rposition(|(exterior, _)| Polygon::new(exterior.clone(), vec![]).contains(&probe))
            .or_else(|| outers.len().checked_sub(1));

        match owner {
            Some(i) => outers[i].1.push(ring),
            None => debug!("Dropping hole with no enclosing outer ring"),
        }
    }

    outers
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ContainsPoint;
    use shapefile::{Point as ShpPoint, Polygon as ShpPolygon, ShapeWriter};

    fn ring(coords: &[(f64, f64)]) -> Vec<ShpPoint> {
        coords.iter().map(|&(x, y)| ShpPoint::new(x, y)).collect()
    }

    fn coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_null_shape_is_none() {
        assert!(shape_to_multipolygon(&Shape::NullShape).is_none());
    }

    #[test]
    fn test_point_shape_is_none() {
        let shape = Shape::Point(ShpPoint::new(1.0, 2.0));
        assert!(shape_to_multipolygon(&shape).is_none());
    }

    #[test]
    fn test_polygon_shape_converts() {
        let poly = ShpPolygon::new(PolygonRing::Outer(ring(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ])));
        let mp = shape_to_multipolygon(&Shape::Polygon(poly)).unwrap();
        assert_eq!(mp.0.len(), 1);
        assert!(mp.contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_holes_attach_to_enclosing_outer() {
        let left = coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
        let right = coords(&[(20.0, 0.0), (20.0, 10.0), (30.0, 10.0), (30.0, 0.0), (20.0, 0.0)]);
        let hole = coords(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)]);
        let rings = vec![(true, left), (true, right), (false, hole)];
        let polygons = assemble_polygons(rings);

        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].interiors().len(), 1);
        assert!(polygons[1].interiors().is_empty());
    }

    #[test]
    fn test_orphan_hole_is_dropped() {
        let rings = vec![(false, coords(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 4.0)]))];
        assert!(assemble_polygons(rings).is_empty());
    }

    #[test]
    fn test_missing_file_is_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_land_geometry(&dir.path().join("nope.shp"));
        assert!(matches!(result, Err(LoadError::DataSource { .. })));
    }

    #[test]
    fn test_garbage_file_is_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.shp");
        std::fs::write(&path, b"definitely not a shapefile").unwrap();

        let result = load_land_geometry(&path);
        assert!(matches!(result, Err(LoadError::DataSource { .. })));
    }

    #[test]
    fn test_load_written_shapefile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("land.shp");

        let polygons = vec![
            ShpPolygon::new(PolygonRing::Outer(ring(&[
                (0.0, 0.0),
                (0.0, 10.0),
                (10.0, 10.0),
                (10.0, 0.0),
                (0.0, 0.0),
            ]))),
            ShpPolygon::new(PolygonRing::Outer(ring(&[
                (5.0, 5.0),
                (5.0, 15.0),
                (15.0, 15.0),
                (15.0, 5.0),
                (5.0, 5.0),
            ]))),
        ];
        {
            let mut writer = ShapeWriter::from_path(&path).unwrap();
            for polygon in &polygons {
                writer.write_shape(polygon).unwrap();
            }
        }

        let land = load_land_geometry(&path).unwrap();
        assert_eq!(land.polygon_count(), 1);
        assert!(land.contains_point(7.0, 7.0));
        assert!(land.contains_point(12.0, 12.0));
        assert!(!land.contains_point(2.0, 12.0));
    }
}
