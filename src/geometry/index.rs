//! Edge index for fast point-in-polygon lookups.

use geo::{CoordsIter, MultiPolygon};
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

/// A single polygon edge, stored as `[lng, lat]` endpoints
#[derive(Debug, Clone, Copy)]
pub struct EdgeSegment {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl EdgeSegment {
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }

    /// Whether an eastward ray from `(x, y)` crosses this edge.
    ///
    /// The half-open comparison on `y` makes a vertex shared by two edges
    /// count exactly once.
    pub fn ray_crosses(&self, x: f64, y: f64) -> bool {
        let [x1, y1] = self.start;
        let [x2, y2] = self.end;

        if (y1 > y) == (y2 > y) {
            return false;
        }

        let x_intersect = x1 + (x2 - x1) * (y - y1) / (y2 - y1);
        x < x_intersect
    }
}

impl RTreeObject for EdgeSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.start[0].min(self.end[0]), self.start[1].min(self.end[1])],
            [self.start[0].max(self.end[0]), self.start[1].max(self.end[1])],
        )
    }
}

/// R-tree over every ring edge of a multipolygon.
///
/// Containment is an even-odd ray cast that only visits the edges whose
/// envelope meets the ray, so a query touches a handful of edges instead
/// of every vertex of a continent.
pub struct EdgeIndex {
    tree: RTree<EdgeSegment>,
    /// `[min_x, min_y, max_x, max_y]` of all edges
    bounds: [f64; 4],
}

impl EdgeIndex {
    /// Build the index from every exterior and interior ring
    pub fn build(geometry: &MultiPolygon<f64>) -> Self {
        let mut edges = Vec::new();
        for polygon in geometry {
            push_ring_edges(polygon.exterior(), &mut edges);
            for hole in polygon.interiors() {
                push_ring_edges(hole, &mut edges);
            }
        }

        let bounds = edges.iter().fold(
            [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY],
            |acc, e| {
                let env = e.envelope();
                [
                    acc[0].min(env.lower()[0]),
                    acc[1].min(env.lower()[1]),
                    acc[2].max(env.upper()[0]),
                    acc[3].max(env.upper()[1]),
                ]
            },
        );

        info!(
            "Building edge index for {} vertices...",
            geometry.coords_count()
        );
        let tree = RTree::bulk_load(edges);
        info!("Edge index built with {} edges", tree.size());

        Self { tree, bounds }
    }

    /// Even-odd containment test for the point `(x, y)`
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let [min_x, min_y, max_x, max_y] = self.bounds;
        if !(x >= min_x && x <= max_x && y >= min_y && y <= max_y) {
            return false;
        }

        let ray = AABB::from_corners([x, y], [max_x, y]);
        let crossings = self
            .tree
            .locate_in_envelope_intersecting(&ray)
            .filter(|edge| edge.ray_crosses(x, y))
            .count();

        crossings % 2 == 1
    }

    /// Number of indexed edges
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn push_ring_edges(ring: &geo::LineString<f64>, edges: &mut Vec<EdgeSegment>) {
    for line in ring.lines() {
        if line.start == line.end {
            continue;
        }
        edges.push(EdgeSegment::new(
            [line.start.x, line.start.y],
            [line.end.x, line.end.y],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square_with_hole() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
                (x: 0.0, y: 0.0),
            ],
            interiors: [[
                (x: 4.0, y: 4.0),
                (x: 6.0, y: 4.0),
                (x: 6.0, y: 6.0),
                (x: 4.0, y: 6.0),
                (x: 4.0, y: 4.0),
            ]],
        )])
    }

    #[test]
    fn test_ray_crosses() {
        let edge = EdgeSegment::new([5.0, 0.0], [5.0, 10.0]);
        assert!(edge.ray_crosses(1.0, 5.0));
        assert!(!edge.ray_crosses(6.0, 5.0));
        assert!(!edge.ray_crosses(1.0, 11.0));
    }

    #[test]
    fn test_horizontal_edge_never_crosses() {
        let edge = EdgeSegment::new([0.0, 5.0], [10.0, 5.0]);
        assert!(!edge.ray_crosses(-1.0, 5.0));
    }

    #[test]
    fn test_contains_respects_holes() {
        let index = EdgeIndex::build(&square_with_hole());
        assert_eq!(index.len(), 8);

        assert!(index.contains(1.0, 1.0));
        assert!(index.contains(8.5, 2.5));
        assert!(!index.contains(5.0, 5.0));
        assert!(!index.contains(-1.0, 5.0));
        assert!(!index.contains(5.0, 12.0));
    }

    #[test]
    fn test_empty_index_contains_nothing() {
        let index = EdgeIndex::build(&MultiPolygon::new(vec![]));
        assert!(index.is_empty());
        assert!(!index.contains(0.0, 0.0));
    }
}
