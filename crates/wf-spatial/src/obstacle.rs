//! Obstacle (building footprint) filtering for candidate edges.
//!
//! A segment is blocked when it touches or crosses any ring of an obstacle,
//! when either endpoint lies inside one, or when its midpoint does.
//! Touching counts: a corridor ending exactly on a wall is excluded.
//!
//! Evaluated at build time only.  Queries never consult obstacles.

use geo::{BoundingRect, Contains, Intersects, Line, Point, Polygon, Rect};

use wf_core::Coord;
use wf_core::coord::midpoint;

/// Obstacles with cached bounding boxes for a cheap reject test.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<(Polygon<f64>, Rect<f64>)>,
}

impl ObstacleSet {
    /// Polygons with an empty exterior ring are dropped.
    pub fn new(polygons: impl IntoIterator<Item = Polygon<f64>>) -> Self {
        let obstacles = polygons
            .into_iter()
            .filter_map(|p| p.bounding_rect().map(|bbox| (p, bbox)))
            .collect();
        Self { obstacles }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// `true` if segment `a`–`b` is blocked by any obstacle.
    pub fn blocks(&self, a: Coord, b: Coord) -> bool {
        let line = Line::new(a, b);
        let seg_bbox = line.bounding_rect();
        self.obstacles
            .iter()
            .filter(|(_, bbox)| rects_overlap(bbox, &seg_bbox))
            .any(|(polygon, _)| polygon_blocks(polygon, line))
    }
}

impl FromIterator<Polygon<f64>> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Polygon<f64>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// One-shot form of [`ObstacleSet::blocks`] over a polygon slice.
pub fn segment_blocked(a: Coord, b: Coord, obstacles: &[Polygon<f64>]) -> bool {
    let line = Line::new(a, b);
    obstacles.iter().any(|polygon| polygon_blocks(polygon, line))
}

fn polygon_blocks(polygon: &Polygon<f64>, line: Line<f64>) -> bool {
    let crosses_ring = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .any(|ring| line.intersects(ring));
    crosses_ring
        || polygon.contains(&Point::from(line.start))
        || polygon.contains(&Point::from(line.end))
        || polygon.contains(&Point::from(midpoint(line.start, line.end)))
}

#[inline]
fn rects_overlap(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x && a.min().y <= b.max().y && b.min().y <= a.max().y
}
