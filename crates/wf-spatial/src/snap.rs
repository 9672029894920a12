//! Point-to-graph snapping.
//!
//! Two candidates are compared: the nearest graph node (R-tree lookup) and
//! the nearest point on any routable corridor segment (linear scan in
//! corridor/segment order, first strict minimum wins).  The segment point
//! wins only when strictly closer; if it coincides with an existing node by
//! key, that node is used instead of a new temporary one.

use geo::{Closest, ClosestPoint, Line, Point};
use log::trace;

use wf_core::{Coord, CorridorId, NodeId, ensure_finite};

use crate::network::CorridorGraph;
use crate::{SpatialError, SpatialResult};

/// Slack when deciding that the nearest node lies on the nearest segment.
const ON_SEGMENT_EPS: f64 = 1e-9;

/// Where a query point landed on a corridor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentSnap {
    pub corridor: CorridorId,
    /// Segment index within the corridor.
    pub segment: usize,
    /// The projected point.
    pub point: Coord,
    /// Planar distance from the segment start to `point`; orders two snaps
    /// on the same segment.
    pub offset: f64,
}

/// Graph location a query resolves to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SnapTarget {
    /// An existing graph node.
    Node(NodeId),
    /// A point on a segment that is not a node; materialized per query.
    Projected(Coord),
}

/// Result of [`snap`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snap {
    pub target: SnapTarget,
    /// Position of the snapped location.
    pub coord: Coord,
    /// Metric distance from the query point to `coord`.
    pub distance: f64,
    /// The nearest segment projection, when the snapped location lies on a
    /// corridor segment.
    pub on_segment: Option<SegmentSnap>,
}

impl Snap {
    pub fn node(&self) -> Option<NodeId> {
        match self.target {
            SnapTarget::Node(id) => Some(id),
            SnapTarget::Projected(_) => None,
        }
    }
}

/// Snap `point` onto `graph`.
///
/// Fails with [`SpatialError::NoGraph`] when the graph has no nodes.
pub fn snap(graph: &CorridorGraph, point: Coord) -> SpatialResult<Snap> {
    ensure_finite(point)?;
    let (node, node_dist) = graph.nearest_node(point).ok_or(SpatialError::NoGraph)?;

    let snapped = match nearest_on_segments(graph, point) {
        Some((seg, seg_dist)) if seg_dist < node_dist => match graph.node_at(seg.point) {
            Some(existing) => Snap {
                target: SnapTarget::Node(existing),
                coord: graph.node_position(existing),
                distance: seg_dist,
                on_segment: Some(seg),
            },
            None => Snap {
                target: SnapTarget::Projected(seg.point),
                coord: seg.point,
                distance: seg_dist,
                on_segment: Some(seg),
            },
        },
        Some((seg, seg_dist)) if seg_dist <= node_dist + ON_SEGMENT_EPS => Snap {
            target: SnapTarget::Node(node),
            coord: graph.node_position(node),
            distance: node_dist,
            on_segment: Some(seg),
        },
        _ => Snap {
            target: SnapTarget::Node(node),
            coord: graph.node_position(node),
            distance: node_dist,
            on_segment: None,
        },
    };

    trace!(
        "snap ({}, {}) -> {:?} at distance {}",
        point.x, point.y, snapped.target, snapped.distance
    );
    Ok(snapped)
}

/// Closest point on any routable segment and its metric distance.
fn nearest_on_segments(graph: &CorridorGraph, point: Coord) -> Option<(SegmentSnap, f64)> {
    let metric = graph.metric();
    let p = Point::from(point);
    let mut best: Option<(SegmentSnap, f64)> = None;

    for seg in graph.segments() {
        let coords = &graph.corridor(seg.corridor).0;
        let (a, b) = (coords[seg.index], coords[seg.index + 1]);
        let projected = match Line::new(a, b).closest_point(&p) {
            Closest::Intersection(q) | Closest::SinglePoint(q) => q.0,
            Closest::Indeterminate => a,
        };
        let d = metric.distance(point, projected);
        if best.as_ref().is_none_or(|(_, best_d)| d < *best_d) {
            let offset = (projected.x - a.x).hypot(projected.y - a.y);
            best = Some((
                SegmentSnap { corridor: seg.corridor, segment: seg.index, point: projected, offset },
                d,
            ));
        }
    }
    best
}
