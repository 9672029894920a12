//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so a different search (or a
//! cached table for kiosk-to-destination pairs) can be swapped in without
//! touching graph construction.  The default [`AStarRouter`] snaps both
//! ends, tries a direct corridor slice, and otherwise runs A* over the base
//! graph plus a per-query overlay.
//!
//! # Failure semantics
//!
//! Only malformed input is an `Err`.  An empty graph, an unreachable goal,
//! or an exhausted search produce `RouteResult { valid: false, .. }` with
//! the straight-line distance as an estimate.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use log::{debug, warn};

use wf_core::{Coord, Metric, NodeId, ensure_finite};

use crate::config::SearchConfig;
use crate::network::CorridorGraph;
use crate::overlay::QueryOverlay;
use crate::simplify::simplify_path;
use crate::snap::{SegmentSnap, snap};
use crate::{SpatialError, SpatialResult};

/// Typical pedestrian walking speed in metres per second.
pub const WALKING_SPEED_MPS: f64 = 1.4;

// ── RouteResult ───────────────────────────────────────────────────────────────

/// Why a route is not valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteFailure {
    /// The graph has no nodes.
    NoGraph,
    /// The open set emptied without reaching the goal.
    NoPath,
    /// The iteration cap was hit.
    SearchExhausted,
}

impl fmt::Display for RouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteFailure::NoGraph => "graph not initialized",
            RouteFailure::NoPath => "no path found",
            RouteFailure::SearchExhausted => "search exhausted",
        })
    }
}

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    /// Route from the caller's start to the caller's end.  Empty for a
    /// failed route unless direct fallback is on.
    pub path: Vec<Coord>,
    /// Length of `path` under the graph metric, or the straight-line
    /// estimate when `valid` is false.
    pub distance: f64,
    /// Number of coordinates in `path`.
    pub waypoints: usize,
    /// Graph nodes on the route, when a graph route was found.
    pub node_count: Option<usize>,
    pub valid: bool,
    /// `path` is the `[start, end]` straight line of a failed search.
    pub is_direct: bool,
    pub error: Option<RouteFailure>,
}

impl RouteResult {
    fn found(path: Vec<Coord>, metric: Metric, node_count: usize) -> Self {
        Self {
            distance: metric.length(&path),
            waypoints: path.len(),
            path,
            node_count: Some(node_count),
            valid: true,
            is_direct: false,
            error: None,
        }
    }

    fn failed(start: Coord, end: Coord, metric: Metric, failure: RouteFailure, direct: bool) -> Self {
        let path = if direct { vec![start, end] } else { Vec::new() };
        Self {
            distance: metric.distance(start, end),
            waypoints: path.len(),
            path,
            node_count: None,
            valid: false,
            is_direct: direct,
            error: Some(failure),
        }
    }

    /// Estimated walking time in minutes at `speed_mps`.  Meaningful when
    /// the graph metric is in metres.
    pub fn walking_minutes(&self, speed_mps: f64) -> f64 {
        self.distance / speed_mps / 60.0
    }

    /// Convert an invalid result into [`SpatialError::NoPath`].
    pub fn into_result(self) -> SpatialResult<Self> {
        match self.error {
            Some(failure) if !self.valid => Err(SpatialError::NoPath { reason: failure.to_string() }),
            _ => Ok(self),
        }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so one router and one graph can
/// serve concurrent queries.
pub trait Router: Send + Sync {
    /// Route from `start` to `end`.
    ///
    /// Returns `Err` only for malformed input (non-finite coordinates).
    fn find_path(&self, graph: &CorridorGraph, start: Coord, end: Coord) -> SpatialResult<RouteResult>;
}

/// Route with the default [`AStarRouter`].
pub fn find_path(graph: &CorridorGraph, start: Coord, end: Coord) -> SpatialResult<RouteResult> {
    AStarRouter::default().find_path(graph, start, end)
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* over the corridor graph with a straight-line heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarRouter {
    pub config: SearchConfig,
}

impl AStarRouter {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Raw search cost between two base graph nodes, without snapping,
    /// slicing, or simplification.  `None` if unreachable within the
    /// iteration cap.
    pub fn graph_distance(&self, graph: &CorridorGraph, from: NodeId, to: NodeId) -> Option<f64> {
        let overlay = QueryOverlay::new(graph);
        match astar(&overlay, from, to, &self.config) {
            Search::Found { cost, .. } => Some(cost),
            Search::Unreachable | Search::Exhausted { .. } => None,
        }
    }

    fn fail(&self, start: Coord, end: Coord, metric: Metric, failure: RouteFailure) -> RouteResult {
        RouteResult::failed(start, end, metric, failure, self.config.direct_fallback)
    }
}

impl Router for AStarRouter {
    fn find_path(&self, graph: &CorridorGraph, start: Coord, end: Coord) -> SpatialResult<RouteResult> {
        ensure_finite(start)?;
        ensure_finite(end)?;
        let metric = graph.metric();

        let (from_snap, to_snap) = match (snap(graph, start), snap(graph, end)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(SpatialError::NoGraph), _) | (_, Err(SpatialError::NoGraph)) => {
                return Ok(self.fail(start, end, metric, RouteFailure::NoGraph));
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        if graph.key(from_snap.coord) == graph.key(to_snap.coord) {
            return Ok(RouteResult::found(vec![start, end], metric, 1));
        }

        if self.config.same_corridor_slicing {
            if let (Some(a), Some(b)) = (from_snap.on_segment, to_snap.on_segment) {
                if a.corridor == b.corridor {
                    if let Some(path) = slice_corridor(graph, &a, &b) {
                        let nodes = path.len().saturating_sub(1).max(1);
                        return Ok(RouteResult::found(path, metric, nodes));
                    }
                }
            }
        }

        // Always search from the lower snap key so that A->B and B->A pick
        // the same path among equal-cost ones.
        let swapped = graph.key(to_snap.coord) < graph.key(from_snap.coord);
        let (a, b) = if swapped { (&to_snap, &from_snap) } else { (&from_snap, &to_snap) };
        let (a_pos, b_pos) = if swapped { (end, start) } else { (start, end) };

        let mut overlay = QueryOverlay::new(graph);
        let from = overlay.materialize(a, &self.config);
        let to = overlay.materialize(b, &self.config);

        match astar(&overlay, from, to, &self.config) {
            Search::Found { nodes, .. } => {
                let raw = dedup_path(
                    std::iter::once(a_pos)
                        .chain(nodes.iter().map(|&n| overlay.position(n)))
                        .chain(std::iter::once(b_pos)),
                );
                let mut path = simplify_path(&raw, self.config.simplify_tolerance);
                if swapped {
                    path.reverse();
                }
                Ok(RouteResult::found(path, metric, nodes.len()))
            }
            Search::Unreachable => {
                debug!("no path from {from} to {to}");
                Ok(self.fail(start, end, metric, RouteFailure::NoPath))
            }
            Search::Exhausted { expanded } => {
                warn!("search from {from} to {to} exhausted after {expanded} expansions");
                Ok(self.fail(start, end, metric, RouteFailure::SearchExhausted))
            }
        }
    }
}

// ── Corridor slicing ──────────────────────────────────────────────────────────

/// Sub-path of one corridor between two projections, in travel order.
/// `None` if any segment in between was excluded from the graph.
fn slice_corridor(graph: &CorridorGraph, a: &SegmentSnap, b: &SegmentSnap) -> Option<Vec<Coord>> {
    let (lo, hi) = (a.segment.min(b.segment), a.segment.max(b.segment));
    if (lo..=hi).any(|i| graph.is_segment_excluded(a.corridor, i)) {
        return None;
    }
    let coords = &graph.corridor(a.corridor).0;
    let forward = (a.segment, a.offset) <= (b.segment, b.offset);
    let (first, last) = if forward { (a, b) } else { (b, a) };

    let mut path = dedup_path(
        std::iter::once(first.point)
            .chain(coords[first.segment + 1..=last.segment].iter().copied())
            .chain(std::iter::once(last.point)),
    );
    if !forward {
        path.reverse();
    }
    Some(path)
}

/// Collect coordinates, dropping exact consecutive repeats.
fn dedup_path(coords: impl IntoIterator<Item = Coord>) -> Vec<Coord> {
    let mut path: Vec<Coord> = Vec::new();
    for c in coords {
        if path.last() != Some(&c) {
            path.push(c);
        }
    }
    path
}

// ── A* internals ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq)]
struct State {
    f: f64,
    node: NodeId,
}

impl Eq for State {}

// Min-heap on `f`; equal `f` pops the lower node id first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Search {
    Found { nodes: Vec<NodeId>, cost: f64 },
    Unreachable,
    Exhausted { expanded: usize },
}

fn astar(overlay: &QueryOverlay<'_>, start: NodeId, goal: NodeId, config: &SearchConfig) -> Search {
    let metric = overlay.graph().metric();
    let goal_pos = overlay.position(goal);
    let h = |n: NodeId| metric.distance(overlay.position(n), goal_pos) * config.heuristic_weight;

    let n = overlay.node_count();
    let mut g = vec![f64::INFINITY; n];
    let mut came_from = vec![NodeId::INVALID; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    g[start.index()] = 0.0;
    open.push(State { f: h(start), node: start });
    let mut expanded = 0usize;

    while let Some(State { node, .. }) = open.pop() {
        if node == goal {
            return Search::Found { nodes: reconstruct(&came_from, goal), cost: g[goal.index()] };
        }
        if closed[node.index()] {
            continue;
        }
        closed[node.index()] = true;
        expanded += 1;
        if expanded > config.max_iterations {
            return Search::Exhausted { expanded };
        }

        let g_node = g[node.index()];
        overlay.for_each_neighbor(node, |next, weight| {
            if closed[next.index()] {
                return;
            }
            let tentative = g_node + weight;
            if tentative < g[next.index()] {
                g[next.index()] = tentative;
                came_from[next.index()] = node;
                open.push(State { f: tentative + h(next), node: next });
            }
        });
    }

    Search::Unreachable
}

fn reconstruct(came_from: &[NodeId], goal: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![goal];
    let mut cur = goal;
    while came_from[cur.index()] != NodeId::INVALID {
        cur = came_from[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
