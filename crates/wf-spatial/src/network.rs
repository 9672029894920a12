//! Corridor graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every undirected corridor or proximity link is stored as two directed
//! edges with equal weight, so adjacency is symmetric.  Edge arrays are
//! sorted by source node and indexed by `EdgeId`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over node coordinates answers nearest-node and
//! radius queries for snapping and proximity bridging.
//!
//! # Immutability
//!
//! A built [`CorridorGraph`] is never mutated.  Query-time snap nodes live
//! in a per-query [`QueryOverlay`](crate::QueryOverlay), so one graph can be
//! shared across threads.

use geo::{LineString, Polygon};
use log::{debug, info, trace};
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::{FxHashMap, FxHashSet};

use wf_core::{Coord, CoordKey, CorridorId, EdgeId, Metric, NodeId, validate_corridor, validate_corridors};

use crate::config::{GraphConfig, ProximityConfig};
use crate::obstacle::ObstacleSet;
use crate::SpatialResult;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: an `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in coordinate space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge metadata ─────────────────────────────────────────────────────────────

/// Where an edge came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKind {
    /// A segment of the given corridor.
    Corridor(CorridorId),
    /// A proximity bridge between two nearby nodes.
    Proximity,
    /// A query-time link from a temporary snap node.
    Link,
}

/// A routable corridor segment: consecutive points `index` and `index + 1`
/// of corridor `corridor`, joining nodes `from` and `to`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub corridor: CorridorId,
    pub index: usize,
    pub from: NodeId,
    pub to: NodeId,
}

/// A corridor segment rejected by the obstacle filter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExcludedSegment {
    pub corridor: CorridorId,
    pub index: usize,
    pub from: Coord,
    pub to: Coord,
}

// ── CorridorGraph ─────────────────────────────────────────────────────────────

/// Undirected corridor graph in CSR format plus a spatial index.
///
/// CSR arrays are `pub` for direct indexed access in the search loop.  Do
/// not construct directly; use [`CorridorGraph::build`] or
/// [`CorridorGraphBuilder`].
pub struct CorridorGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node (the first coordinate seen for its key).
    pub node_pos: Vec<Coord>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Edge length under the graph's metric.
    pub edge_weight: Vec<f64>,

    /// Origin of each edge.
    pub edge_kind: Vec<EdgeKind>,

    // ── Build context ─────────────────────────────────────────────────────
    metric: Metric,
    key_precision: u32,
    obstacle_filtered: bool,
    corridors: Vec<LineString<f64>>,
    segments: Vec<Segment>,
    excluded: Vec<ExcludedSegment>,
    excluded_index: FxHashSet<(CorridorId, usize)>,
    proximity_edges: usize,

    // ── Lookup ────────────────────────────────────────────────────────────
    node_index: FxHashMap<CoordKey, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl CorridorGraph {
    /// Build a graph from corridors and optional obstacles.
    ///
    /// Fails with `CoreError::InvalidInput` when `corridors` is empty or any corridor
    /// has fewer than two points or a non-finite coordinate.
    pub fn build(
        corridors: &[LineString<f64>],
        obstacles: &[Polygon<f64>],
        config: &GraphConfig,
    ) -> SpatialResult<Self> {
        validate_corridors(corridors)?;
        let mut b = CorridorGraphBuilder::new(config.clone())
            .with_obstacles(obstacles.iter().cloned().collect());
        for corridor in corridors {
            b.add_corridor(corridor)?;
        }
        Ok(b.build())
    }

    /// Construct a graph with no nodes or edges.
    ///
    /// Any snap against it fails with [`SpatialError::NoGraph`](crate::SpatialError::NoGraph).
    pub fn empty() -> Self {
        CorridorGraphBuilder::new(GraphConfig::default()).build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of directed edges (twice the number of undirected links).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn key_precision(&self) -> u32 {
        self.key_precision
    }

    /// `true` if obstacles were supplied and applied during the build.
    pub fn obstacle_filtered(&self) -> bool {
        self.obstacle_filtered
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The directed edge `a → b`, if any.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.out_edges(a).find(|e| self.edge_to[e.index()] == b)
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    #[inline]
    pub fn node_position(&self, node: NodeId) -> Coord {
        self.node_pos[node.index()]
    }

    /// Rounded key for `c` at this graph's precision.
    #[inline]
    pub fn key(&self, c: Coord) -> CoordKey {
        CoordKey::new(c, self.key_precision)
    }

    /// The node whose key equals `c`'s key, if any.
    pub fn node_at(&self, c: Coord) -> Option<NodeId> {
        self.node_index.get(&self.key(c)).copied()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `c` and its metric distance.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn nearest_node(&self, c: Coord) -> Option<(NodeId, f64)> {
        self.spatial_idx
            .nearest_neighbor(&[c.x, c.y])
            .map(|e| (e.id, self.metric.distance(c, self.node_pos[e.id.index()])))
    }

    /// Nodes within metric distance `radius` of `c`, closest first, at most
    /// `max`.  Equal distances are ordered by node id.
    pub fn nodes_within(&self, c: Coord, radius: f64, max: usize) -> Vec<(NodeId, f64)> {
        if max == 0 || radius <= 0.0 {
            return Vec::new();
        }
        let r = self.metric.search_radius(c, radius);
        let mut found: Vec<(NodeId, f64)> = self
            .spatial_idx
            .locate_within_distance([c.x, c.y], r * r)
            .map(|e| (e.id, self.metric.distance(c, self.node_pos[e.id.index()])))
            .filter(|&(_, d)| d <= radius)
            .collect();
        found.sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        found.truncate(max);
        found
    }

    // ── Corridor data ─────────────────────────────────────────────────────

    /// Copies of the input corridors, indexed by `CorridorId`.
    pub fn corridors(&self) -> &[LineString<f64>] {
        &self.corridors
    }

    pub fn corridor(&self, id: CorridorId) -> &LineString<f64> {
        &self.corridors[id.index()]
    }

    /// Routable (non-degenerate, unblocked) corridor segments in corridor
    /// then segment order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segments rejected by the obstacle filter.
    pub fn excluded(&self) -> &[ExcludedSegment] {
        &self.excluded
    }

    pub fn is_segment_excluded(&self, corridor: CorridorId, index: usize) -> bool {
        self.excluded_index.contains(&(corridor, index))
    }

    pub(crate) fn proximity_edge_count(&self) -> usize {
        self.proximity_edges
    }
}

// ── CorridorGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`CorridorGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes are created on first sight of a coordinate key.  `build()` runs
/// the optional proximity pass, sorts edges by source node, constructs the
/// CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use geo::LineString;
/// use wf_spatial::{CorridorGraphBuilder, GraphConfig};
///
/// let mut b = CorridorGraphBuilder::new(GraphConfig::default());
/// b.add_corridor(&LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 5.0)])).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 4); // bidirectional
/// ```
pub struct CorridorGraphBuilder {
    config: GraphConfig,
    obstacles: ObstacleSet,
    nodes: Vec<Coord>,
    node_index: FxHashMap<CoordKey, NodeId>,
    raw_edges: Vec<RawEdge>,
    linked: FxHashSet<(NodeId, NodeId)>,
    corridors: Vec<LineString<f64>>,
    segments: Vec<Segment>,
    excluded: Vec<ExcludedSegment>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    weight: f64,
    kind: EdgeKind,
}

impl CorridorGraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            obstacles: ObstacleSet::default(),
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
            raw_edges: Vec::new(),
            linked: FxHashSet::default(),
            corridors: Vec::new(),
            segments: Vec::new(),
            excluded: Vec::new(),
        }
    }

    /// Obstacles to filter corridor segments (and proximity links) against.
    /// Ignored when `obstacle_aware` is off.
    pub fn with_obstacles(mut self, obstacles: ObstacleSet) -> Self {
        self.obstacles = obstacles;
        self
    }

    fn filtering(&self) -> bool {
        self.config.obstacle_aware && !self.obstacles.is_empty()
    }

    /// Return the node for `pos`, creating it if its key is new.
    pub fn add_node(&mut self, pos: Coord) -> NodeId {
        let key = CoordKey::new(pos, self.config.key_precision);
        *self.node_index.entry(key).or_insert_with(|| {
            let id = NodeId::from_index(self.nodes.len());
            self.nodes.push(pos);
            id
        })
    }

    /// Add an undirected link `a`–`b` weighted by the metric distance of
    /// the node positions.  Returns `false` for self-loops and pairs that
    /// are already linked.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, kind: EdgeKind) -> bool {
        if a == b {
            return false;
        }
        let pair = if a < b { (a, b) } else { (b, a) };
        if !self.linked.insert(pair) {
            return false;
        }
        let weight = self
            .config
            .metric
            .distance(self.nodes[a.index()], self.nodes[b.index()]);
        self.raw_edges.push(RawEdge { from: a, to: b, weight, kind });
        self.raw_edges.push(RawEdge { from: b, to: a, weight, kind });
        true
    }

    /// Add every segment of `corridor` and return its id.
    ///
    /// Zero-length segments are skipped.  Segments blocked by an obstacle
    /// are recorded in [`CorridorGraph::excluded`] and get no edge.
    pub fn add_corridor(&mut self, corridor: &LineString<f64>) -> SpatialResult<CorridorId> {
        let id = CorridorId::from_index(self.corridors.len());
        validate_corridor(id.index(), corridor)?;

        let filtering = self.filtering();
        for (index, w) in corridor.0.windows(2).enumerate() {
            let (a, b) = (w[0], w[1]);
            let from = self.add_node(a);
            let to = self.add_node(b);
            if from == to {
                trace!("corridor {} segment {index}: zero length, skipped", id.index());
                continue;
            }
            if filtering && self.obstacles.blocks(a, b) {
                debug!(
                    "corridor {} segment {index} ({:?} -> {:?}) blocked by obstacle",
                    id.index(),
                    (a.x, a.y),
                    (b.x, b.y)
                );
                self.excluded.push(ExcludedSegment { corridor: id, index, from: a, to: b });
                continue;
            }
            self.add_road(from, to, EdgeKind::Corridor(id));
            self.segments.push(Segment { corridor: id, index, from, to });
        }
        self.corridors.push(corridor.clone());
        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Directed edges added so far.
    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Link node pairs within the proximity band that are not already
    /// linked.  Candidates come from the R-tree; pairs are visited in
    /// ascending `(i, j)` order.
    fn add_proximity_edges(&mut self, index: &RTree<NodeEntry>, prox: ProximityConfig) -> usize {
        let metric = self.config.metric;
        let filtering = self.filtering();
        let mut added = 0;
        for i in 0..self.nodes.len() {
            let a = self.nodes[i];
            let r = metric.search_radius(a, prox.max_distance);
            let mut near: Vec<NodeId> = index
                .locate_within_distance([a.x, a.y], r * r)
                .map(|e| e.id)
                .filter(|j| j.index() > i)
                .collect();
            near.sort_unstable();

            let from = NodeId::from_index(i);
            for to in near {
                let b = self.nodes[to.index()];
                let d = metric.distance(a, b);
                if d <= prox.min_distance || d > prox.max_distance {
                    continue;
                }
                if filtering && self.obstacles.blocks(a, b) {
                    debug!("proximity link {from} -> {to} blocked by obstacle");
                    continue;
                }
                if self.add_road(from, to, EdgeKind::Proximity) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Consume the builder and produce a [`CorridorGraph`].
    pub fn build(mut self) -> CorridorGraph {
        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId::from_index(i) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let proximity_edges = match self.config.proximity {
            Some(prox) => self.add_proximity_edges(&spatial_idx, prox),
            None => 0,
        };

        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from);

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_weight: Vec<f64> = raw.iter().map(|e| e.weight).collect();
        let edge_kind: Vec<EdgeKind> = raw.iter().map(|e| e.kind).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let obstacle_filtered = self.config.obstacle_aware && !self.obstacles.is_empty();
        let excluded_index = self.excluded.iter().map(|e| (e.corridor, e.index)).collect();

        if !self.corridors.is_empty() {
            info!(
                "corridor graph: {} nodes, {} links ({} proximity), {} segments excluded",
                node_count,
                edge_count / 2,
                proximity_edges,
                self.excluded.len()
            );
        }

        CorridorGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_weight,
            edge_kind,
            metric: self.config.metric,
            key_precision: self.config.key_precision,
            obstacle_filtered,
            corridors: self.corridors,
            segments: self.segments,
            excluded: self.excluded,
            excluded_index,
            proximity_edges,
            node_index: self.node_index,
            spatial_idx,
        }
    }
}
