//! Per-query overlay of temporary snap nodes.
//!
//! Base graph nodes keep their ids `0..N`.  Each temporary node added by a
//! query gets id `N + i` and lives only in the overlay, together with its
//! link edges in both directions.  The shared [`CorridorGraph`] is never
//! written to.

use rustc_hash::FxHashMap;

use wf_core::{Coord, CoordKey, NodeId};

use crate::config::SearchConfig;
use crate::network::{CorridorGraph, EdgeKind};
use crate::snap::{SegmentSnap, Snap, SnapTarget};

/// A link edge owned by the overlay.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayEdge {
    pub to: NodeId,
    pub weight: f64,
    pub kind: EdgeKind,
}

struct TempNode {
    pos: Coord,
    on_segment: Option<SegmentSnap>,
}

/// Base graph plus the temporary nodes and links of one query.
pub struct QueryOverlay<'g> {
    graph: &'g CorridorGraph,
    temp: Vec<TempNode>,
    temp_index: FxHashMap<CoordKey, NodeId>,
    links: FxHashMap<NodeId, Vec<OverlayEdge>>,
}

impl<'g> QueryOverlay<'g> {
    pub fn new(graph: &'g CorridorGraph) -> Self {
        Self {
            graph,
            temp: Vec::new(),
            temp_index: FxHashMap::default(),
            links: FxHashMap::default(),
        }
    }

    pub fn graph(&self) -> &'g CorridorGraph {
        self.graph
    }

    /// Base plus temporary nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count() + self.temp.len()
    }

    pub fn temp_count(&self) -> usize {
        self.temp.len()
    }

    pub fn is_temporary(&self, node: NodeId) -> bool {
        node.index() >= self.graph.node_count()
    }

    pub fn position(&self, node: NodeId) -> Coord {
        match node.index().checked_sub(self.graph.node_count()) {
            Some(i) => self.temp[i].pos,
            None => self.graph.node_position(node),
        }
    }

    /// Overlay links leaving `node` (base nodes get entries here when a
    /// temporary node links to them).
    pub fn links(&self, node: NodeId) -> &[OverlayEdge] {
        self.links.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Visit every neighbour of `node` with the edge weight.
    pub fn for_each_neighbor(&self, node: NodeId, mut f: impl FnMut(NodeId, f64)) {
        if !self.is_temporary(node) {
            for e in self.graph.out_edges(node) {
                f(self.graph.edge_to[e.index()], self.graph.edge_weight[e.index()]);
            }
        }
        for link in self.links(node) {
            f(link.to, link.weight);
        }
    }

    /// Resolve `snap` to a node id, creating a temporary node if needed.
    ///
    /// A new temporary node is linked to its parent segment's endpoints,
    /// to earlier temporary nodes on the same segment, and to up to
    /// `snap_link_max` graph nodes within `snap_link_radius`.  The radius
    /// links are skipped on obstacle-filtered graphs, where an unchecked
    /// link could cut through a building.
    pub fn materialize(&mut self, snap: &Snap, config: &SearchConfig) -> NodeId {
        let pos = match snap.target {
            SnapTarget::Node(id) => return id,
            SnapTarget::Projected(pos) => pos,
        };
        let key = self.graph.key(pos);
        if let Some(&existing) = self.temp_index.get(&key) {
            return existing;
        }

        let id = NodeId::from_index(self.node_count());
        self.temp.push(TempNode { pos, on_segment: snap.on_segment });
        self.temp_index.insert(key, id);

        if let Some(seg) = snap.on_segment {
            let parent = self
                .graph
                .segments()
                .iter()
                .find(|s| s.corridor == seg.corridor && s.index == seg.segment)
                .copied();
            if let Some(parent) = parent {
                let kind = EdgeKind::Corridor(seg.corridor);
                self.link(id, parent.from, kind);
                self.link(id, parent.to, kind);
            }
            let siblings: Vec<NodeId> = self
                .temp
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    t.on_segment
                        .is_some_and(|o| o.corridor == seg.corridor && o.segment == seg.segment)
                })
                .map(|(i, _)| NodeId::from_index(self.graph.node_count() + i))
                .filter(|&other| other != id)
                .collect();
            for other in siblings {
                self.link(id, other, EdgeKind::Corridor(seg.corridor));
            }
        }

        if !self.graph.obstacle_filtered() {
            let near = self
                .graph
                .nodes_within(pos, config.snap_link_radius, config.snap_link_max);
            for (node, _) in near {
                self.link(id, node, EdgeKind::Link);
            }
        }
        id
    }

    fn link(&mut self, a: NodeId, b: NodeId, kind: EdgeKind) {
        if a == b || self.links(a).iter().any(|l| l.to == b) {
            return;
        }
        let weight = self
            .graph
            .metric()
            .distance(self.position(a), self.position(b));
        self.links.entry(a).or_default().push(OverlayEdge { to: b, weight, kind });
        self.links.entry(b).or_default().push(OverlayEdge { to: a, weight, kind });
    }
}
