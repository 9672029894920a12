//! Graph diagnostics.
//!
//! Used to explain a disconnected or sparse graph after a build: how many
//! segments the obstacle filter removed, how many proximity links were
//! added, and how many nodes ended up with no edges at all.

use std::fmt;

use wf_core::NodeId;

use crate::network::{CorridorGraph, EdgeKind};

/// Summary counts for a built [`CorridorGraph`].  Edge counts are
/// undirected links.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStats {
    pub nodes: usize,
    pub links: usize,
    pub corridors: usize,
    pub corridor_links: usize,
    pub proximity_links: usize,
    pub excluded_segments: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub isolated_nodes: usize,
}

impl CorridorGraph {
    pub fn stats(&self) -> GraphStats {
        let degrees: Vec<usize> = (0..self.node_count())
            .map(|i| self.out_degree(NodeId::from_index(i)))
            .collect();
        let corridor_links = self
            .edge_kind
            .iter()
            .filter(|k| matches!(k, EdgeKind::Corridor(_)))
            .count()
            / 2;
        let mean_degree = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
        };

        GraphStats {
            nodes: self.node_count(),
            links: self.edge_count() / 2,
            corridors: self.corridors().len(),
            corridor_links,
            proximity_links: self.proximity_edge_count(),
            excluded_segments: self.excluded().len(),
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree,
            isolated_nodes: degrees.iter().filter(|&&d| d == 0).count(),
        }
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:             {}", self.nodes)?;
        writeln!(
            f,
            "links:             {} ({} corridor, {} proximity)",
            self.links, self.corridor_links, self.proximity_links
        )?;
        writeln!(f, "corridors:         {}", self.corridors)?;
        writeln!(f, "excluded segments: {}", self.excluded_segments)?;
        writeln!(
            f,
            "degree:            min {} / max {} / mean {:.2}",
            self.min_degree, self.max_degree, self.mean_degree
        )?;
        write!(f, "isolated nodes:    {}", self.isolated_nodes)
    }
}
