//! Build and search configuration.
//!
//! Defaults suit planar fixtures and projected data.  Use the
//! `geographic()` presets for GeoJSON lon/lat input, where thresholds are
//! metres under [`Metric::Haversine`].

use wf_core::{DEFAULT_KEY_PRECISION, Metric};

/// Parameters for [`CorridorGraph::build`](crate::CorridorGraph::build).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// How edge weights are measured.
    pub metric: Metric,

    /// Decimal places used to merge coincident coordinates into one node.
    pub key_precision: u32,

    /// When `true` and obstacles are supplied, segments crossing an
    /// obstacle are excluded from the graph.
    pub obstacle_aware: bool,

    /// Proximity bridging between nearby unconnected nodes.  `None`
    /// disables it.
    pub proximity: Option<ProximityConfig>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            key_precision: DEFAULT_KEY_PRECISION,
            obstacle_aware: true,
            proximity: None,
        }
    }
}

impl GraphConfig {
    /// Lon/lat input with metre distances and 20 m proximity bridging.
    pub fn geographic() -> Self {
        Self {
            metric: Metric::Haversine,
            proximity: Some(ProximityConfig { max_distance: 20.0, min_distance: 0.0 }),
            ..Self::default()
        }
    }
}

/// Proximity-edge thresholds, in metric units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityConfig {
    /// Node pairs at or below this distance are linked.
    pub max_distance: f64,
    /// Node pairs at or below this distance are left alone (they are
    /// coincident for practical purposes and already merged by key).
    pub min_distance: f64,
}

/// Parameters for [`AStarRouter`](crate::AStarRouter).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Multiplier on the straight-line heuristic.  `1.0` keeps A* optimal;
    /// larger values trade optimality for fewer expansions.
    pub heuristic_weight: f64,

    /// Hard cap on node expansions per search.
    pub max_iterations: usize,

    /// Douglas–Peucker tolerance applied to reconstructed paths, in
    /// coordinate units.  `0.0` disables simplification.
    pub simplify_tolerance: f64,

    /// Maximum number of extra links from a temporary snap node to nearby
    /// graph nodes (in addition to its parent segment endpoints).
    pub snap_link_max: usize,

    /// Radius, in metric units, for those extra links.
    pub snap_link_radius: f64,

    /// Slice a single corridor directly when both ends snap onto it.
    pub same_corridor_slicing: bool,

    /// On failure, return `[start, end]` flagged `is_direct` instead of an
    /// empty path.  The result stays `valid: false`.
    pub direct_fallback: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.0,
            max_iterations: 100_000,
            simplify_tolerance: 1e-6,
            snap_link_max: 5,
            snap_link_radius: 1.0,
            same_corridor_slicing: true,
            direct_fallback: false,
        }
    }
}

impl SearchConfig {
    /// Lon/lat input: link temporary nodes to up to 10 nodes within 50 m.
    pub fn geographic() -> Self {
        Self {
            snap_link_max: 10,
            snap_link_radius: 50.0,
            ..Self::default()
        }
    }
}
