//! `wf-spatial` — corridor graph, obstacle filtering, snapping, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`network`]  | `CorridorGraph` (CSR + R-tree), `CorridorGraphBuilder`       |
//! | [`obstacle`] | `ObstacleSet`, `segment_blocked`                             |
//! | [`snap`]     | `snap`, `Snap`, `SnapTarget`, `SegmentSnap`                  |
//! | [`overlay`]  | `QueryOverlay` (per-query temporary nodes and links)         |
//! | [`router`]   | `Router` trait, `AStarRouter`, `RouteResult`, `find_path`    |
//! | [`simplify`] | `simplify_path` (Douglas–Peucker)                            |
//! | [`stats`]    | `GraphStats`                                                 |
//! | [`config`]   | `GraphConfig`, `ProximityConfig`, `SearchConfig`             |
//! | [`layers`]   | GeoJSON loading and route export (feature = `"geojson"`)     |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `geojson` | GeoJSON layer loading and `RouteResult::to_json`.          |
//! | `serde`   | Derives `Serialize`/`Deserialize` on configs and results.  |

pub mod config;
pub mod error;
pub mod network;
pub mod obstacle;
pub mod overlay;
pub mod router;
pub mod simplify;
pub mod snap;
pub mod stats;

#[cfg(feature = "geojson")]
pub mod layers;

#[cfg(test)]
mod tests;

pub use config::{GraphConfig, ProximityConfig, SearchConfig};
pub use error::{SpatialError, SpatialResult};
pub use network::{CorridorGraph, CorridorGraphBuilder, EdgeKind, ExcludedSegment, Segment};
pub use obstacle::{ObstacleSet, segment_blocked};
pub use overlay::QueryOverlay;
pub use router::{AStarRouter, RouteFailure, RouteResult, Router, WALKING_SPEED_MPS, find_path};
pub use simplify::simplify_path;
pub use snap::{SegmentSnap, Snap, SnapTarget, snap};
pub use stats::GraphStats;

#[cfg(feature = "geojson")]
pub use layers::{CampusLayers, parse_geojson, read_geojson};
