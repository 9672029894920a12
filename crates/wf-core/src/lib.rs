//! `wf-core` — foundational types for the wayfinder corridor engine.
//!
//! This crate is a dependency of every other `wf-*` crate.  It has no `wf-*`
//! dependencies and only `geo` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`, `CorridorId`, `ComponentId`           |
//! | [`coord`]    | `CoordKey` rounding, midpoint/lerp helpers                |
//! | [`metric`]   | `Metric` (planar Euclidean or Haversine metres)           |
//! | [`validate`] | Fail-fast checks, corridor `Type` selection               |
//! | [`error`]    | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `Metric`.        |

pub mod coord;
pub mod error;
pub mod ids;
pub mod metric;
pub mod validate;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::{CoordKey, DEFAULT_KEY_PRECISION};
pub use error::{CoreError, CoreResult};
pub use ids::{ComponentId, CorridorId, EdgeId, NodeId};
pub use metric::Metric;
pub use validate::{ensure_finite, is_corridor_kind, validate_corridor, validate_corridors};

/// Planar coordinate used throughout the workspace (`x` = longitude or
/// easting, `y` = latitude or northing).
pub type Coord = geo::Coord<f64>;
