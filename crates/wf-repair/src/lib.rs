//! `wf-repair` — offline connectivity repair for corridor datasets.
//!
//! Hand-drawn corridor layers rarely form one connected network: lines stop
//! a few centimetres short of each other, or whole wings are drawn as
//! separate islands.  This crate finds the pieces and appends synthetic
//! two-point bridge corridors until the set is connected, recording every
//! bridge so a reviewer can check it.
//!
//! Input corridors are never modified or reordered; bridges are only
//! appended.
//!
//! # Modules
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`components`] | Connected-component scan, `RepairStatus`                |
//! | [`bridge`]     | `repair`, closest-pair component bridging, `Bridge`     |
//! | [`near_miss`]  | Dead-end detection and near-miss joins                  |
//! | [`split`]      | Splitting a self-touching line at its junctions         |
//! | [`audit`]      | CSV audit trail of added bridges                        |
//! | `collection`   | GeoJSON read/write with tagged bridges (`geojson`)      |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Closest-pair search on Rayon's thread pool              |
//! | `geojson`  | `CorridorCollection` read/write                         |
//! | `serde`    | Serde derives on configuration and status types         |

pub mod audit;
pub mod bridge;
pub mod components;
pub mod config;
pub mod error;
pub mod near_miss;
pub mod split;

#[cfg(feature = "geojson")]
pub mod collection;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use audit::{write_audit, write_audit_csv};
pub use bridge::{Bridge, BridgeKind, RepairOutcome, repair};
pub use components::{Component, RepairStatus, connected_components};
pub use config::{NearMissConfig, NearMissMode, RepairConfig};
pub use error::{RepairError, RepairResult};
pub use near_miss::{DeadEnd, bridge_near_misses, dead_ends};
pub use split::split_at_junctions;

#[cfg(feature = "geojson")]
pub use collection::{CorridorCollection, bridge_feature, parse_collection, read_collection};
