//! Repair configuration.

use wf_core::{DEFAULT_KEY_PRECISION, Metric};

/// Parameters for [`repair`](crate::repair).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RepairConfig {
    /// How bridge lengths and near-miss thresholds are measured.
    pub metric: Metric,

    /// Decimal places used to decide that two corridors share a point.
    pub key_precision: u32,

    /// Cap on bridging iterations.  `None` caps at the initial component
    /// count.
    pub max_iterations: Option<usize>,

    /// Run a near-miss pass over dead ends before component bridging.
    pub near_miss: Option<NearMissConfig>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            key_precision: DEFAULT_KEY_PRECISION,
            max_iterations: None,
            near_miss: None,
        }
    }
}

impl RepairConfig {
    /// Lon/lat input measured in metres, with a near-miss pass.
    pub fn geographic() -> Self {
        Self {
            metric: Metric::Haversine,
            near_miss: Some(NearMissConfig::geographic()),
            ..Self::default()
        }
    }
}

/// Which dead-end pairs the near-miss pass joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NearMissMode {
    /// Every qualifying pair.
    #[default]
    AllPairs,
    /// Each dead end joins at most once, to its closest later partner.
    BestMatch,
}

/// Thresholds for joining dead ends, in metric units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NearMissConfig {
    /// Pairs strictly closer than this are joined.
    pub threshold: f64,
    /// Pairs at or below this are treated as duplicate points and skipped.
    pub epsilon: f64,
    pub mode: NearMissMode,
}

impl Default for NearMissConfig {
    /// Degree-scale defaults for planar lon/lat data.
    fn default() -> Self {
        Self { threshold: 5e-5, epsilon: 1e-6, mode: NearMissMode::AllPairs }
    }
}

impl NearMissConfig {
    /// The degree defaults expressed in metres.
    pub fn geographic() -> Self {
        Self { threshold: 5.5, epsilon: 0.11, mode: NearMissMode::AllPairs }
    }
}
