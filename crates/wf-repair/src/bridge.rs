//! Component bridging.
//!
//! Each iteration scans the corridor set for connected components, finds
//! the globally closest pair of points lying in two different components,
//! and appends a two-point bridge corridor between them.  The scan is
//! repeated until one component remains or the iteration cap is reached.
//!
//! The closest-pair search is `O(P²)` in the number of distinct points; with
//! the `parallel` feature it runs over component pairs on Rayon's pool and
//! picks the same winner.

use std::cmp::Ordering;
use std::fmt;

use geo::LineString;
use log::{debug, info, warn};

use wf_core::{ComponentId, Coord, CorridorId, Metric, validate_corridors};

use crate::components::{Component, RepairStatus, connected_components};
use crate::config::RepairConfig;
use crate::near_miss::bridge_near_misses;
use crate::RepairResult;

// ── Bridge ────────────────────────────────────────────────────────────────────

/// What a synthetic corridor was added for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeKind {
    /// Joins two components of the iteration it was added in.
    ComponentConnector { components: (ComponentId, ComponentId) },
    /// Joins two dead ends closer than the near-miss threshold.
    /// `dead_ends` indexes the dead-end list of the pass.
    NearMiss { corridors: (CorridorId, CorridorId), dead_ends: (usize, usize) },
}

impl BridgeKind {
    /// Value of the `connection` tag on written features.
    pub fn tag(&self) -> &'static str {
        match self {
            BridgeKind::ComponentConnector { .. } => "component-connector",
            BridgeKind::NearMiss { .. } => "auto-generated",
        }
    }
}

/// A synthetic two-point corridor appended by repair.
#[derive(Debug, Clone, PartialEq)]
pub struct Bridge {
    pub from: Coord,
    pub to: Coord,
    /// `from`–`to` length under the repair metric.
    pub distance: f64,
    pub kind: BridgeKind,
    /// Id of the appended corridor in the repaired set.
    pub corridor: CorridorId,
}

impl Bridge {
    /// Stable feature id: `component-connector-<a>-<b>` or
    /// `connection-<i>-<j>`.
    pub fn feature_id(&self) -> String {
        match self.kind {
            BridgeKind::ComponentConnector { components: (a, b) } => {
                format!("component-connector-{}-{}", a.index(), b.index())
            }
            BridgeKind::NearMiss { dead_ends: (i, j), .. } => format!("connection-{i}-{j}"),
        }
    }

    /// The two things this bridge joins, as plain indices.
    pub fn joins(&self) -> (usize, usize) {
        match self.kind {
            BridgeKind::ComponentConnector { components: (a, b) } => (a.index(), b.index()),
            BridgeKind::NearMiss { corridors: (a, b), .. } => (a.index(), b.index()),
        }
    }

    pub fn line(&self) -> LineString<f64> {
        LineString::from(vec![self.from, self.to])
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.7}, {:.7}) -> ({:.7}, {:.7}) d={:.6}",
            self.feature_id(),
            self.from.x,
            self.from.y,
            self.to.x,
            self.to.y,
            self.distance
        )
    }
}

// ── RepairOutcome ─────────────────────────────────────────────────────────────

/// Result of [`repair`].
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// Input corridors, unchanged and in order, followed by the bridges.
    pub corridors: Vec<LineString<f64>>,
    /// Appended bridges, in the order they were added.
    pub bridges: Vec<Bridge>,
    pub status: RepairStatus,
    /// Components before any bridge was added.
    pub initial_components: usize,
    /// Bridging iterations run.
    pub iterations: usize,
}

impl RepairOutcome {
    /// Input corridors left untouched.
    pub fn original_count(&self) -> usize {
        self.corridors.len() - self.bridges.len()
    }
}

// ── repair ────────────────────────────────────────────────────────────────────

/// Make `corridors` a single connected component.
///
/// Runs the near-miss pass first when `config.near_miss` is set, then
/// bridges components closest pair first.  A dataset that is already
/// connected comes back unchanged with no bridges, so repairing a repaired
/// set is a no-op.
///
/// # Errors
///
/// Fails on an empty corridor set or any corridor with fewer than two
/// points or a non-finite coordinate.
pub fn repair(corridors: &[LineString<f64>], config: &RepairConfig) -> RepairResult<RepairOutcome> {
    validate_corridors(corridors)?;

    let (mut out, mut bridges) = match &config.near_miss {
        Some(near) => {
            let pass = bridge_near_misses(corridors, config, near)?;
            (pass.corridors, pass.bridges)
        }
        None => (corridors.to_vec(), Vec::new()),
    };

    let mut components = connected_components(&out, config.key_precision);
    let initial_components = components.len();
    let cap = config.max_iterations.unwrap_or(initial_components);
    info!(
        "repairing {} corridors: {} components, {} near-miss bridges",
        corridors.len(),
        initial_components,
        bridges.len()
    );

    let mut iterations = 0;
    while components.len() > 1 && iterations < cap {
        iterations += 1;
        let Some(best) = closest_pair(&components, config.metric) else {
            break;
        };
        let from = components[best.a].points[best.pa];
        let to = components[best.b].points[best.pb];
        let bridge = Bridge {
            from,
            to,
            distance: best.distance,
            kind: BridgeKind::ComponentConnector {
                components: (ComponentId::from_index(best.a), ComponentId::from_index(best.b)),
            },
            corridor: CorridorId::from_index(out.len()),
        };
        debug!("iteration {iterations}: {bridge}");
        out.push(bridge.line());
        bridges.push(bridge);
        components = connected_components(&out, config.key_precision);
    }

    let status = RepairStatus::from_component_count(components.len());
    match status {
        RepairStatus::Connected => {
            info!("connected after {iterations} iterations, {} bridges", bridges.len())
        }
        RepairStatus::NeedsReview { components } => {
            warn!("{components} components remain after {iterations} iterations; needs review")
        }
    }

    Ok(RepairOutcome { corridors: out, bridges, status, initial_components, iterations })
}

// ── Closest pair ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    a: usize,
    b: usize,
    pa: usize,
    pb: usize,
}

// Shortest first; ties go to the lowest (component, component, point, point).
fn by_distance(x: &Candidate, y: &Candidate) -> Ordering {
    x.distance
        .total_cmp(&y.distance)
        .then_with(|| (x.a, x.b, x.pa, x.pb).cmp(&(y.a, y.b, y.pa, y.pb)))
}

fn closest_between(components: &[Component], a: usize, b: usize, metric: Metric) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (pa, &p) in components[a].points.iter().enumerate() {
        for (pb, &q) in components[b].points.iter().enumerate() {
            let distance = metric.distance(p, q);
            if best.is_none_or(|c| distance < c.distance) {
                best = Some(Candidate { distance, a, b, pa, pb });
            }
        }
    }
    best
}

fn closest_pair(components: &[Component], metric: Metric) -> Option<Candidate> {
    let n = components.len();
    let pairs: Vec<(usize, usize)> = (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b))).collect();

    #[cfg(not(feature = "parallel"))]
    {
        pairs
            .iter()
            .filter_map(|&(a, b)| closest_between(components, a, b, metric))
            .min_by(by_distance)
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .filter_map(|&(a, b)| closest_between(components, a, b, metric))
            .min_by(by_distance)
    }
}
