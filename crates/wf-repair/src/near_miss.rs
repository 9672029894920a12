//! Near-miss joins between dead ends.
//!
//! A dead end is a corridor endpoint whose coordinate key occurs exactly
//! once across all vertices of all corridors.  Two dead ends on different
//! corridors that lie closer than the threshold, but not so close that they
//! are the same point, were almost certainly meant to meet.

use geo::LineString;
use log::{debug, info};
use rustc_hash::FxHashMap;

use wf_core::{Coord, CoordKey, CorridorId, validate_corridors};

use crate::bridge::{Bridge, BridgeKind, RepairOutcome};
use crate::components::{RepairStatus, connected_components};
use crate::config::{NearMissConfig, NearMissMode, RepairConfig};
use crate::RepairResult;

/// An unshared corridor endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadEnd {
    pub corridor: CorridorId,
    pub point: Coord,
    /// Whether this is the corridor's first vertex.
    pub at_start: bool,
}

/// Dead ends in corridor order, start before end.
pub fn dead_ends(corridors: &[LineString<f64>], key_precision: u32) -> Vec<DeadEnd> {
    let mut counts: FxHashMap<CoordKey, usize> = FxHashMap::default();
    for c in corridors {
        for &p in &c.0 {
            *counts.entry(CoordKey::new(p, key_precision)).or_default() += 1;
        }
    }
    let lonely = |p: Coord| counts.get(&CoordKey::new(p, key_precision)) == Some(&1);

    let mut ends = Vec::new();
    for (i, c) in corridors.iter().enumerate() {
        let corridor = CorridorId::from_index(i);
        if let (Some(&first), Some(&last)) = (c.0.first(), c.0.last()) {
            if lonely(first) {
                ends.push(DeadEnd { corridor, point: first, at_start: true });
            }
            if lonely(last) {
                ends.push(DeadEnd { corridor, point: last, at_start: false });
            }
        }
    }
    ends
}

/// Join near-miss dead ends with two-point bridges.
///
/// The returned outcome holds the input corridors followed by one bridge per
/// joined pair.  `iterations` is always 1.
pub fn bridge_near_misses(
    corridors: &[LineString<f64>],
    config: &RepairConfig,
    near: &NearMissConfig,
) -> RepairResult<RepairOutcome> {
    validate_corridors(corridors)?;
    let ends = dead_ends(corridors, config.key_precision);
    let metric = config.metric;
    let in_band = |d: f64| d > near.epsilon && d < near.threshold;

    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    match near.mode {
        NearMissMode::AllPairs => {
            for i in 0..ends.len() {
                for j in i + 1..ends.len() {
                    if ends[i].corridor == ends[j].corridor {
                        continue;
                    }
                    let d = metric.distance(ends[i].point, ends[j].point);
                    if in_band(d) {
                        pairs.push((i, j, d));
                    }
                }
            }
        }
        NearMissMode::BestMatch => {
            let mut used = vec![false; ends.len()];
            for i in 0..ends.len() {
                if used[i] {
                    continue;
                }
                let mut best: Option<(usize, f64)> = None;
                for j in i + 1..ends.len() {
                    if used[j] || ends[i].corridor == ends[j].corridor {
                        continue;
                    }
                    let d = metric.distance(ends[i].point, ends[j].point);
                    if in_band(d) && best.is_none_or(|(_, b)| d < b) {
                        best = Some((j, d));
                    }
                }
                if let Some((j, d)) = best {
                    used[i] = true;
                    used[j] = true;
                    pairs.push((i, j, d));
                }
            }
        }
    }

    let mut out = corridors.to_vec();
    let mut bridges = Vec::with_capacity(pairs.len());
    for (i, j, distance) in pairs {
        let bridge = Bridge {
            from: ends[i].point,
            to: ends[j].point,
            distance,
            kind: BridgeKind::NearMiss {
                corridors: (ends[i].corridor, ends[j].corridor),
                dead_ends: (i, j),
            },
            corridor: CorridorId::from_index(out.len()),
        };
        debug!("near miss: {bridge}");
        out.push(bridge.line());
        bridges.push(bridge);
    }
    info!("{} dead ends, {} near-miss bridges", ends.len(), bridges.len());

    let before = connected_components(corridors, config.key_precision).len();
    let after = connected_components(&out, config.key_precision).len();
    Ok(RepairOutcome {
        corridors: out,
        bridges,
        status: RepairStatus::from_component_count(after),
        initial_components: before,
        iterations: 1,
    })
}
