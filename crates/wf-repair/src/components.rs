//! Connected-component scan over corridors.
//!
//! Two corridors are connected when any of their vertices share a
//! coordinate key, which is the same rule the graph builder uses to merge
//! nodes.  Components are discovered by depth-first search in corridor
//! order, so component `0` always contains corridor `0`.

use geo::LineString;
use rustc_hash::{FxHashMap, FxHashSet};

use wf_core::{ComponentId, Coord, CoordKey, CorridorId};

/// A maximal set of mutually reachable corridors.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    /// Member corridors, ascending.
    pub corridors: Vec<CorridorId>,
    /// Distinct points of the member corridors, in corridor then vertex
    /// order.
    pub points: Vec<Coord>,
}

/// Result of a scan: done, or still split and needing a look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepairStatus {
    Connected,
    NeedsReview { components: usize },
}

impl RepairStatus {
    pub fn from_component_count(components: usize) -> Self {
        if components <= 1 {
            RepairStatus::Connected
        } else {
            RepairStatus::NeedsReview { components }
        }
    }

    pub fn is_connected(self) -> bool {
        self == RepairStatus::Connected
    }
}

/// Partition `corridors` into connected components.
pub fn connected_components(corridors: &[LineString<f64>], key_precision: u32) -> Vec<Component> {
    let keys: Vec<Vec<CoordKey>> = corridors
        .iter()
        .map(|c| c.0.iter().map(|&p| CoordKey::new(p, key_precision)).collect())
        .collect();

    let mut touching: FxHashMap<CoordKey, Vec<usize>> = FxHashMap::default();
    for (i, corridor_keys) in keys.iter().enumerate() {
        for &k in corridor_keys {
            let list = touching.entry(k).or_default();
            if list.last() != Some(&i) {
                list.push(i);
            }
        }
    }

    let mut visited = vec![false; corridors.len()];
    let mut components = Vec::new();
    for start in 0..corridors.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack = vec![start];
        let mut members = Vec::new();
        while let Some(i) = stack.pop() {
            members.push(i);
            for k in &keys[i] {
                for &j in touching.get(k).into_iter().flatten() {
                    if !visited[j] {
                        visited[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        members.sort_unstable();

        let mut seen: FxHashSet<CoordKey> = FxHashSet::default();
        let mut points = Vec::new();
        for &i in &members {
            for (&p, &k) in corridors[i].0.iter().zip(&keys[i]) {
                if seen.insert(k) {
                    points.push(p);
                }
            }
        }

        components.push(Component {
            id: ComponentId::from_index(components.len()),
            corridors: members.into_iter().map(CorridorId::from_index).collect(),
            points,
        });
    }
    components
}
