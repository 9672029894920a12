//! Splitting a self-touching corridor at its junctions.

use geo::LineString;
use rustc_hash::{FxHashMap, FxHashSet};

use wf_core::{Coord, CoordKey};

/// Split `line` at every vertex whose key occurs more than once in it.
///
/// A hand-drawn corridor that doubles back over itself becomes a set of
/// simple pieces that meet at the repeated vertices.  Pieces have at least
/// two points; a piece with the same endpoints as an earlier one (in either
/// direction) is dropped.  A line with no repeated vertex comes back as a
/// single piece.
pub fn split_at_junctions(line: &LineString<f64>, key_precision: u32) -> Vec<LineString<f64>> {
    let key = |p: Coord| CoordKey::new(p, key_precision);

    let mut counts: FxHashMap<CoordKey, usize> = FxHashMap::default();
    for &p in &line.0 {
        *counts.entry(key(p)).or_default() += 1;
    }
    let is_junction = |p: Coord| counts.get(&key(p)).is_some_and(|&n| n > 1);

    let mut pieces: Vec<Vec<Coord>> = Vec::new();
    let mut current: Vec<Coord> = Vec::new();
    for (i, &p) in line.0.iter().enumerate() {
        current.push(p);
        if i > 0 && is_junction(p) && current.len() >= 2 {
            pieces.push(std::mem::replace(&mut current, vec![p]));
        }
    }
    if current.len() >= 2 {
        pieces.push(current);
    }

    let mut seen: FxHashSet<(CoordKey, CoordKey)> = FxHashSet::default();
    pieces
        .into_iter()
        .filter(|piece| {
            let (a, b) = (key(piece[0]), key(piece[piece.len() - 1]));
            let undirected = if a <= b { (a, b) } else { (b, a) };
            seen.insert(undirected)
        })
        .map(LineString::from)
        .collect()
}
