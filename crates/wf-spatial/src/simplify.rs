//! Route polyline simplification.

use geo::{LineString, Simplify};

use wf_core::Coord;

/// Douglas–Peucker simplification that keeps both endpoints.
///
/// Paths of two points or fewer, and non-positive tolerances, are returned
/// unchanged.
pub fn simplify_path(path: &[Coord], tolerance: f64) -> Vec<Coord> {
    if path.len() <= 2 || tolerance <= 0.0 {
        return path.to_vec();
    }
    LineString::from(path.to_vec()).simplify(&tolerance).0
}
