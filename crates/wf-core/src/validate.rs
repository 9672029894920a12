//! Input validation shared by the graph builder and the repair tool.
//!
//! Malformed input fails fast: no partial graph is built and no repair is
//! attempted on data the caller could not have meant.

use geo::LineString;

use crate::{Coord, CoreError, CoreResult};

/// Reject NaN or infinite components.
#[inline]
pub fn ensure_finite(c: Coord) -> CoreResult<()> {
    if c.x.is_finite() && c.y.is_finite() {
        Ok(())
    } else {
        Err(CoreError::NonFiniteCoordinate { x: c.x, y: c.y })
    }
}

/// A corridor needs at least two finite points.
pub fn validate_corridor(index: usize, corridor: &LineString<f64>) -> CoreResult<()> {
    if corridor.0.len() < 2 {
        return Err(CoreError::InvalidInput(format!(
            "corridor {index} has {} point(s); at least 2 are required",
            corridor.0.len()
        )));
    }
    corridor.0.iter().try_for_each(|&c| ensure_finite(c))
}

/// Validate a whole corridor set: non-empty, every corridor well formed.
pub fn validate_corridors(corridors: &[LineString<f64>]) -> CoreResult<()> {
    if corridors.is_empty() {
        return Err(CoreError::InvalidInput("corridor list is empty".into()));
    }
    corridors
        .iter()
        .enumerate()
        .try_for_each(|(i, c)| validate_corridor(i, c))
}

/// Whether a feature whose `Type` property is `kind` is a walkable corridor:
/// `corridor` in any case, or no type at all.
///
/// Both GeoJSON loaders select corridors with this, so the repair tool and
/// the router see the same corridor set.
pub fn is_corridor_kind(kind: Option<&str>) -> bool {
    kind.is_none_or(|k| k.eq_ignore_ascii_case("corridor"))
}
