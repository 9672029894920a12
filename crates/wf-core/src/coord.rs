//! Coordinate identity and small geometric helpers.
//!
//! Two coordinates are the "same point" when they round to the same integer
//! pair at a fixed decimal precision.  At geographic scale the default of 7
//! decimal places is roughly one centimetre.

use std::fmt;

use crate::Coord;

/// Decimal places used for node deduplication unless configured otherwise.
pub const DEFAULT_KEY_PRECISION: u32 = 7;

/// Upper bound on precision; beyond this `x * 10^p` loses integer exactness
/// in `f64` for typical coordinate magnitudes.
const MAX_KEY_PRECISION: u32 = 12;

/// A coordinate rounded to a fixed number of decimal places.
///
/// Used as the hash key for node lookup in the graph builder and for
/// endpoint matching in the repair tool.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CoordKey {
    x: i64,
    y: i64,
}

impl CoordKey {
    /// Round `c` to `precision` decimal places (clamped to 12).
    pub fn new(c: Coord, precision: u32) -> Self {
        let scale = 10f64.powi(precision.min(MAX_KEY_PRECISION) as i32);
        Self {
            x: (c.x * scale).round() as i64,
            y: (c.y * scale).round() as i64,
        }
    }

    /// Rounded integer components.
    #[inline]
    pub fn parts(self) -> (i64, i64) {
        (self.x, self.y)
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Midpoint of the segment `a`–`b`.
#[inline]
pub fn midpoint(a: Coord, b: Coord) -> Coord {
    lerp(a, b, 0.5)
}

/// Point at parameter `t` along `a`–`b` (`t = 0` is `a`, `t = 1` is `b`).
#[inline]
pub fn lerp(a: Coord, b: Coord, t: f64) -> Coord {
    Coord {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}
