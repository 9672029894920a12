//! Distance metrics.
//!
//! Corridor data arrives either in a projected planar system (any unit) or
//! as GeoJSON lon/lat degrees.  [`Metric`] selects how edge weights, snap
//! distances and heuristics are measured.  Geometry itself (projection onto
//! segments, polygon tests, simplification) is always done in coordinate
//! space, treating small geographic extents as locally planar.

use crate::Coord;

/// Mean Earth radius in metres (the value used by common web-mapping
/// toolkits, so distances match what the map front-end reports).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Metres per degree of latitude on the mean sphere.
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// How distances between coordinates are measured.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Metric {
    /// Straight-line distance in coordinate units.
    #[default]
    Euclidean,
    /// Great-circle distance in metres; `x` is longitude, `y` latitude.
    Haversine,
}

impl Metric {
    /// Distance between `a` and `b` under this metric.
    pub fn distance(self, a: Coord, b: Coord) -> f64 {
        match self {
            Metric::Euclidean => (a.x - b.x).hypot(a.y - b.y),
            Metric::Haversine => haversine_m(a, b),
        }
    }

    /// Total length of a polyline.
    pub fn length(self, coords: &[Coord]) -> f64 {
        coords
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    /// Radius in coordinate units that encloses every point within
    /// `distance` of `center` under this metric.
    ///
    /// Used to turn metric thresholds into R-tree range queries; results must
    /// still be filtered with [`Metric::distance`].
    pub fn search_radius(self, center: Coord, distance: f64) -> f64 {
        match self {
            Metric::Euclidean => distance,
            Metric::Haversine => {
                let lat_extent = distance / METRES_PER_DEGREE;
                let worst_lat = (center.y.abs() + lat_extent).min(89.9);
                let cos_min = worst_lat.to_radians().cos();
                distance / (METRES_PER_DEGREE * cos_min) * 1.01
            }
        }
    }
}

/// Haversine great-circle distance in metres between lon/lat coordinates.
fn haversine_m(a: Coord, b: Coord) -> f64 {
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}
