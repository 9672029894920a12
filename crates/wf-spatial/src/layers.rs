//! GeoJSON layer loading and route export.
//!
//! Corridors are read from `LineString` and `MultiLineString` features (each
//! member line of a multi-line becomes its own corridor).  A feature is a
//! corridor when its `Type`/`type` property is `corridor` in any case, or
//! when it has no such property.  Obstacles are read from `Polygon` and
//! `MultiPolygon` features.
//!
//! Malformed features (fewer than two points, non-finite or short
//! positions) are dropped with a warning rather than failing the load.

use std::path::Path;

use geo::{Coord, LineString, Polygon};
use geojson::{Feature, GeoJson, Geometry, JsonObject, JsonValue, Value};
use log::{info, warn};

use wf_core::{is_corridor_kind, validate_corridor};

use crate::router::RouteResult;
use crate::{SpatialError, SpatialResult};

/// Corridor and obstacle geometry read from GeoJSON.
#[derive(Debug, Clone, Default)]
pub struct CampusLayers {
    pub corridors: Vec<LineString<f64>>,
    pub obstacles: Vec<Polygon<f64>>,
    /// Features or member geometries dropped as malformed.
    pub skipped: usize,
}

impl CampusLayers {
    /// Read corridors and obstacles from one document.
    pub fn from_geojson(gj: &GeoJson) -> Self {
        let mut layers = Self::default();
        layers.add_corridors(gj);
        layers.add_obstacles(gj);
        layers
    }

    /// Append corridor features from `gj`.
    pub fn add_corridors(&mut self, gj: &GeoJson) {
        for (props, geometry) in features(gj) {
            if !is_corridor(props) {
                continue;
            }
            let lines: Vec<&Vec<Vec<f64>>> = match &geometry.value {
                Value::LineString(line) => vec![line],
                Value::MultiLineString(lines) => lines.iter().collect(),
                _ => continue,
            };
            for positions in lines {
                match to_line(positions) {
                    Some(line) if validate_corridor(self.corridors.len(), &line).is_ok() => {
                        self.corridors.push(line);
                    }
                    _ => {
                        warn!("dropping malformed corridor with {} position(s)", positions.len());
                        self.skipped += 1;
                    }
                }
            }
        }
        info!("loaded {} corridors", self.corridors.len());
    }

    /// Append polygon features from `gj` as obstacles.
    pub fn add_obstacles(&mut self, gj: &GeoJson) {
        for (_, geometry) in features(gj) {
            let polygons: Vec<&Vec<Vec<Vec<f64>>>> = match &geometry.value {
                Value::Polygon(rings) => vec![rings],
                Value::MultiPolygon(polys) => polys.iter().collect(),
                _ => continue,
            };
            for rings in polygons {
                match to_polygon(rings) {
                    Some(polygon) => self.obstacles.push(polygon),
                    None => {
                        warn!("dropping malformed obstacle polygon");
                        self.skipped += 1;
                    }
                }
            }
        }
        info!("loaded {} obstacles", self.obstacles.len());
    }
}

/// Parse a GeoJSON document from a string.
pub fn parse_geojson(s: &str) -> SpatialResult<GeoJson> {
    s.parse::<GeoJson>().map_err(|e| SpatialError::GeoJson(e.to_string()))
}

/// Read and parse a GeoJSON file.
pub fn read_geojson(path: impl AsRef<Path>) -> SpatialResult<GeoJson> {
    let text = std::fs::read_to_string(path)?;
    parse_geojson(&text)
}

/// `(properties, geometry)` of every feature that has a geometry.  A bare
/// geometry document yields one entry with no properties.
fn features(gj: &GeoJson) -> Vec<(Option<&JsonObject>, &Geometry)> {
    match gj {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref().map(|g| (f.properties.as_ref(), g)))
            .collect(),
        GeoJson::Feature(f) => f
            .geometry
            .as_ref()
            .map(|g| vec![(f.properties.as_ref(), g)])
            .unwrap_or_default(),
        GeoJson::Geometry(g) => vec![(None, g)],
    }
}

fn is_corridor(props: Option<&JsonObject>) -> bool {
    let kind = props.and_then(|p| p.get("Type").or_else(|| p.get("type")));
    is_corridor_kind(kind.and_then(JsonValue::as_str))
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn to_line(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    positions
        .iter()
        .map(|p| to_coord(p))
        .collect::<Option<Vec<_>>>()
        .map(LineString::from)
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = to_line(exterior).filter(|r| r.0.len() >= 4)?;
    let interiors = interiors.iter().map(|r| to_line(r)).collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}

// ── Route export ──────────────────────────────────────────────────────────────

impl RouteResult {
    /// The route as a JSON object:
    /// `{ path, distance, waypoints, valid, nodeCount?, isDirect?, error? }`.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        let path: Vec<JsonValue> = self.path.iter().map(|c| serde_json::json!([c.x, c.y])).collect();
        obj.insert("path".to_string(), JsonValue::Array(path));
        obj.insert("distance".to_string(), self.distance.into());
        obj.insert("waypoints".to_string(), self.waypoints.into());
        obj.insert("valid".to_string(), self.valid.into());
        if let Some(n) = self.node_count {
            obj.insert("nodeCount".to_string(), n.into());
        }
        if self.is_direct {
            obj.insert("isDirect".to_string(), true.into());
        }
        if let Some(failure) = self.error {
            obj.insert("error".to_string(), failure.to_string().into());
        }
        JsonValue::Object(obj)
    }

    /// The route as a `LineString` feature with `distance`, `waypoints`, and
    /// `valid` properties.  Paths with fewer than two points have no
    /// geometry.
    pub fn to_feature(&self) -> Feature {
        let geometry = (self.path.len() >= 2)
            .then(|| Geometry::new(Value::from(&LineString::from(self.path.clone()))));

        let mut properties = JsonObject::new();
        properties.insert("distance".to_string(), self.distance.into());
        properties.insert("waypoints".to_string(), self.waypoints.into());
        properties.insert("valid".to_string(), self.valid.into());
        if let Some(failure) = self.error {
            properties.insert("error".to_string(), failure.to_string().into());
        }

        Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}
