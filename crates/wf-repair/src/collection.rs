//! GeoJSON read/write for the repair tool.
//!
//! Corridors are selected exactly as the router's loader selects them:
//! `LineString` and `MultiLineString` features (one corridor per member
//! line) whose `Type`/`type` property is `corridor` in any case, or absent.
//!
//! Every input feature is carried through to the output untouched.  Bridge
//! features are appended at the end, each a two-point `LineString` with a
//! string id and these properties:
//!
//! | Bridge kind           | Properties                                                   |
//! |-----------------------|--------------------------------------------------------------|
//! | component connector   | `connection: "component-connector"`, `connects_components: [a, b]`, `distance` |
//! | near-miss join        | `connection: "auto-generated"`, `connects: [i, j]`, `distance` |

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geo::{Coord, LineString};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use log::{info, warn};

use wf_core::{CorridorId, is_corridor_kind, validate_corridor};

use crate::bridge::{Bridge, BridgeKind};
use crate::{RepairError, RepairResult};

/// A corridor document plus the corridors read from it.
#[derive(Debug, Clone)]
pub struct CorridorCollection {
    collection: FeatureCollection,
    corridors: Vec<LineString<f64>>,
    /// Feature index each corridor came from, parallel to `corridors`.
    sources: Vec<usize>,
    skipped: usize,
}

impl CorridorCollection {
    /// Take ownership of a document.  Malformed corridors are kept in the
    /// document but not repaired.
    pub fn from_geojson(gj: GeoJson) -> Self {
        let collection = match gj {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(f) => single(f),
            GeoJson::Geometry(g) => single(Feature {
                bbox: None,
                geometry: Some(g),
                id: None,
                properties: None,
                foreign_members: None,
            }),
        };

        let mut corridors = Vec::new();
        let mut sources = Vec::new();
        let mut skipped = 0;
        for (index, feature) in collection.features.iter().enumerate() {
            if !is_corridor(feature) {
                continue;
            }
            let lines: Vec<&Vec<Vec<f64>>> = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::LineString(line)) => vec![line],
                Some(Value::MultiLineString(lines)) => lines.iter().collect(),
                _ => continue,
            };
            for positions in lines {
                match to_line(positions) {
                    Some(line) if validate_corridor(corridors.len(), &line).is_ok() => {
                        corridors.push(line);
                        sources.push(index);
                    }
                    _ => {
                        warn!("leaving malformed corridor with {} position(s) unrepaired", positions.len());
                        skipped += 1;
                    }
                }
            }
        }
        info!("read {} corridors from {} features", corridors.len(), collection.features.len());
        Self { collection, corridors, sources, skipped }
    }

    pub fn corridors(&self) -> &[LineString<f64>] {
        &self.corridors
    }

    /// Index of the feature `corridor` was read from (or, for a bridge,
    /// appended as).  Members of one `MultiLineString` share a feature.
    pub fn source_feature(&self, corridor: CorridorId) -> Option<usize> {
        self.sources.get(corridor.index()).copied()
    }

    /// Malformed corridor lines left out of [`corridors`](Self::corridors).
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// Append one tagged feature per bridge.
    pub fn append_bridges(&mut self, bridges: &[Bridge]) {
        for b in bridges {
            self.sources.push(self.collection.features.len());
            self.collection.features.push(bridge_feature(b));
            self.corridors.push(b.line());
        }
    }

    pub fn into_geojson(self) -> GeoJson {
        GeoJson::FeatureCollection(self.collection)
    }

    /// Write the document as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> RepairResult<()> {
        let out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(out, &self.collection).map_err(|e| RepairError::GeoJson(e.to_string()))
    }
}

/// The GeoJSON feature written for `bridge`.
pub fn bridge_feature(bridge: &Bridge) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("connection".to_string(), bridge.kind.tag().into());
    let (a, b) = bridge.joins();
    let joins = JsonValue::Array(vec![a.into(), b.into()]);
    match bridge.kind {
        BridgeKind::ComponentConnector { .. } => properties.insert("connects_components".to_string(), joins),
        BridgeKind::NearMiss { .. } => properties.insert("connects".to_string(), joins),
    };
    properties.insert("distance".to_string(), bridge.distance.into());

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&bridge.line()))),
        id: Some(Id::String(bridge.feature_id())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Parse a corridor document from a string.
pub fn parse_collection(s: &str) -> RepairResult<CorridorCollection> {
    let gj = s.parse::<GeoJson>().map_err(|e| RepairError::GeoJson(e.to_string()))?;
    Ok(CorridorCollection::from_geojson(gj))
}

/// Read and parse a corridor document.
pub fn read_collection(path: impl AsRef<Path>) -> RepairResult<CorridorCollection> {
    let text = std::fs::read_to_string(path)?;
    parse_collection(&text)
}

fn is_corridor(feature: &Feature) -> bool {
    let kind = feature.property("Type").or_else(|| feature.property("type"));
    is_corridor_kind(kind.and_then(JsonValue::as_str))
}

fn single(feature: Feature) -> FeatureCollection {
    FeatureCollection { bbox: None, features: vec![feature], foreign_members: None }
}

fn to_line(positions: &[Vec<f64>]) -> Option<LineString<f64>> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(LineString::from)
}
