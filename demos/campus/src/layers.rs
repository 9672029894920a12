//! Synthetic campus definition.
//!
//! A small lon/lat campus: a concourse with a library loop and quad paths,
//! an east wing drawn as a separate island, a gym spur stopping a few metres
//! short of the concourse, and one building footprint.

use anyhow::Result;

use wf_spatial::{CampusLayers, parse_geojson};

pub const CAMPUS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "Type": "Corridor", "name": "Main concourse" },
      "geometry": { "type": "LineString",
        "coordinates": [[-88.1800, 30.6900], [-88.1790, 30.6900], [-88.1780, 30.6900]] } },
    { "type": "Feature", "properties": { "Type": "corridor", "name": "North walk" },
      "geometry": { "type": "LineString",
        "coordinates": [[-88.1800, 30.6900], [-88.1800, 30.6910]] } },
    { "type": "Feature", "properties": { "Type": "corridor", "name": "Library path" },
      "geometry": { "type": "LineString",
        "coordinates": [[-88.1790, 30.6900], [-88.1790, 30.6910], [-88.1780, 30.6910]] } },
    { "type": "Feature", "properties": { "Type": "corridor", "name": "Quad paths" },
      "geometry": { "type": "MultiLineString",
        "coordinates": [
          [[-88.1800, 30.6910], [-88.1790, 30.6910]],
          [[-88.1780, 30.6910], [-88.1780, 30.6900]]
        ] } },
    { "type": "Feature", "properties": { "Type": "corridor", "name": "East wing" },
      "geometry": { "type": "LineString",
        "coordinates": [[-88.1770, 30.6900], [-88.1760, 30.6900], [-88.1760, 30.6905]] } },
    { "type": "Feature", "properties": { "Type": "corridor", "name": "Gym spur" },
      "geometry": { "type": "LineString",
        "coordinates": [[-88.1800, 30.68996], [-88.1800, 30.6895]] } },
    { "type": "Feature", "properties": { "Type": "building", "name": "Science Hall" },
      "geometry": { "type": "Polygon",
        "coordinates": [[[-88.1798, 30.6902], [-88.1792, 30.6902], [-88.1792, 30.6908],
                         [-88.1798, 30.6908], [-88.1798, 30.6902]]] } },
    { "type": "Feature", "properties": { "Type": "kiosk", "name": "Welcome kiosk" },
      "geometry": { "type": "Point", "coordinates": [-88.17995, 30.69002] } }
  ]
}"#;

/// Parse [`CAMPUS_GEOJSON`] into corridors and obstacles.
pub fn campus_layers() -> Result<CampusLayers> {
    let gj = parse_geojson(CAMPUS_GEOJSON)?;
    Ok(CampusLayers::from_geojson(&gj))
}
