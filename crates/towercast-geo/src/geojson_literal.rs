//! GeoJSON literal inspection
//!
//! GeoJSON regions are handed to the database as text and parsed there. The
//! helpers here only classify the literal; they never rewrite it.

use geojson::{GeoJson, Value};
use std::str::FromStr;

/// Check whether a region parameter means "no region".
///
/// Clients send `{}` when no exclusion is drawn.
pub fn is_empty_region(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return true;
    }

    matches!(
        serde_json::from_str::<serde_json::Value>(trimmed),
        Ok(serde_json::Value::Object(map)) if map.is_empty()
    )
}

/// A region parameter is GeoJSON when it opens with a JSON object
pub fn looks_like_geojson(raw: &str) -> bool {
    raw.trim_start().starts_with('{')
}

/// Geometry type of a GeoJSON literal, for logging.
///
/// Returns `None` when the literal does not parse; the database remains the
/// authority on whether it is usable.
pub fn geometry_type(raw: &str) -> Option<&'static str> {
    match GeoJson::from_str(raw).ok()? {
        GeoJson::Geometry(geometry) => Some(value_type(&geometry.value)),
        GeoJson::Feature(feature) => feature.geometry.map(|g| value_type(&g.value)),
        GeoJson::FeatureCollection(_) => Some("FeatureCollection"),
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
