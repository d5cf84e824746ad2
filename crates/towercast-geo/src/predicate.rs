use std::collections::HashMap;

use towercast_core::error::{Result, TowercastError};
use towercast_core::models::{Geometry, GeometryPredicate};

use crate::coordinates::format_polygon;
use crate::geojson_literal::{geometry_type, is_empty_region, looks_like_geojson};

/// Build a [`GeometryPredicate`] from market request parameters.
///
/// Recognized keys are `coordinates`, `geojson` and `exclude`; anything else
/// is logged and ignored. When both `coordinates` and `geojson` are present
/// the coordinate list wins.
pub fn parse_predicate(params: &HashMap<String, String>) -> Result<GeometryPredicate> {
    for (key, value) in params {
        if !matches!(key.as_str(), "coordinates" | "geojson" | "exclude") {
            tracing::warn!(key = %key, value = %value, "Unknown market argument");
        }
    }

    let include = include_geometry(params).ok_or(TowercastError::MissingGeometry)?;
    let exclude = params.get("exclude").and_then(|raw| region_geometry(raw));

    tracing::debug!(
        include_form = ?include.form(),
        include_type = geometry_type(include.as_param()).unwrap_or("unknown"),
        has_exclude = exclude.is_some(),
        "Parsed market geometry"
    );

    Ok(GeometryPredicate { include, exclude })
}

fn include_geometry(params: &HashMap<String, String>) -> Option<Geometry> {
    if let Some(coords) = params.get("coordinates").filter(|c| !c.trim().is_empty()) {
        return Some(Geometry::Polygon(format_polygon(coords)));
    }

    params
        .get("geojson")
        .filter(|g| !is_empty_region(g))
        .map(|g| Geometry::GeoJson(g.clone()))
}

/// An exclusion takes either form; `{}` or an empty value means none.
fn region_geometry(raw: &str) -> Option<Geometry> {
    if is_empty_region(raw) {
        None
    } else if looks_like_geojson(raw) {
        Some(Geometry::GeoJson(raw.to_string()))
    } else {
        Some(Geometry::Polygon(format_polygon(raw)))
    }
}
