//! Towercast Geo - Request geometry handling
//!
//! This crate turns loosely-typed request parameters into geometries that can
//! be bound as query parameters: legacy coordinate lists become WKT polygons,
//! GeoJSON literals pass through untouched.

pub mod coordinates;
pub mod geojson_literal;
pub mod predicate;

pub use coordinates::{format_polygon, polygon_tokens, split_tokens};
pub use predicate::parse_predicate;
