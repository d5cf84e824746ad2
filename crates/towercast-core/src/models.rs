pub mod coverage;
pub mod geometry;
pub mod market;

pub use coverage::{CoverageRequest, CoverageResult};
pub use geometry::{Geometry, GeometryForm, GeometryPredicate};
pub use market::{
    is_fips_excluded, BuildingCount, BuildingPolygons, Competitors, DataAvailability, ErrorCode,
    IncomeAverage, MarketRecord, RdofAuctions, EXCLUDED_FIPS,
};
