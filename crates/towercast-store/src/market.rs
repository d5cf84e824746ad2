//! Typed market-sizing queries
//!
//! Each method compiles one [`OperationKind`], runs it through the executor,
//! and projects the rows into the matching record. Failures never escape as
//! errors; they become the record's `error` code.

use std::sync::Arc;

use towercast_core::models::{
    is_fips_excluded, BuildingCount, BuildingPolygons, Competitors, DataAvailability,
    GeometryPredicate, IncomeAverage, MarketRecord, RdofAuctions,
};

use crate::compiler::{compile, OperationKind};
use crate::error::StoreError;
use crate::ports::SqlExecutor;
use crate::rows::RowSet;

/// Market queries over a shared SQL executor
#[derive(Clone)]
pub struct MarketQueries {
    executor: Arc<dyn SqlExecutor>,
}

impl MarketQueries {
    pub fn new(executor: Arc<dyn SqlExecutor>) -> Self {
        Self { executor }
    }

    pub async fn building_count(&self, predicate: &GeometryPredicate) -> BuildingCount {
        self.run(OperationKind::BuildingCount, predicate, project_building_count).await
    }

    pub async fn building_polygons(&self, predicate: &GeometryPredicate) -> BuildingPolygons {
        self.run(OperationKind::BuildingPolygons, predicate, project_building_polygons).await
    }

    pub async fn income(&self, predicate: &GeometryPredicate) -> IncomeAverage {
        self.run(OperationKind::IncomeAverage, predicate, project_income).await
    }

    pub async fn competitors(&self, predicate: &GeometryPredicate) -> Competitors {
        self.run(OperationKind::CompetitorAggregate, predicate, project_competitors).await
    }

    pub async fn rdof(&self, predicate: &GeometryPredicate) -> RdofAuctions {
        self.run(OperationKind::RdofList, predicate, project_rdof).await
    }

    pub async fn data_available(&self, predicate: &GeometryPredicate) -> DataAvailability {
        self.run(OperationKind::DataAvailability, predicate, project_data_availability).await
    }

    async fn run<R, F>(&self, operation: OperationKind, predicate: &GeometryPredicate, project: F) -> R
    where
        R: MarketRecord,
        F: FnOnce(&RowSet) -> R,
    {
        match self.fetch(operation, predicate).await {
            Ok(rows) => {
                let mut record = project(&rows);
                record.set_error(rows.error_code());
                record
            }
            Err(e) => {
                tracing::error!(operation = operation.name(), error = %e, "Market query failed");
                R::failed(e.error_code())
            }
        }
    }

    async fn fetch(
        &self,
        operation: OperationKind,
        predicate: &GeometryPredicate,
    ) -> Result<RowSet, StoreError> {
        let query = compile(operation, predicate);

        tracing::debug!(
            operation = operation.name(),
            placeholders = query.placeholder_count(),
            "Executing market query"
        );

        let rows = self.executor.query(&query).await?;

        if rows.scan_failures > 0 {
            tracing::warn!(
                operation = operation.name(),
                failed_rows = rows.scan_failures,
                decoded_rows = rows.rows.len(),
                "Some result rows could not be decoded"
            );
        }

        Ok(rows)
    }
}

pub fn project_building_count(rows: &RowSet) -> BuildingCount {
    BuildingCount {
        building_count: rows.first().and_then(|row| row.get(0).as_i64()).unwrap_or(0),
        ..Default::default()
    }
}

/// The reported count is the number of rows returned, not a separate COUNT.
pub fn project_building_polygons(rows: &RowSet) -> BuildingPolygons {
    let polygons: Vec<String> = rows
        .rows
        .iter()
        .filter_map(|row| row.get(0).as_text().map(str::to_string))
        .collect();

    BuildingPolygons {
        num_buildings: rows.rows.len(),
        polygons,
        ..Default::default()
    }
}

/// Zero rows or NULL averages read as 0.0
pub fn project_income(rows: &RowSet) -> IncomeAverage {
    let first = rows.first();
    IncomeAverage {
        avg_income: first.and_then(|row| row.get(0).as_f64()).unwrap_or(0.0),
        avg_error: first.and_then(|row| row.get(1).as_f64()).unwrap_or(0.0),
        ..Default::default()
    }
}

/// Row order (fastest download first) and row limit come from the SQL.
pub fn project_competitors(rows: &RowSet) -> Competitors {
    let mut record = Competitors::default();

    for row in &rows.rows {
        record.competitors.push(row.get(0).as_text().unwrap_or_default().to_string());
        record.max_down.push(row.get(1).as_f64().unwrap_or(0.0));
        record.max_up.push(row.get(2).as_f64().unwrap_or(0.0));

        let mut tech: Vec<i32> = row.get(3).as_int_array().unwrap_or_default().to_vec();
        tech.sort_unstable();
        tech.dedup();
        record.tech_codes.push(tech);
    }

    record
}

pub fn project_rdof(rows: &RowSet) -> RdofAuctions {
    let mut record = RdofAuctions::default();

    for row in &rows.rows {
        record.census_block_group.push(row.get(0).as_text().unwrap_or_default().to_string());
        record.county.push(row.get(1).as_text().unwrap_or_default().to_string());
        record.geojson.push(row.get(2).as_text().unwrap_or_default().to_string());
        record.reserve.push(row.get(3).as_f64().unwrap_or(0.0));
        record.locations.push(row.get(4).as_i64().unwrap_or(0));
    }

    record
}

/// True as soon as one returned state/territory code is outside the excluded set
pub fn project_data_availability(rows: &RowSet) -> DataAvailability {
    let data = rows
        .rows
        .iter()
        .filter_map(|row| row.get(0).as_text())
        .any(|code| !is_fips_excluded(code));

    DataAvailability { data, ..Default::default() }
}
