//! Market-sizing handlers
//!
//! Every response is 200 with an `error` code in the body. The only hard
//! failure is a service started without a database.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use towercast_core::models::{
    BuildingCount, BuildingPolygons, Competitors, DataAvailability, ErrorCode, GeometryPredicate,
    IncomeAverage, MarketRecord, RdofAuctions,
};
use towercast_geo::parse_predicate;
use towercast_store::MarketQueries;

use crate::error::ApiError;
use crate::state::AppState;

type Params = Query<HashMap<String, String>>;

pub async fn market_size(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<BuildingPolygons>, ApiError> {
    answer(&state, &params, "market-size", |market, predicate| async move {
        market.building_polygons(&predicate).await
    })
    .await
}

pub async fn market_count(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<BuildingCount>, ApiError> {
    answer(&state, &params, "market-count", |market, predicate| async move {
        market.building_count(&predicate).await
    })
    .await
}

pub async fn market_income(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<IncomeAverage>, ApiError> {
    answer(&state, &params, "market-income", |market, predicate| async move {
        market.income(&predicate).await
    })
    .await
}

pub async fn market_competition(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Competitors>, ApiError> {
    answer(&state, &params, "market-competition", |market, predicate| async move {
        market.competitors(&predicate).await
    })
    .await
}

pub async fn market_rdof(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<RdofAuctions>, ApiError> {
    answer(&state, &params, "market-rdof", |market, predicate| async move {
        market.rdof(&predicate).await
    })
    .await
}

pub async fn market_data_available(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<DataAvailability>, ApiError> {
    answer(&state, &params, "market-data-available", |market, predicate| async move {
        market.data_available(&predicate).await
    })
    .await
}

async fn answer<R, F, Fut>(
    state: &AppState,
    params: &HashMap<String, String>,
    operation: &'static str,
    query: F,
) -> Result<Json<R>, ApiError>
where
    R: MarketRecord,
    F: FnOnce(MarketQueries, GeometryPredicate) -> Fut,
    Fut: Future<Output = R>,
{
    let market = state.market.clone().ok_or_else(|| {
        ApiError::unavailable("Market data store is not configured")
            .with_details("Set DATABASE_URL and restart the service")
    })?;

    let predicate = match parse_predicate(params) {
        Ok(predicate) => predicate,
        Err(e) => {
            tracing::warn!(operation, error = %e, "Rejecting market request");
            return Ok(Json(R::failed(ErrorCode::QueryFailure)));
        }
    };

    tracing::info!(
        operation,
        form = ?predicate.include.form(),
        exclusion = predicate.has_exclusion(),
        "Processing market request"
    );

    let record = query(market, predicate).await;
    if record.error() != ErrorCode::Success {
        tracing::warn!(operation, error = record.error().code(), "Market request degraded");
    }

    Ok(Json(record))
}
