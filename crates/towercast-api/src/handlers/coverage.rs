use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use towercast_core::models::{CoverageRequest, CoverageResult};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn coverage_request(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CoverageResult>, ApiError> {
    let request = CoverageRequest::from_params(&params);

    tracing::info!(
        lat = %request.latitude,
        lng = %request.longitude,
        frequency = %request.frequency,
        radius = %request.radius,
        "Processing coverage request"
    );

    let result = state.coverage.run(&request).await?;

    Ok(Json(result))
}
