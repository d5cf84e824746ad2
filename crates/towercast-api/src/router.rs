use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let output_dir = state.config.output_dir.clone();
    let api_config = state.config.clone();

    // Coverage output is public
    let open_cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    // Market data is only readable from the configured site
    let market_cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin.to_str().map(|o| api_config.origin_allowed(o)).unwrap_or(false)
        }))
        .allow_methods([Method::GET]);

    let coverage = Router::new()
        .route("/", get(handlers::status))
        .route("/coverage-request", get(handlers::coverage_request))
        .route("/coverage-request/", get(handlers::coverage_request))
        .nest_service("/coverage-file", ServeDir::new(output_dir))
        .layer(open_cors);

    let market = Router::new()
        .route("/market-size", get(handlers::market_size))
        .route("/market-size/", get(handlers::market_size))
        .route("/market-count", get(handlers::market_count))
        .route("/market-count/", get(handlers::market_count))
        .route("/market-income", get(handlers::market_income))
        .route("/market-income/", get(handlers::market_income))
        .route("/market-competition", get(handlers::market_competition))
        .route("/market-competition/", get(handlers::market_competition))
        .route("/market-rdof", get(handlers::market_rdof))
        .route("/market-rdof/", get(handlers::market_rdof))
        .route("/market-data-available", get(handlers::market_data_available))
        .route("/market-data-available/", get(handlers::market_data_available))
        .layer(market_cors);

    Router::new()
        .merge(coverage)
        .merge(market)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
