use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use towercast_api::{create_router, ApiConfig, AppState, CoverageService};
use towercast_core::config::ServiceConfig;
use towercast_core::ports::{FileAllocator, ProcessExecutor};
use towercast_coverage::{TempFileAllocator, TokioProcessExecutor};
use towercast_store::{MarketQueries, PostgresConfig, PostgresExecutor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "towercast_api=info,towercast_coverage=info,towercast_store=info,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    let api_config = ApiConfig::from_service(&config);
    let settings = config.coverage();

    tracing::info!(
        port = api_config.port,
        signal_server = %settings.signal_server_path.display(),
        output_dir = %settings.output_dir.display(),
        "Starting Towercast API server"
    );

    for (key, (value, source)) in config.to_inspection_map() {
        tracing::debug!(key = %key, value = %value, source = ?source, "Configuration value");
    }

    let market = match config.database_url.value.as_deref() {
        Some(database_url) => Some(init_market(database_url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set; market routes will answer 503");
            None
        }
    };

    let executor: Arc<dyn ProcessExecutor> = Arc::new(TokioProcessExecutor);
    let allocator: Arc<dyn FileAllocator> = Arc::new(TempFileAllocator);
    let coverage = CoverageService::new(executor, allocator, settings);

    let addr = api_config.bind_address();
    let state = Arc::new(AppState::new(coverage, market, api_config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the market queries over a lazily connecting PostgreSQL pool.
///
/// An unreachable database is only logged here; requests then report
/// connection failures in their `error` field.
async fn init_market(database_url: &str) -> anyhow::Result<MarketQueries> {
    let config = PostgresConfig::new(database_url).context("Invalid DATABASE_URL")?;
    let executor = PostgresExecutor::connect_lazy(config)?;

    match executor.health_check().await {
        Ok(()) => tracing::info!("Connected to PostgreSQL"),
        Err(e) => tracing::warn!(error = %e, "PostgreSQL is not reachable yet"),
    }

    Ok(MarketQueries::new(Arc::new(executor)))
}
