use std::sync::Arc;

use towercast_core::ports::{FileAllocator, ProcessExecutor};
use towercast_coverage::CoveragePipeline;
use towercast_store::MarketQueries;

use crate::config::ApiConfig;

/// Coverage pipeline over swappable process and file collaborators
pub type CoverageService = CoveragePipeline<Arc<dyn ProcessExecutor>, Arc<dyn FileAllocator>>;

#[derive(Clone)]
pub struct AppState {
    pub coverage: Arc<CoverageService>,
    /// `None` when no database is configured
    pub market: Option<MarketQueries>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(coverage: CoverageService, market: Option<MarketQueries>, config: ApiConfig) -> Self {
        Self {
            coverage: Arc::new(coverage),
            market,
            config,
        }
    }
}
