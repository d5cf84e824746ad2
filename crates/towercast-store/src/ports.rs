use async_trait::async_trait;

use crate::compiler::CompiledQuery;
use crate::error::StoreError;
use crate::rows::RowSet;

/// Port for executing compiled spatial queries
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Run the statement with its bound arguments and decode every row by
    /// the query's declared columns.
    ///
    /// Implementations must release the connection on every path. Rows that
    /// fail to decode are counted in [`RowSet::scan_failures`] instead of
    /// failing the whole call.
    async fn query(&self, query: &CompiledQuery) -> Result<RowSet, StoreError>;
}
