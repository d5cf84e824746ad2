//! PostgreSQL/PostGIS executor implementation

pub mod config;

pub use config::{ConfigError, PoolConfig, PostgresConfig};

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row as _};

use crate::compiler::CompiledQuery;
use crate::error::StoreError;
use crate::ports::SqlExecutor;
use crate::rows::{ColumnKind, Row, RowSet, SqlValue};

/// PostgreSQL executor backed by a lazily connecting pool
pub struct PostgresExecutor {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresExecutor {
    /// Create the executor without touching the network.
    ///
    /// Connections are opened on first use, so an unreachable database shows
    /// up as a per-request connection failure rather than a startup error.
    pub fn connect_lazy(config: PostgresConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect_lazy(&config.database_url)
            .map_err(|e| StoreError::Connection(format!("Invalid database URL: {}", e)))?;

        Ok(Self { pool, config })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl SqlExecutor for PostgresExecutor {
    async fn query(&self, query: &CompiledQuery) -> Result<RowSet, StoreError> {
        // Returned to the pool when dropped, on every path out of this function
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let mut statement = sqlx::query(&query.sql);
        for arg in &query.args {
            statement = statement.bind(arg.as_str());
        }

        let rows = statement.fetch_all(&mut *conn).await.map_err(classify)?;

        let mut set = RowSet::default();
        for row in &rows {
            match decode_row(row, query.columns) {
                Ok(decoded) => set.rows.push(decoded),
                Err(e) => {
                    tracing::warn!(operation = query.operation.name(), error = %e, "Failed to decode row");
                    set.scan_failures += 1;
                }
            }
        }

        Ok(set)
    }
}

/// Transport problems mid-query count as connection failures; everything
/// else is the statement's fault.
fn classify(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Connection(err.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

fn decode_row(row: &PgRow, columns: &[ColumnKind]) -> Result<Row, sqlx::Error> {
    columns
        .iter()
        .enumerate()
        .map(|(index, kind)| decode_value(row, index, *kind))
        .collect::<Result<Vec<_>, _>>()
        .map(Row::new)
}

fn decode_value(row: &PgRow, index: usize, kind: ColumnKind) -> Result<SqlValue, sqlx::Error> {
    let value = match kind {
        ColumnKind::Int => row.try_get::<Option<i64>, _>(index)?.map(SqlValue::Int),
        ColumnKind::Float => row.try_get::<Option<f64>, _>(index)?.map(SqlValue::Float),
        ColumnKind::Text => row.try_get::<Option<String>, _>(index)?.map(SqlValue::Text),
        ColumnKind::IntArray => row.try_get::<Option<Vec<i32>>, _>(index)?.map(SqlValue::IntArray),
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_lazy_does_not_dial() {
        let config = PostgresConfig::new("postgresql://towercast@127.0.0.1:1/gis").unwrap();
        let executor = PostgresExecutor::connect_lazy(config).unwrap();
        assert_eq!(executor.config().pool.max_connections, 10);
    }

    #[tokio::test]
    async fn test_connect_lazy_rejects_invalid_config() {
        let mut config = PostgresConfig::new("postgresql://localhost/gis").unwrap();
        config.pool.max_connections = 0;
        assert!(matches!(
            PostgresExecutor::connect_lazy(config),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_classify_pool_timeout_as_connection() {
        assert!(matches!(classify(sqlx::Error::PoolTimedOut), StoreError::Connection(_)));
        assert!(matches!(
            classify(sqlx::Error::ColumnNotFound("geoid".into())),
            StoreError::Query(_)
        ));
    }
}
