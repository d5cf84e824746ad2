//! In-memory SQL executor for development and testing.
//!
//! Rows are scripted per operation. Lock poisoning is unwrapped: a poisoned
//! lock means a test already panicked.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::compiler::{CompiledQuery, OperationKind};
use crate::error::StoreError;
use crate::ports::SqlExecutor;
use crate::rows::{Row, RowSet};

#[derive(Debug, Clone)]
enum Fixture {
    Rows(Vec<Row>),
    ConnectionFailure,
    QueryFailure,
}

/// Scripted implementation of [`SqlExecutor`].
///
/// Operations without a fixture return zero rows. Rows whose width differs
/// from the query's declared columns are counted as scan failures, the way
/// the PostgreSQL adapter counts rows it cannot decode.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    fixtures: Arc<RwLock<HashMap<OperationKind, Fixture>>>,
    executed: Arc<RwLock<Vec<CompiledQuery>>>,
}

impl MemoryExecutor {
    /// Create an executor with no fixtures
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `rows` for every query of `operation`
    pub fn with_rows(self, operation: OperationKind, rows: Vec<Row>) -> Self {
        self.fixtures.write().unwrap().insert(operation, Fixture::Rows(rows));
        self
    }

    /// Fail every query of `operation` as if the database were unreachable
    pub fn with_connection_failure(self, operation: OperationKind) -> Self {
        self.fixtures.write().unwrap().insert(operation, Fixture::ConnectionFailure);
        self
    }

    /// Fail every query of `operation` as if the statement were rejected
    pub fn with_query_failure(self, operation: OperationKind) -> Self {
        self.fixtures.write().unwrap().insert(operation, Fixture::QueryFailure);
        self
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<CompiledQuery> {
        self.executed.read().unwrap().clone()
    }
}

#[async_trait]
impl SqlExecutor for MemoryExecutor {
    async fn query(&self, query: &CompiledQuery) -> Result<RowSet, StoreError> {
        self.executed.write().unwrap().push(query.clone());

        let fixture = self.fixtures.read().unwrap().get(&query.operation).cloned();
        match fixture {
            None => Ok(RowSet::default()),
            Some(Fixture::ConnectionFailure) => {
                Err(StoreError::Connection("scripted connection failure".to_string()))
            }
            Some(Fixture::QueryFailure) => {
                Err(StoreError::Query("scripted query failure".to_string()))
            }
            Some(Fixture::Rows(rows)) => {
                let mut set = RowSet::default();
                for row in rows {
                    if row.len() == query.columns.len() {
                        set.rows.push(row);
                    } else {
                        set.scan_failures += 1;
                    }
                }
                Ok(set)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::rows::SqlValue;
    use towercast_core::models::{Geometry, GeometryPredicate};

    fn predicate() -> GeometryPredicate {
        GeometryPredicate::new(Geometry::Polygon("POLYGON((0 0,1 1))".into()))
    }

    #[tokio::test]
    async fn test_unscripted_operation_returns_no_rows() {
        let executor = MemoryExecutor::new();
        let rows = executor.query(&compile(OperationKind::RdofList, &predicate())).await.unwrap();
        assert!(rows.rows.is_empty());
        assert_eq!(executor.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_width_rows_are_scan_failures() {
        let executor = MemoryExecutor::new().with_rows(
            OperationKind::BuildingCount,
            vec![Row::new(vec![SqlValue::Int(3)]), Row::new(vec![SqlValue::Int(3), SqlValue::Null])],
        );
        let rows =
            executor.query(&compile(OperationKind::BuildingCount, &predicate())).await.unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.scan_failures, 1);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let executor = MemoryExecutor::new()
            .with_connection_failure(OperationKind::BuildingCount)
            .with_query_failure(OperationKind::RdofList);

        let err = executor
            .query(&compile(OperationKind::BuildingCount, &predicate()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));

        let err =
            executor.query(&compile(OperationKind::RdofList, &predicate())).await.unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }
}
