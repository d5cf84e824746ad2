//! Towercast Store - Spatial query compilation and execution
//!
//! This crate compiles market-sizing operations into parameterized PostGIS
//! statements, defines the SQL executor port, and projects result rows into
//! the typed market records. Request geometry only ever travels as bound
//! parameters.

pub mod compiler;
pub mod error;
pub mod market;
pub mod memory;
pub mod ports;
pub mod postgres;
pub mod rows;

pub use compiler::{compile, CompiledQuery, OperationKind, PredicateClause, QuerySkeleton};
pub use error::StoreError;
pub use market::MarketQueries;
pub use memory::MemoryExecutor;
pub use ports::SqlExecutor;
pub use postgres::{PoolConfig, PostgresConfig, PostgresExecutor};
pub use rows::{ColumnKind, Row, RowSet, SqlValue};
