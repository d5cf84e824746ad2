//! Executor-neutral result rows

use towercast_core::models::ErrorCode;

/// Declared type of one projected column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// 64-bit integer
    Int,
    /// Double precision float
    Float,
    /// Text
    Text,
    /// Array of 32-bit integers
    IntArray,
}

/// One decoded column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    IntArray(Vec<i32>),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats, or integers widened to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(v) => Some(*v),
            SqlValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            SqlValue::IntArray(v) => Some(v),
            _ => None,
        }
    }
}

const NULL: SqlValue = SqlValue::Null;

/// A decoded result row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Vec<SqlValue>);

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self(values)
    }

    /// Column value by position; out-of-range reads as NULL
    pub fn get(&self, index: usize) -> &SqlValue {
        self.0.get(index).unwrap_or(&NULL)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rows returned by one statement, plus the number of rows that failed to decode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub rows: Vec<Row>,
    pub scan_failures: usize,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, scan_failures: 0 }
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Any row that failed to decode turns the whole result into a query failure,
    /// while the rows that did decode are still reported.
    pub fn error_code(&self) -> ErrorCode {
        if self.scan_failures > 0 {
            ErrorCode::QueryFailure
        } else {
            ErrorCode::Success
        }
    }
}
