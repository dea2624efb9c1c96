//! Error types for jsondb
//!
//! Error codes:
//! - JSONDB_PRIMARY_KEY_MISSING
//! - JSONDB_COLUMN_NOT_EXISTS
//! - JSONDB_RECORD_NOT_FOUND
//! - JSONDB_TABLE_NOT_FOUND
//! - JSONDB_INVALID_OPERATOR
//! - JSONDB_INVALID_WHERE
//! - JSONDB_IO_ERROR
//! - JSONDB_SERIALIZATION_FAILED
//! - JSONDB_CONFIG_ERROR

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for all store operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced to callers of the store
#[derive(Debug, Error)]
pub enum DbError {
    /// The record type declares a primary key that matches none of its fields
    #[error("primary key not exists for table '{table}'")]
    PrimaryKeyMissing { table: String },

    #[error("column not exists: {0}")]
    ColumnNotExists(String),

    #[error("record not found")]
    RecordNotFound,

    /// The backing file for a table does not exist
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("invalid operator: '{0}'")]
    InvalidOperator(String),

    #[error("invalid where expression: '{0}'")]
    InvalidWhere(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Wraps an I/O failure together with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DbError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn primary_key_missing(table: impl Into<String>) -> Self {
        DbError::PrimaryKeyMissing {
            table: table.into(),
        }
    }

    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            DbError::PrimaryKeyMissing { .. } => "JSONDB_PRIMARY_KEY_MISSING",
            DbError::ColumnNotExists(_) => "JSONDB_COLUMN_NOT_EXISTS",
            DbError::RecordNotFound => "JSONDB_RECORD_NOT_FOUND",
            DbError::TableNotFound(_) => "JSONDB_TABLE_NOT_FOUND",
            DbError::InvalidOperator(_) => "JSONDB_INVALID_OPERATOR",
            DbError::InvalidWhere(_) => "JSONDB_INVALID_WHERE",
            DbError::Io { .. } => "JSONDB_IO_ERROR",
            DbError::Serialization(_) => "JSONDB_SERIALIZATION_FAILED",
            DbError::Config(_) => "JSONDB_CONFIG_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::RecordNotFound)
    }
}
