//! Table storage for jsondb
//!
//! A table is an ordered sequence of documents, loaded and flushed whole.
//! The store only sees the [`TableStorage`] trait, so the on-disk strategy
//! can change without touching the schema, comparison or query code.
//!
//! # Contract
//!
//! - `load_table` on a missing table: `TableNotFound`
//! - `flush_table` with no documents: no-op
//! - `drop_table` on a missing table: no-op
//! - Document order is preserved across flush/load

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::document::Document;
use crate::error::DbResult;

/// Whole-table load/flush operations
pub trait TableStorage: Send + Sync {
    /// Reads every document of a table, in stored order
    fn load_table(&self, table: &str) -> DbResult<Vec<Document>>;

    /// Replaces the table's contents; does nothing for an empty slice
    fn flush_table(&self, table: &str, documents: &[Document]) -> DbResult<()>;

    /// Removes the table entirely
    fn drop_table(&self, table: &str) -> DbResult<()>;

    /// Names of all stored tables, sorted
    fn list_tables(&self) -> DbResult<Vec<String>>;
}
