//! In-memory table storage for tests and embedding

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::document::Document;
use crate::error::{DbError, DbResult};

use super::TableStorage;

/// Table storage that keeps every table in a map
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Document>>> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableStorage for MemoryStorage {
    fn load_table(&self, table: &str) -> DbResult<Vec<Document>> {
        self.tables()
            .get(table)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(table.to_string()))
    }

    fn flush_table(&self, table: &str, documents: &[Document]) -> DbResult<()> {
        if documents.is_empty() {
            return Ok(());
        }
        self.tables().insert(table.to_string(), documents.to_vec());
        Ok(())
    }

    fn drop_table(&self, table: &str) -> DbResult<()> {
        self.tables().remove(table);
        Ok(())
    }

    fn list_tables(&self) -> DbResult<Vec<String>> {
        let mut tables: Vec<String> = self.tables().keys().cloned().collect();
        tables.sort();
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64) -> Document {
        let mut doc = Document::new();
        doc.insert("id", id);
        doc
    }

    #[test]
    fn test_load_missing_table() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.load_table("users"),
            Err(DbError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_flush_and_load() {
        let storage = MemoryStorage::new();
        storage.flush_table("users", &[doc(1), doc(2)]).unwrap();
        assert_eq!(storage.load_table("users").unwrap(), vec![doc(1), doc(2)]);

        // empty flush keeps the previous contents
        storage.flush_table("users", &[]).unwrap();
        assert_eq!(storage.load_table("users").unwrap().len(), 2);
    }

    #[test]
    fn test_drop_and_list() {
        let storage = MemoryStorage::new();
        storage.flush_table("b", &[doc(1)]).unwrap();
        storage.flush_table("a", &[doc(1)]).unwrap();
        assert_eq!(storage.list_tables().unwrap(), vec!["a", "b"]);

        storage.drop_table("a").unwrap();
        assert_eq!(storage.list_tables().unwrap(), vec!["b"]);
    }
}
