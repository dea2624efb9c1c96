//! Record store: CRUD by primary key plus ad-hoc queries
//!
//! Every operation derives the record's schema afresh, loads the whole
//! table, works on the in-memory copy and, for writes, flushes the whole
//! table back.
//!
//! # Locking
//!
//! One mutex per store serializes `insert`, `find`, `update`, `delete` and
//! `replace_into`. `replace_into` holds it across its update-then-insert
//! fallback. Queries load their snapshot without the lock, so a query can
//! observe a table that is stale relative to an in-flight write, or fail to
//! read a table file that is being rewritten in place.
//!
//! # Load failures
//!
//! - `find`, `update`, `delete`: any load failure is `RecordNotFound`
//! - `insert`: a missing table starts empty; other failures propagate
//! - queries: any load failure yields an empty snapshot

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{DbError, DbResult};
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::query::Query;
use crate::schema::{Record, Schema};
use crate::storage::{JsonFileStorage, TableStorage};
use crate::value::{compare, Value};

/// Embedded document store
pub struct Store {
    storage: Box<dyn TableStorage>,
    write_lock: Mutex<()>,
    metrics: MetricsRegistry,
}

impl Store {
    /// Opens a file-backed store, creating the data directory if missing.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        config.validate()?;
        Logger::set_threshold(config.severity()?);

        let storage = JsonFileStorage::open(&config.data_dir)?
            .with_atomic_flush(config.atomic_flush)
            .with_pretty(config.pretty);

        Logger::info(
            Event::StoreOpen,
            &[("data_dir", &config.data_dir.display().to_string())],
        );
        Ok(Self::with_storage(storage))
    }

    /// Opens a file-backed store on `data_dir` with default settings
    pub fn open_dir(data_dir: impl Into<PathBuf>) -> DbResult<Self> {
        Self::open(&StoreConfig::new(data_dir))
    }

    pub fn with_storage(storage: impl TableStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            write_lock: Mutex::new(()),
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn storage(&self) -> &dyn TableStorage {
        self.storage.as_ref()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Names of all stored tables
    pub fn tables(&self) -> DbResult<Vec<String>> {
        self.storage.list_tables()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record to its table.
    ///
    /// No uniqueness check is made on the primary key.
    pub fn insert<R: Record>(&self, record: &R) -> DbResult<()> {
        let _guard = self.lock();
        self.insert_locked(record)
    }

    /// Loads the record whose primary key equals `record`'s into `record`.
    ///
    /// Fields absent from the stored document keep their current value.
    /// Fields are assigned one at a time in declaration order, so a decode
    /// failure part way through leaves the earlier fields already overwritten.
    pub fn find<R: Record>(&self, record: &mut R) -> DbResult<()> {
        let _guard = self.lock();
        let (documents, index) = self.locate(&*record)?;
        documents[index].decode_into(record)?;
        self.metrics.increment_finds();
        Ok(())
    }

    /// Replaces the stored record with the same primary key
    pub fn update<R: Record>(&self, record: &R) -> DbResult<()> {
        let _guard = self.lock();
        self.update_locked(record)
    }

    /// Removes the stored record with the same primary key.
    ///
    /// Removing the last record drops the table file, since flushing an
    /// empty table writes nothing.
    pub fn delete<R: Record>(&self, record: &R) -> DbResult<()> {
        let _guard = self.lock();
        let table = R::table_name();
        let (mut documents, index) = self.locate(record)?;
        documents.remove(index);

        if documents.is_empty() {
            self.storage.drop_table(table)?;
        } else {
            self.storage.flush_table(table, &documents)?;
            self.metrics.increment_flushes();
        }

        self.metrics.increment_deletes();
        Logger::info(Event::RecordDeleted, &[("table", table)]);
        Ok(())
    }

    /// Updates the record, inserting it when no record has its primary key.
    ///
    /// Only `RecordNotFound` from the update triggers the insert.
    pub fn replace_into<R: Record>(&self, record: &R) -> DbResult<()> {
        let _guard = self.lock();
        match self.update_locked(record) {
            Err(DbError::RecordNotFound) => self.insert_locked(record),
            result => result,
        }
    }

    /// Starts a query over a snapshot of `R`'s table
    pub fn query<R: Record>(&self) -> DbResult<Query> {
        let schema = Schema::of::<R>()?;
        let documents = self.load_snapshot(R::table_name());
        Ok(Query::new(schema, documents))
    }

    /// Starts a query over an untyped table, inferring its schema
    pub fn query_table(&self, table: &str, primary_key: &str) -> DbResult<Query> {
        let documents = self.load_snapshot(table);
        let schema = Schema::infer(table, primary_key, &documents)?;
        Ok(Query::new(schema, documents))
    }

    fn insert_locked<R: Record>(&self, record: &R) -> DbResult<()> {
        let table = R::table_name();
        let mut documents = match self.storage.load_table(table) {
            Ok(documents) => documents,
            Err(DbError::TableNotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        documents.push(Document::from_record(record)?);
        self.storage.flush_table(table, &documents)?;

        self.metrics.increment_flushes();
        self.metrics.increment_inserts();
        Logger::info(Event::RecordInserted, &[("table", table)]);
        Ok(())
    }

    fn update_locked<R: Record>(&self, record: &R) -> DbResult<()> {
        let table = R::table_name();
        let (mut documents, index) = self.locate(record)?;
        documents[index] = Document::from_record(record)?;
        self.storage.flush_table(table, &documents)?;

        self.metrics.increment_flushes();
        self.metrics.increment_updates();
        Logger::info(Event::RecordUpdated, &[("table", table)]);
        Ok(())
    }

    /// Loads `R`'s table and finds the first document whose primary key
    /// compares equal to `record`'s.
    fn locate<R: Record>(&self, record: &R) -> DbResult<(Vec<Document>, usize)> {
        let table = R::table_name();
        let schema = Schema::of::<R>()?;
        let key = schema.primary_value(record)?;
        let primary = schema
            .primary_column()
            .ok_or_else(|| DbError::primary_key_missing(table))?;

        let documents = self.load_for_lookup(table)?;
        let position = documents.iter().position(|doc| {
            primary
                .value_in(doc)
                .map_or(false, |stored| compare(&key, stored) == Ok(Ordering::Equal))
        });

        let scanned = position.map_or(documents.len(), |i| i + 1);
        self.metrics.add_documents_scanned(scanned as u64);

        match position {
            Some(index) => Ok((documents, index)),
            None => {
                self.metrics.increment_not_found();
                Logger::trace(
                    Event::RecordNotFound,
                    &[("table", table), ("key", &describe(&key))],
                );
                Err(DbError::RecordNotFound)
            }
        }
    }

    fn load_for_lookup(&self, table: &str) -> DbResult<Vec<Document>> {
        match self.storage.load_table(table) {
            Ok(documents) => Ok(documents),
            Err(DbError::TableNotFound(_)) => Err(DbError::RecordNotFound),
            Err(e) => {
                Logger::warn(
                    Event::TableLoadFailed,
                    &[("table", table), ("error", &e.to_string())],
                );
                Err(DbError::RecordNotFound)
            }
        }
    }

    fn load_snapshot(&self, table: &str) -> Vec<Document> {
        self.metrics.increment_queries();
        let documents = match self.storage.load_table(table) {
            Ok(documents) => documents,
            Err(DbError::TableNotFound(_)) => Vec::new(),
            Err(e) => {
                Logger::warn(
                    Event::TableLoadFailed,
                    &[("table", table), ("error", &e.to_string())],
                );
                Vec::new()
            }
        };
        Logger::trace(
            Event::QueryCreated,
            &[("table", table), ("documents", &documents.len().to_string())],
        );
        documents
    }
}

fn describe(value: &Value) -> String {
    serde_json::Value::from(value.clone()).to_string()
}
