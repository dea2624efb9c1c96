//! JSON file table storage
//!
//! Layout: `<base_dir>/<table>.json`, one JSON array of objects per table.
//!
//! Every flush rewrites the whole file. With `atomic_flush` the array is
//! written to `<table>.json.tmp`, synced, then renamed over the table file;
//! without it the table file is truncated and written in place, so a crash
//! mid-flush can leave a truncated file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{DbError, DbResult};
use crate::observability::{Event, Logger};

use super::TableStorage;

const TABLE_EXTENSION: &str = "json";

/// Table storage backed by one JSON file per table
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_dir: PathBuf,
    atomic_flush: bool,
    pretty: bool,
}

impl JsonFileStorage {
    /// Opens storage rooted at `base_dir`, creating the directory if missing.
    pub fn open(base_dir: impl Into<PathBuf>) -> DbResult<Self> {
        let base_dir = base_dir.into();
        if !base_dir.exists() {
            fs::create_dir_all(&base_dir).map_err(|e| DbError::io(&base_dir, e))?;
        }
        Ok(Self {
            base_dir,
            atomic_flush: false,
            pretty: false,
        })
    }

    /// Write to a temporary file and rename it over the table file
    pub fn with_atomic_flush(mut self, atomic_flush: bool) -> Self {
        self.atomic_flush = atomic_flush;
        self
    }

    /// Indent table files for humans
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", table, TABLE_EXTENSION))
    }

    fn write_documents(&self, path: &Path, documents: &[Document]) -> DbResult<()> {
        let file = File::create(path).map_err(|e| DbError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, documents)?;
        } else {
            serde_json::to_writer(&mut writer, documents)?;
        }
        writer.write_all(b"\n").map_err(|e| DbError::io(path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| DbError::io(path, e.into_error()))?;
        if self.atomic_flush {
            file.sync_all().map_err(|e| DbError::io(path, e))?;
        }
        Ok(())
    }
}

impl TableStorage for JsonFileStorage {
    fn load_table(&self, table: &str) -> DbResult<Vec<Document>> {
        let path = self.table_path(table);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DbError::TableNotFound(table.to_string()))
            }
            Err(e) => return Err(DbError::io(&path, e)),
        };

        let documents: Vec<Document> = serde_json::from_reader(BufReader::new(file))?;
        Logger::trace(
            Event::TableLoaded,
            &[("table", table), ("documents", &documents.len().to_string())],
        );
        Ok(documents)
    }

    fn flush_table(&self, table: &str, documents: &[Document]) -> DbResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let path = self.table_path(table);
        if self.atomic_flush {
            let tmp = path.with_extension(format!("{}.tmp", TABLE_EXTENSION));
            self.write_documents(&tmp, documents)?;
            fs::rename(&tmp, &path).map_err(|e| DbError::io(&path, e))?;
        } else {
            self.write_documents(&path, documents)?;
        }

        Logger::info(
            Event::TableFlushed,
            &[("table", table), ("documents", &documents.len().to_string())],
        );
        Ok(())
    }

    fn drop_table(&self, table: &str) -> DbResult<()> {
        let path = self.table_path(table);
        match fs::remove_file(&path) {
            Ok(()) => {
                Logger::info(Event::TableDropped, &[("table", table)]);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DbError::io(&path, e)),
        }
    }

    fn list_tables(&self) -> DbResult<Vec<String>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| DbError::io(&self.base_dir, e))?;

        let mut tables = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DbError::io(&self.base_dir, e))?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != TABLE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tables.push(stem.to_string());
            }
        }
        tables.sort();
        Ok(tables)
    }
}
