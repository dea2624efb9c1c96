//! Observable events in jsondb

use std::fmt;

/// Events emitted by the store, its table storage and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Store opened on a base directory
    StoreOpen,
    /// Table read into memory
    TableLoaded,
    /// Table read failed for a reason other than a missing file
    TableLoadFailed,
    /// Table rewritten
    TableFlushed,
    /// Table file removed
    TableDropped,
    RecordInserted,
    RecordUpdated,
    RecordDeleted,
    /// Primary-key lookup found no document
    RecordNotFound,
    /// Query snapshot taken
    QueryCreated,
    /// CLI command ended with an error
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpen => "STORE_OPEN",
            Event::TableLoaded => "TABLE_LOADED",
            Event::TableLoadFailed => "TABLE_LOAD_FAILED",
            Event::TableFlushed => "TABLE_FLUSHED",
            Event::TableDropped => "TABLE_DROPPED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::RecordNotFound => "RECORD_NOT_FOUND",
            Event::QueryCreated => "QUERY_CREATED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
