//! Store configuration
//!
//! Loaded from a JSON file or built in code:
//!
//! ```json
//! { "data_dir": "./data", "atomic_flush": true, "pretty": false, "log_level": "info" }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};
use crate::observability::Severity;

/// Configuration for [`Store`](crate::store::Store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one `<table>.json` per table
    pub data_dir: PathBuf,

    /// Write to a temp file and rename instead of truncating in place
    #[serde(default)]
    pub atomic_flush: bool,

    /// Indent table files
    #[serde(default)]
    pub pretty: bool,

    /// Minimum log severity: trace, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            atomic_flush: false,
            pretty: false,
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> DbResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| DbError::io(path, e))?;

        let config: StoreConfig = serde_json::from_str(&content)
            .map_err(|e| DbError::Config(format!("invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(DbError::Config("data_dir must not be empty".into()));
        }
        self.severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> DbResult<Severity> {
        self.log_level.parse()
    }
}
