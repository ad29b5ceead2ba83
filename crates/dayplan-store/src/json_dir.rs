//! Plan documents stored as JSON files in one directory.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use dayplan_core::{
    DailyPlan, DocumentError, DocumentKind, DocumentLoader, DocumentSet, daily_plan_from,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DataConfig;

/// Errors reading or writing the data directory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    NotAnObject(#[from] DocumentError),

    #[error("{} already exists; move or delete it first", path.display())]
    AlreadyExists { path: PathBuf },
}

/// A directory of `<kind>.json` documents.
#[derive(Debug, Clone)]
pub struct JsonDir {
    config: DataConfig,
}

impl JsonDir {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(DataConfig::new(dir))
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        self.config.data_dir()
    }

    /// Read and parse the JSON file at `path`.
    ///
    /// A missing file, or one holding only whitespace, is `Ok(None)`.
    pub fn read_path(path: &Path) -> Result<Option<Value>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "document not found");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: path.to_owned(),
                source,
            })
    }

    /// Read one document, requiring it to be a JSON object.
    pub fn load_document(&self, kind: DocumentKind) -> Result<Option<Value>, StoreError> {
        let value = Self::read_path(&self.config.path_for(kind))?;
        match value {
            Some(value) if !value.is_object() => Err(DocumentError::NotAnObject {
                kind,
                found: dayplan_core::json::type_name(&value),
            }
            .into()),
            other => Ok(other),
        }
    }

    /// Write `value` as pretty JSON to `file_name` inside the directory.
    /// Refuses to replace an existing file.
    pub fn write_new(&self, file_name: &str, value: &Value) -> Result<PathBuf, StoreError> {
        let path = self.dir().join(file_name);
        Self::write_new_path(&path, value)?;
        Ok(path)
    }

    /// Write `value` as pretty JSON to `path`. Refuses to replace an
    /// existing file.
    pub fn write_new_path(path: &Path, value: &Value) -> Result<(), StoreError> {
        let io_err = |source: io::Error| StoreError::Io {
            path: path.to_owned(),
            source,
        };
        let mut body = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
            path: path.to_owned(),
            source,
        })?;
        body.push('\n');

        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists {
                    path: path.to_owned(),
                });
            }
            Err(e) => return Err(io_err(e)),
        };
        file.write_all(body.as_bytes()).map_err(io_err)?;
        info!(path = %path.display(), "wrote document");
        Ok(())
    }
}

impl DocumentLoader for JsonDir {
    type Error = StoreError;

    fn load(&self, kind: DocumentKind) -> Result<Option<Value>, StoreError> {
        self.load_document(kind)
    }
}

/// Load every readable document in `config`'s directory. Unreadable files
/// are logged and skipped.
pub fn load_documents(config: &DataConfig) -> DocumentSet {
    JsonDir::new(config.clone()).load_available()
}

/// Resolve the plan for `date` from the documents in `config`'s directory.
pub fn load_daily_plan(config: &DataConfig, date: NaiveDate) -> DailyPlan {
    daily_plan_from(&JsonDir::new(config.clone()), date)
}
