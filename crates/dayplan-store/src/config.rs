use std::env;
use std::path::{Path, PathBuf};

use dayplan_core::DocumentKind;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "DAYPLAN_DATA_DIR";

/// Where plan documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Directory holding `workout.json`, `nutrition.json`, ...
    pub data_dir: PathBuf,
}

impl DataConfig {
    /// The data directory used when nothing else is configured.
    pub const DEFAULT_DIR: &str = "data";

    /// The directory named by `DAYPLAN_DATA_DIR`, if set. An empty
    /// variable counts as unset.
    pub fn env_dir() -> Option<PathBuf> {
        env::var_os(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }

    /// Build a config from an explicit directory (tests and CLI flags).
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the `kind` document inside the data directory.
    pub fn path_for(&self, kind: DocumentKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}
