//! Where the graph database lives on disk.

use std::path::{Path, PathBuf};

/// Environment variable the CLI reads the base data directory from.
pub const DATA_DIR_ENV: &str = "ASTGRAPH_DATA_DIR";

/// Subdirectory of the data directory holding SQLite files.
pub const DB_SUBDIR: &str = "sqlite";

/// Graph database filename.
pub const DB_FILE_NAME: &str = "graphdb.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDbConfig {
    pub base_data_dir: PathBuf,
}

impl GraphDbConfig {
    pub fn new(base_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_data_dir: base_data_dir.into(),
        }
    }

    /// `<base_data_dir>/sqlite/graphdb.sqlite`
    pub fn db_path(&self) -> PathBuf {
        db_path_in(&self.base_data_dir)
    }
}

impl Default for GraphDbConfig {
    fn default() -> Self {
        Self::new(default_data_dir())
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("astgraph"))
        .unwrap_or_else(|| PathBuf::from(".astgraph"))
}

fn db_path_in(base: &Path) -> PathBuf {
    base.join(DB_SUBDIR).join(DB_FILE_NAME)
}
