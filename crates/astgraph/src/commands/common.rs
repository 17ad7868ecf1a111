//! Common utilities for CLI commands

use anyhow::Result;
use astgraph_index::GraphDbConfig;
use std::path::{Component, Path, PathBuf};

/// Resolves a path to an absolute project root path.
/// If the path is relative, it's joined with the current directory.
/// `.` components are dropped so they never end up in stored file paths.
pub fn resolve_project_root(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    Ok(absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}

/// Uses the `--data-dir` value (or its environment variable) when given,
/// the platform data directory otherwise.
pub fn resolve_config(data_dir: Option<PathBuf>) -> GraphDbConfig {
    data_dir
        .map(GraphDbConfig::new)
        .unwrap_or_default()
}
