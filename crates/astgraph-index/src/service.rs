//! Entry point tying the store, indexer, exporter and cache together.

use crate::cache;
use crate::config::GraphDbConfig;
use crate::export::{ExportFormat, ExportOrder, render_context};
use crate::indexer::{IndexReport, Indexer};
use crate::store::{GraphStats, GraphStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Indexes projects into, and exports context from, one graph database.
///
/// Each operation opens the store, does its work and closes it again, so
/// separate services (or tests) pointed at different paths never share state.
#[derive(Debug, Clone)]
pub struct GraphDbService {
    db_path: PathBuf,
}

impl GraphDbService {
    pub fn new(config: &GraphDbConfig) -> Result<Self> {
        Self::with_db_path(config.db_path())
    }

    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }
        Ok(Self { db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Parse every supported file under `project_root` into a fresh graph.
    ///
    /// Fails only if the store cannot be opened, initialized, cleared or
    /// committed.
    pub fn index_project(&self, project_root: &Path) -> Result<IndexReport> {
        let store = GraphStore::open(&self.db_path)?;
        let report = Indexer::new(&store)?.index_project(project_root)?;
        info!("GraphDB: AST indexed in sqlite at {:?}", self.db_path);
        Ok(report)
    }

    /// All nodes as newline-separated context lines, in store order.
    pub fn export_context(&self) -> String {
        self.export_context_with(ExportOrder::Natural, ExportFormat::Text)
    }

    /// Like [`Self::try_export_context`], but logs failures and returns an
    /// empty string instead.
    pub fn export_context_with(&self, order: ExportOrder, format: ExportFormat) -> String {
        match self.try_export_context(order, format) {
            Ok(context) => context,
            Err(e) => {
                error!("GraphDB: export from {:?} failed: {:#}", self.db_path, e);
                String::new()
            }
        }
    }

    /// Export the graph, surfacing store access errors.
    ///
    /// A missing database file is not an error; it exports as no nodes.
    pub fn try_export_context(&self, order: ExportOrder, format: ExportFormat) -> Result<String> {
        match GraphStore::open_existing(&self.db_path)? {
            Some(store) => store.export_context(order, format),
            None => render_context(&[], format),
        }
    }

    /// Delete the database file. Failures are logged, never returned.
    pub fn clear_cache(&self) {
        cache::clear_cache(&self.db_path);
    }

    /// Graph statistics, or `None` when nothing has been indexed yet.
    pub fn stats(&self) -> Result<Option<GraphStats>> {
        GraphStore::open_existing(&self.db_path)?
            .map(|store| store.get_stats())
            .transpose()
    }
}
