//! SQLite-backed storage for the syntax-node graph.
//!
//! `GraphStore` owns the connection to the graph database. Node and edge
//! operations live in the submodules; bulk writes during indexing go
//! through [`GraphWriter`], which keeps one transaction open for the run.

mod edges;
mod nodes;
mod writer;

use crate::schema::init_schema;
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub use writer::GraphWriter;

/// Result of an insert-or-ignore write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same primary key already existed and was kept.
    Ignored,
}

/// The storage interface for the syntax-node graph.
pub struct GraphStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl GraphStore {
    /// Open or create the graph database at the given path.
    ///
    /// Missing parent directories are created. WAL journaling is persisted
    /// in the database file itself, so it stays on for later connections.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        Self::configure(&conn)?;
        init_schema(&conn).context("Failed to initialize graph schema")?;

        debug!("Opened graph store at {:?}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        })
    }

    /// Open an existing graph database read-only.
    ///
    /// Returns `Ok(None)` when the file is absent or holds no graph tables,
    /// so readers can treat "no store" the same as "empty store". Nothing is
    /// created or written.
    pub fn open_existing(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database at {:?}", path))?;

        let graph_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('nodes', 'edges')",
                [],
                |row| row.get(0),
            )
            .with_context(|| format!("Failed to read schema of {:?}", path))?;
        if graph_tables < 2 {
            debug!("No graph tables in {:?}", path);
            return Ok(None);
        }

        Ok(Some(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        }))
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn configure(conn: &Connection) -> Result<()> {
        // WAL lets readers (export, stats) run while an index is written
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA busy_timeout=5000;",
        )
        .context("Failed to configure database")?;
        Ok(())
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Helper function to safely acquire the connection lock with proper error handling.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e: PoisonError<MutexGuard<Connection>>| {
                anyhow!("Database lock poisoned: {}", e)
            })?;
        f(&conn)
    }

    /// Delete every node and edge in a single transaction.
    pub fn clear_all(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "BEGIN IMMEDIATE;
                 DELETE FROM edges;
                 DELETE FROM nodes;
                 COMMIT;",
            )
            .context("Failed to clear graph")?;
            debug!("Cleared all nodes and edges");
            Ok(())
        })
    }

    /// Get graph statistics.
    pub fn get_stats(&self) -> Result<GraphStats> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM nodes) as node_count,
                    (SELECT COUNT(*) FROM edges) as edge_count,
                    (SELECT COUNT(DISTINCT filepath) FROM nodes) as file_count",
                [],
                |row| {
                    Ok(GraphStats {
                        node_count: row.get::<_, i64>(0)? as usize,
                        edge_count: row.get::<_, i64>(1)? as usize,
                        file_count: row.get::<_, i64>(2)? as usize,
                    })
                },
            )
            .map_err(Into::into)
        })
    }
}

/// Statistics about the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub file_count: usize,
}
