//! Edge operations for GraphStore.

use super::GraphStore;
use crate::schema::EdgeRecord;
use anyhow::Result;
use rusqlite::{Connection, params};

impl GraphStore {
    /// Insert a parent -> child edge. Duplicates are kept.
    pub fn insert_edge(&self, parent: &str, child: &str) -> Result<()> {
        self.with_conn(|conn| Ok(insert_edge_impl(conn, parent, child)?))
    }

    /// Child ids of a node, in insertion order.
    pub fn edges_from(&self, parent: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT child FROM edges WHERE parent = ?1 ORDER BY rowid")?;
            let children = stmt
                .query_map([parent], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(children)
        })
    }

    /// Every edge in store scan order.
    pub fn all_edges(&self) -> Result<Vec<EdgeRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT parent, child FROM edges")?;
            let edges = stmt
                .query_map([], |row| {
                    Ok(EdgeRecord {
                        parent: row.get(0)?,
                        child: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(edges)
        })
    }
}

pub(crate) fn insert_edge_impl(conn: &Connection, parent: &str, child: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached("INSERT INTO edges (parent, child) VALUES (?1, ?2)")?;
    stmt.execute(params![parent, child])?;
    Ok(())
}
