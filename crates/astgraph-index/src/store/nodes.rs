//! Node operations for GraphStore.

use super::{GraphStore, InsertOutcome};
use crate::export::ExportOrder;
use crate::schema::NodeRecord;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

const SELECT_NODES: &str =
    "SELECT id, filepath, type, start_row, start_col, end_row, end_col FROM nodes";

impl GraphStore {
    /// Insert a node unless its id is already present.
    pub fn insert_node(&self, node: &NodeRecord) -> Result<InsertOutcome> {
        self.with_conn(|conn| Ok(insert_node_impl(conn, node)?))
    }

    /// Get a node by its id.
    pub fn get_node(&self, id: &str) -> Result<Option<NodeRecord>> {
        self.with_conn(|conn| {
            let node = conn
                .query_row(
                    &format!("{SELECT_NODES} WHERE id = ?1"),
                    [id],
                    NodeRecord::from_row,
                )
                .optional()?;
            Ok(node)
        })
    }

    /// Every node in the requested order.
    pub fn all_nodes(&self, order: ExportOrder) -> Result<Vec<NodeRecord>> {
        self.with_conn(|conn| {
            let sql = match order {
                ExportOrder::Natural => SELECT_NODES.to_string(),
                ExportOrder::Sorted => {
                    format!("{SELECT_NODES} ORDER BY filepath, start_row, start_col")
                }
            };
            let mut stmt = conn.prepare(&sql)?;
            let nodes = stmt
                .query_map([], NodeRecord::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(nodes)
        })
    }
}

pub(crate) fn insert_node_impl(
    conn: &Connection,
    node: &NodeRecord,
) -> rusqlite::Result<InsertOutcome> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO nodes (id, filepath, type, start_row, start_col, end_row, end_col)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let changed = stmt.execute(params![
        node.id,
        node.filepath,
        node.kind,
        node.start_row,
        node.start_col,
        node.end_row,
        node.end_col,
    ])?;

    Ok(if changed == 0 {
        InsertOutcome::Ignored
    } else {
        InsertOutcome::Inserted
    })
}
