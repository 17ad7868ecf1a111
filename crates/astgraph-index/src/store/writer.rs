//! Transactional bulk writer used while indexing.

use super::InsertOutcome;
use super::edges::insert_edge_impl;
use super::nodes::insert_node_impl;
use crate::schema::NodeRecord;
use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};

/// Holds one write transaction open for the lifetime of an index run.
///
/// Individual inserts return `rusqlite` errors without poisoning the
/// transaction; the caller decides whether to count or propagate them.
/// Dropping the writer without calling [`GraphWriter::commit`] rolls back.
pub struct GraphWriter<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> GraphWriter<'conn> {
    pub fn begin(conn: &'conn Connection) -> Result<Self> {
        let tx = conn
            .unchecked_transaction()
            .context("Failed to begin graph write transaction")?;
        Ok(Self { tx })
    }

    pub fn insert_node(&self, node: &NodeRecord) -> rusqlite::Result<InsertOutcome> {
        insert_node_impl(&self.tx, node)
    }

    pub fn insert_edge(&self, parent: &str, child: &str) -> rusqlite::Result<()> {
        insert_edge_impl(&self.tx, parent, child)
    }

    pub fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .context("Failed to commit graph write transaction")
    }
}
