use astgraph_parser::NodeSpan;
use rusqlite::{Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};

pub fn init_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        -- One row per syntax node; ids collide on (filepath, type, start)
        CREATE TABLE IF NOT EXISTS nodes (
            id TEXT PRIMARY KEY,
            filepath TEXT,
            type TEXT,
            start_row INTEGER,
            start_col INTEGER,
            end_row INTEGER,
            end_col INTEGER
        );

        -- Parent -> child edges, duplicates allowed
        CREATE TABLE IF NOT EXISTS edges (
            parent TEXT,
            child TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_edges_parent ON edges(parent);
        "#,
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub filepath: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_row: i64,
    pub start_col: i64,
    pub end_row: i64,
    pub end_col: i64,
}

impl NodeRecord {
    pub fn new(id: String, filepath: &str, kind: &str, span: NodeSpan) -> Self {
        Self {
            id,
            filepath: filepath.to_string(),
            kind: kind.to_string(),
            start_row: span.start_row as i64,
            start_col: span.start_col as i64,
            end_row: span.end_row as i64,
            end_col: span.end_col as i64,
        }
    }

    /// Columns in `nodes` table order.
    pub(crate) fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            filepath: row.get(1)?,
            kind: row.get(2)?,
            start_row: row.get(3)?,
            start_col: row.get(4)?,
            end_row: row.get(5)?,
            end_col: row.get(6)?,
        })
    }

    /// `<filepath> <type> <start_row>,<start_col> <end_row>,<end_col>`
    pub fn context_line(&self) -> String {
        format!(
            "{} {} {},{} {},{}",
            self.filepath, self.kind, self.start_row, self.start_col, self.end_row, self.end_col
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub parent: String,
    pub child: String,
}
