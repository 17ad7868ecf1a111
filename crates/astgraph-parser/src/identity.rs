//! Stable identifiers for syntax nodes.
//!
//! A node is identified by the file it came from, its kind and its start
//! position. The end position is not part of the key, so two
//! nodes of the same kind starting at the same point share one id.

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Point};

/// Build the id of a node: `<filepath>@<kind>@<start_row>@<start_col>`.
pub fn node_id(filepath: &str, kind: &str, start: Point) -> String {
    format!("{}@{}@{}@{}", filepath, kind, start.row, start.column)
}

/// Zero-based row/column span of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpan {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl NodeSpan {
    pub fn of(node: &Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_row: start.row,
            start_col: start.column,
            end_row: end.row,
            end_col: end.column,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_row, self.start_col)
    }
}
