//! Flattening the graph into text for downstream prompts.

use crate::schema::NodeRecord;
use crate::store::GraphStore;
use anyhow::{Context, Result};

/// Row order for exported nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportOrder {
    /// Whatever order the store scans rows in.
    #[default]
    Natural,
    /// By filepath, then start row, then start column.
    Sorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One `<filepath> <type> <sr>,<sc> <er>,<ec>` line per node.
    #[default]
    Text,
    /// A JSON array of node records.
    Json,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Render nodes in the given format.
///
/// Text lines are joined with `\n` and carry no trailing newline.
pub fn render_context(nodes: &[NodeRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Text => Ok(nodes
            .iter()
            .map(NodeRecord::context_line)
            .collect::<Vec<_>>()
            .join("\n")),
        ExportFormat::Json => {
            serde_json::to_string_pretty(nodes).context("Failed to serialize nodes")
        }
    }
}

impl GraphStore {
    pub fn export_context(&self, order: ExportOrder, format: ExportFormat) -> Result<String> {
        let nodes = self.all_nodes(order)?;
        render_context(&nodes, format)
    }
}
