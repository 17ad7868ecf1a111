//! Export indexed nodes as flat context

use anyhow::{Context, Result};
use astgraph_index::{ExportFormat, ExportOrder, GraphDbConfig, GraphDbService};
use std::path::Path;
use tracing::info;

pub fn export(
    config: &GraphDbConfig,
    sorted: bool,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let service = GraphDbService::new(config)?;
    let order = if sorted {
        ExportOrder::Sorted
    } else {
        ExportOrder::Natural
    };

    let context = service.export_context_with(order, format);

    match output {
        Some(path) => {
            std::fs::write(path, &context)
                .with_context(|| format!("Failed to write context to {:?}", path))?;
            info!("Wrote {} lines to {:?}", context.lines().count(), path);
        }
        None if !context.is_empty() => println!("{}", context),
        None => {}
    }

    Ok(())
}
