//! Rebuild the syntax graph for a project

use anyhow::Result;
use astgraph_index::{GraphDbConfig, GraphDbService};
use std::path::Path;
use tracing::info;

use super::common::resolve_project_root;

pub fn index(path: &Path, config: &GraphDbConfig) -> Result<()> {
    let project_root = resolve_project_root(path)?;
    let service = GraphDbService::new(config)?;

    info!("Indexing project: {:?}", project_root);
    info!("Database: {:?}", service.db_path());

    let report = service.index_project(&project_root)?;

    println!(
        "Indexed {} files ({} skipped, {} failed): {} nodes, {} edges in {:.2}s",
        report.files_indexed,
        report.files_skipped,
        report.files_failed,
        report.nodes_inserted,
        report.edges_inserted,
        report.elapsed.as_secs_f64()
    );

    Ok(())
}
