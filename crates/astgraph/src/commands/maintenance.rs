//! Cache clearing and statistics

use anyhow::Result;
use astgraph_index::{GraphDbConfig, GraphDbService};

pub fn clear_cache(config: &GraphDbConfig) -> Result<()> {
    let service = GraphDbService::new(config)?;
    service.clear_cache();
    Ok(())
}

pub fn stats(config: &GraphDbConfig) -> Result<()> {
    let service = GraphDbService::new(config)?;

    let Some(stats) = service.stats()? else {
        println!(
            "No graph database at {:?}. Run 'astgraph index' first.",
            service.db_path()
        );
        return Ok(());
    };

    println!("astgraph Statistics");
    println!("===================");
    println!("Database: {:?}", service.db_path());
    println!();
    println!("  Files: {}", stats.file_count);
    println!("  Nodes: {}", stats.node_count);
    println!("  Edges: {}", stats.edge_count);

    Ok(())
}
