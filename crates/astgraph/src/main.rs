mod commands;

use anyhow::Result;
use astgraph_index::{DATA_DIR_ENV, ExportFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astgraph")]
#[command(author, version, about = "Index syntax trees into SQLite and export them as context")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base data directory (the database lives in <DATA_DIR>/sqlite/graphdb.sqlite)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the syntax graph for a project directory
    Index {
        /// Path to the project to index
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Print every indexed node as one context line
    Export {
        /// Order by file and position instead of store order
        #[arg(short, long)]
        sorted: bool,

        /// Output format: text or json
        #[arg(short, long, default_value_t = ExportFormat::Text)]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the graph database
    ClearCache,

    /// Show graph statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::common::resolve_config(cli.data_dir);

    match cli.command {
        Commands::Index { path } => commands::index(&path, &config),
        Commands::Export {
            sorted,
            format,
            output,
        } => commands::export(&config, sorted, format, output.as_deref()),
        Commands::ClearCache => commands::clear_cache(&config),
        Commands::Stats => commands::stats(&config),
    }
}
