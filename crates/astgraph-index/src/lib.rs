pub mod cache;
pub mod config;
pub mod export;
pub mod indexer;
pub mod schema;
pub mod service;
pub mod store;

pub use cache::clear_cache;
pub use config::{DATA_DIR_ENV, GraphDbConfig};
pub use export::{ExportFormat, ExportOrder};
pub use indexer::{IndexReport, Indexer};
pub use schema::{EdgeRecord, NodeRecord};
pub use service::GraphDbService;
pub use store::{GraphStats, GraphStore, GraphWriter, InsertOutcome};
