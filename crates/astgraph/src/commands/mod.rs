//! CLI command implementations for astgraph

pub mod common;
mod export;
mod index;
mod maintenance;

pub use export::export;
pub use index::index;
pub use maintenance::{clear_cache, stats};
