pub mod error;
pub mod identity;
pub mod language;

pub use error::ParseError;
pub use identity::{NodeSpan, node_id};
pub use language::{Language, LanguageSupport};
