pub mod cache_store;
pub mod document;
pub mod output;
pub mod store;

pub use cache_store::*;
pub use document::*;
pub use output::*;
pub use store::*;
