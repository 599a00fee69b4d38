//! Item and taxonomy providers backed by files on disk

mod categories;
mod error;
mod io;
mod items;
mod paths;
mod provider;

pub use categories::{load_category_table, CategoryDir};
pub use error::LoadError;
pub use io::{atomic_write, read_jsonl, read_table_text};
pub use items::{load_items, ItemFile};
pub use paths::Paths;
pub use provider::{open_session, ItemProvider, TaxonomyProvider};
