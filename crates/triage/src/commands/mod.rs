pub mod annotate;
pub mod categories;
pub mod items;
pub mod summary;
pub mod version;
