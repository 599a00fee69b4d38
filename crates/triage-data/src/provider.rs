//! Provider seams consumed when opening a session

use triage_core::{DialogueItem, Session, Taxonomy};

use crate::error::LoadError;

/// Source of the ordered dialogue list
pub trait ItemProvider {
    fn list_items(&self) -> Result<Vec<DialogueItem>, LoadError>;
}

/// Source of the bracket -> major -> sub taxonomy
pub trait TaxonomyProvider {
    /// `Ok(None)` when no taxonomy is available; sessions then fall back
    /// to each item's own option lists
    fn lookup_categories(&self) -> Result<Option<Taxonomy>, LoadError>;
}

impl ItemProvider for Vec<DialogueItem> {
    fn list_items(&self) -> Result<Vec<DialogueItem>, LoadError> {
        Ok(self.clone())
    }
}

impl TaxonomyProvider for Option<Taxonomy> {
    fn lookup_categories(&self) -> Result<Option<Taxonomy>, LoadError> {
        Ok(self.clone())
    }
}

/// Build a not-yet-started session from both providers
pub fn open_session(
    items: &dyn ItemProvider,
    taxonomy: &dyn TaxonomyProvider,
) -> Result<Session, LoadError> {
    let items = items.list_items()?;
    let taxonomy = taxonomy.lookup_categories()?;
    Ok(Session::new(items, taxonomy))
}
