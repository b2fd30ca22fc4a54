//! Quote collection use cases.
//!
//! All mutation of the collection is routed through the store; the
//! service owns the store handle and is injected into the CLI
//! handlers.

use rand::seq::SliceRandom;

use crate::domain::{distinct_categories, CollectionStats, Quote, Result};
use crate::infrastructure::QuoteStore;

/// Service for reading and mutating the quote collection.
pub struct QuoteService {
    store: QuoteStore,
}

impl QuoteService {
    /// Create a new service around an open store.
    #[must_use]
    pub const fn new(store: QuoteStore) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    #[must_use]
    pub const fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Validate and append a quote, then persist the collection.
    ///
    /// # Errors
    /// Returns `AppError::Validation` for empty text or category; the
    /// collection is left unchanged in that case.
    pub fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::parse(text, category)?;

        let mut quotes = self.store.load_quotes();
        quotes.push(quote.clone());
        self.store.save_quotes(&quotes)?;

        tracing::debug!(category = %quote.category, "Quote added");

        Ok(quote)
    }

    /// Resolve the effective category filter for a command.
    ///
    /// An explicit category becomes the persisted selection; `--all`
    /// clears it; otherwise the persisted selection applies.
    ///
    /// # Errors
    /// Returns error if the selection cannot be read or written.
    pub fn resolve_filter(&self, category: Option<&str>, all: bool) -> Result<Option<String>> {
        if all {
            self.store.clear_selected_category()?;
            return Ok(None);
        }

        if let Some(category) = category {
            self.store.set_selected_category(category)?;
            return Ok(Some(category.to_string()));
        }

        self.store.selected_category()
    }

    /// Quotes matching the given category filter (all when `None`).
    #[must_use]
    pub fn filtered_quotes(&self, filter: Option<&str>) -> Vec<Quote> {
        let quotes = self.store.load_quotes();
        match filter {
            Some(category) => quotes
                .into_iter()
                .filter(|q| q.category == category)
                .collect(),
            None => quotes,
        }
    }

    /// Pick one random quote from the filtered collection.
    #[must_use]
    pub fn random_quote(&self, filter: Option<&str>) -> Option<Quote> {
        self.filtered_quotes(filter)
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    /// Distinct categories in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.store.load_quotes())
    }

    /// Statistics over the stored collection.
    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        CollectionStats::for_quotes(&self.store.load_quotes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_quotes;
    use tempfile::tempdir;

    fn service(dir: &tempfile::TempDir) -> QuoteService {
        QuoteService::new(QuoteStore::open(&dir.path().join("test.db")).unwrap())
    }

    #[test]
    fn test_adds_extend_persisted_collection() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        let seed_len = seed_quotes().len();

        service.add_quote("one", "Test").unwrap();
        service.add_quote("two", "Test").unwrap();

        assert_eq!(service.store().load_quotes().len(), seed_len + 2);
    }

    #[test]
    fn test_invalid_add_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        let before = service.store().load_quotes();

        assert!(service.add_quote("", "Test").is_err());
        assert!(service.add_quote("text", "   ").is_err());

        assert_eq!(service.store().load_quotes(), before);
    }

    #[test]
    fn test_duplicates_are_permitted() {
        let dir = tempdir().unwrap();
        let service = service(&dir);

        service.add_quote("same", "Test").unwrap();
        service.add_quote("same", "Test").unwrap();

        let matching = service
            .store()
            .load_quotes()
            .into_iter()
            .filter(|q| q.text == "same")
            .count();
        assert_eq!(matching, 2);
    }

    #[test]
    fn test_filtered_quotes() {
        let dir = tempdir().unwrap();
        let service = service(&dir);

        let education = service.filtered_quotes(Some("Education"));
        assert_eq!(education.len(), 1);

        let all = service.filtered_quotes(None);
        assert_eq!(all.len(), 3);

        assert!(service.filtered_quotes(Some("Nope")).is_empty());
    }

    #[test]
    fn test_random_quote_respects_filter() {
        let dir = tempdir().unwrap();
        let service = service(&dir);

        let quote = service.random_quote(Some("Education")).unwrap();
        assert_eq!(quote.category, "Education");

        assert!(service.random_quote(Some("Nope")).is_none());
    }

    #[test]
    fn test_filter_resolution_persists_selection() {
        let dir = tempdir().unwrap();
        let service = service(&dir);

        // Explicit category persists
        let filter = service.resolve_filter(Some("Motivation"), false).unwrap();
        assert_eq!(filter.as_deref(), Some("Motivation"));

        // No argument reuses the persisted selection
        let filter = service.resolve_filter(None, false).unwrap();
        assert_eq!(filter.as_deref(), Some("Motivation"));

        // --all clears it
        assert_eq!(service.resolve_filter(None, true).unwrap(), None);
        assert_eq!(service.resolve_filter(None, false).unwrap(), None);
    }
}
