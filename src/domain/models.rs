//! Domain models for the quote collection.

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// A single quote in the collection.
///
/// Quotes carry no identifier and no uniqueness constraint; duplicates
/// are permitted and insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote text.
    pub text: String,
    /// Category label the quote is filed under.
    pub category: String,
}

impl Quote {
    /// Create a quote from already-validated parts.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Validate raw user input and build a quote from it.
    ///
    /// Both fields are trimmed; an empty or whitespace-only value in
    /// either field is a validation error.
    ///
    /// # Errors
    /// Returns `AppError::Validation` when text or category is empty.
    pub fn parse(text: &str, category: &str) -> Result<Self> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(AppError::validation("quote text must not be empty"));
        }
        if category.is_empty() {
            return Err(AppError::validation("quote category must not be empty"));
        }

        Ok(Self::new(text, category))
    }
}

/// The fixed collection used when no valid persisted state exists.
#[must_use]
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Learning is the road to success", "Education"),
        Quote::new(
            "Code is like humor. When you have to explain it, it is bad",
            "Programming",
        ),
        Quote::new("Success is not final, failure is not fatal", "Motivation"),
    ]
}

/// Distinct categories in first-appearance order.
#[must_use]
pub fn distinct_categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| c == &quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// Summary statistics for the stored collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStats {
    /// Number of quotes in the collection.
    pub quote_count: usize,
    /// Number of distinct categories.
    pub category_count: usize,
}

impl CollectionStats {
    /// Compute statistics over a collection.
    #[must_use]
    pub fn for_quotes(quotes: &[Quote]) -> Self {
        Self {
            quote_count: quotes.len(),
            category_count: distinct_categories(quotes).len(),
        }
    }
}
