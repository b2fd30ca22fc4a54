//! JSON export and import of the quote collection.
//!
//! Export emits the full collection; import appends (does not
//! replace) the file's quotes to the existing collection.

use std::fs;
use std::path::Path;

use crate::domain::{AppError, Quote, Result};
use crate::infrastructure::QuoteStore;

/// Result of an import operation.
#[derive(Debug, Clone, Copy)]
pub struct ImportReport {
    /// Number of quotes read from the file.
    pub imported: usize,
    /// Collection size after the append.
    pub total: usize,
}

/// Serialize the full collection as pretty-printed JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn export_quotes(store: &QuoteStore) -> Result<String> {
    let quotes = store.load_quotes();
    serde_json::to_string_pretty(&quotes).map_err(AppError::json_parse)
}

/// Append the quotes in a JSON file to the collection and persist it.
///
/// The file must contain a JSON array of `{text, category}` objects;
/// a file that does not decode leaves the collection unchanged.
///
/// # Errors
/// Returns error if the file cannot be read or does not decode.
pub fn import_quotes(store: &QuoteStore, path: &Path) -> Result<ImportReport> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;

    let imported: Vec<Quote> = serde_json::from_str(&content).map_err(AppError::json_parse)?;

    let mut quotes = store.load_quotes();
    quotes.extend(imported.iter().cloned());
    store.save_quotes(&quotes)?;

    tracing::info!(imported = imported.len(), total = quotes.len(), "Import finished");

    Ok(ImportReport {
        imported: imported.len(),
        total: quotes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &tempfile::TempDir) -> QuoteStore {
        QuoteStore::open(&dir.path().join("test.db")).unwrap()
    }

    #[test]
    fn test_export_then_import_doubles_collection() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let original = store.load_quotes();

        let exported = export_quotes(&store).unwrap();
        let file = dir.path().join("quotes.json");
        fs::write(&file, exported).unwrap();

        let report = import_quotes(&store, &file).unwrap();
        assert_eq!(report.imported, original.len());
        assert_eq!(report.total, original.len() * 2);

        // Every original quote now appears at least twice
        let after = store.load_quotes();
        for quote in &original {
            let count = after.iter().filter(|q| *q == quote).count();
            assert!(count >= 2);
        }
    }

    #[test]
    fn test_import_invalid_json_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        let before = store.load_quotes();

        let file = dir.path().join("bad.json");
        fs::write(&file, "not json").unwrap();

        assert!(import_quotes(&store, &file).is_err());
        assert_eq!(store.load_quotes(), before);
    }

    #[test]
    fn test_import_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let result = import_quotes(&store, &dir.path().join("absent.json"));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
