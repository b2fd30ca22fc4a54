//! Application layer - use cases and orchestration.
//!
//! This layer contains the main business logic for managing the
//! collection and reconciling it with the remote.

pub mod formatter;
pub mod quote_service;
pub mod sync_service;
pub mod transfer;

pub use formatter::{
    format_bytes, format_quote, format_quotes_json, format_quotes_table, format_quotes_text,
    format_stats, format_sync_outcome, format_sync_state, OutputFormat,
};
pub use quote_service::QuoteService;
pub use sync_service::SyncService;
pub use transfer::{export_quotes, import_quotes, ImportReport};
