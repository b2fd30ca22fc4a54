//! Domain layer - core business logic and types.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (DB, IO, etc.).

pub mod error;
pub mod models;
pub mod sync;

pub use error::{AppError, Result};
pub use models::{distinct_categories, seed_quotes, CollectionStats, Quote};
pub use sync::{AppConfig, PathConfig, RemoteConfig, SyncConfig, SyncOutcome, SyncState};
