//! Infrastructure layer - external adapters (database, network, filesystem).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod quote_store;
pub mod remote;
pub mod systemd;

pub use config::{ensure_config_exists, load_config};
pub use quote_store::QuoteStore;
pub use remote::{HttpRemote, RemoteQuoteSource};
pub use systemd::SyncDaemonService;
