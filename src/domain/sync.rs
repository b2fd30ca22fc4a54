//! Sync-related domain models and configuration.
//!
//! Contains types for managing reconciliation state, remote endpoint
//! configuration, and the outcome of a sync cycle.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the sync reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Interval between sync cycles in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Whether periodic sync is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            enabled: default_enabled(),
        }
    }
}

const fn default_interval() -> u64 {
    10
}

const fn default_enabled() -> bool {
    true
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// URL fetched for the remote snapshot.
    #[serde(default = "default_read_url")]
    pub read_url: String,

    /// URL the collection is pushed to after a replace.
    #[serde(default = "default_write_url")]
    pub write_url: String,

    /// Maximum number of remote records consumed per cycle.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Category assigned to quotes mapped from remote records.
    #[serde(default = "default_category_label")]
    pub category_label: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            read_url: default_read_url(),
            write_url: default_write_url(),
            fetch_limit: default_fetch_limit(),
            category_label: default_category_label(),
        }
    }
}

fn default_read_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".into()
}

fn default_write_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".into()
}

const fn default_fetch_limit() -> usize {
    3
}

fn default_category_label() -> String {
    "Server".into()
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Sync reconciler configuration.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Remote endpoint configuration.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quote-keeper")
    }

    /// Get the store database path.
    #[must_use]
    pub fn store_db_path(&self) -> PathBuf {
        self.data_dir().join("store.db")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir().join("config.toml")
    }
}

/// Current state of synchronization, persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncState {
    /// Last successful sync timestamp.
    pub last_sync: Option<DateTime<Utc>>,

    /// Number of quotes in the collection after the last sync.
    pub quote_count: usize,

    /// Whether a sync is currently in progress.
    pub is_syncing: bool,

    /// When the in-progress sync started, for staleness detection.
    pub sync_started: Option<DateTime<Utc>>,

    /// Last error message if any.
    pub last_error: Option<String>,
}

impl SyncState {
    /// Create a new sync state with current timestamp.
    #[must_use]
    pub fn with_sync_time(mut self) -> Self {
        self.last_sync = Some(Utc::now());
        self
    }

    /// Mark sync as in progress.
    #[must_use]
    pub fn syncing(mut self) -> Self {
        self.is_syncing = true;
        self.sync_started = Some(Utc::now());
        self
    }

    /// Mark sync as completed.
    #[must_use]
    pub const fn completed(mut self) -> Self {
        self.is_syncing = false;
        self.sync_started = None;
        self
    }

    /// Whether the in-progress marker is older than the given window.
    ///
    /// A marker left behind by a crashed cycle must not wedge the
    /// reconciler forever.
    #[must_use]
    pub fn guard_is_stale(&self, window_secs: u64) -> bool {
        self.sync_started.map_or(true, |started| {
            let age = Utc::now() - started;
            age.num_seconds() >= 0 && age.num_seconds() as u64 > window_secs
        })
    }

    /// Set error state.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.last_error = Some(error.into());
        self.is_syncing = false;
        self.sync_started = None;
        self
    }

    /// Clear error state.
    #[must_use]
    pub fn clear_error(mut self) -> Self {
        self.last_error = None;
        self
    }
}

/// Outcome of a single reconciliation cycle.
///
/// Fetch and push failures are outcomes, not errors: the reconciler
/// reports them locally and the cycle always completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote returned data; the local collection was replaced.
    Replaced {
        /// Number of quotes fetched and applied.
        fetched: usize,
        /// Error from the best-effort push, if it failed.
        push_error: Option<String>,
    },

    /// Remote returned an empty set; local collection untouched.
    NoData,

    /// Fetch failed; local collection untouched.
    FetchFailed {
        /// Description of the failure.
        message: String,
    },

    /// Another cycle is already in progress; nothing was done.
    Skipped,
}

impl SyncOutcome {
    /// Whether this cycle replaced the local collection.
    #[must_use]
    pub const fn replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }

    /// Error message carried by this outcome, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Replaced { push_error, .. } => push_error.as_deref(),
            Self::FetchFailed { message } => Some(message),
            Self::NoData | Self::Skipped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sync.interval_secs, 10);
        assert!(config.sync.enabled);
        assert_eq!(config.remote.fetch_limit, 3);
        assert_eq!(config.remote.category_label, "Server");
    }

    #[test]
    fn test_sync_state_transitions() {
        let state = SyncState::default().syncing().with_sync_time().completed();

        assert!(!state.is_syncing);
        assert!(state.last_sync.is_some());
    }

    #[test]
    fn test_guard_staleness() {
        let fresh = SyncState::default().syncing();
        assert!(!fresh.guard_is_stale(60));

        // A marker without a start time is always stale.
        let mut bare = SyncState::default();
        bare.is_syncing = true;
        assert!(bare.guard_is_stale(60));
    }

    #[test]
    fn test_error_state_clears_syncing() {
        let state = SyncState::default().syncing().with_error("boom");
        assert!(!state.is_syncing);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_outcome_error_message() {
        assert!(SyncOutcome::NoData.error_message().is_none());
        let outcome = SyncOutcome::FetchFailed {
            message: "timeout".into(),
        };
        assert_eq!(outcome.error_message(), Some("timeout"));
        assert!(!outcome.replaced());
    }
}
