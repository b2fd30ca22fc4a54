//! Sync reconciliation service.
//!
//! Periodically replaces the local collection with a remote snapshot
//! and best-effort echoes the result back. Remote always wins: there
//! is no merge, no conflict detection, no timestamp comparison.

use std::time::{Duration, Instant};

use crate::domain::{AppConfig, Result, SyncOutcome};
use crate::infrastructure::{QuoteStore, RemoteQuoteSource};

/// Floor for the staleness window on the in-progress guard; a cycle is
/// bounded by the HTTP timeouts, so a younger marker is a live cycle.
const MIN_GUARD_WINDOW_SECS: u64 = 60;

/// Service for reconciling the local collection with the remote.
pub struct SyncService<R> {
    config: AppConfig,
    store: QuoteStore,
    remote: R,
}

impl<R: RemoteQuoteSource> SyncService<R> {
    /// Create a new sync service.
    #[must_use]
    pub const fn new(config: AppConfig, store: QuoteStore, remote: R) -> Self {
        Self {
            config,
            store,
            remote,
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// Fetch and push failures never escape as errors: they become
    /// outcomes, the collection is left untouched on the failure
    /// paths, and the cycle always returns to idle.
    ///
    /// # Errors
    /// Returns error only when the local store itself fails.
    pub fn sync(&self) -> Result<SyncOutcome> {
        let state = self.store.get_sync_state()?;
        if state.is_syncing && !state.guard_is_stale(self.guard_window_secs()) {
            tracing::warn!("Previous sync cycle still in progress, skipping");
            return Ok(SyncOutcome::Skipped);
        }

        self.store.update_sync_state(&state.syncing())?;

        let result = self.run_cycle();

        // The guard must drop whatever the cycle did.
        let mut done = self.store.get_sync_state()?.completed();
        done.quote_count = self.store.load_quotes().len();
        match &result {
            Ok(outcome) => {
                if outcome.replaced() {
                    done = done.with_sync_time();
                }
                done = match outcome.error_message() {
                    Some(msg) => done.with_error(msg),
                    None => done.clear_error(),
                };
            }
            Err(e) => done = done.with_error(e.to_string()),
        }
        self.store.update_sync_state(&done)?;

        result
    }

    fn run_cycle(&self) -> Result<SyncOutcome> {
        tracing::info!("Starting sync cycle");
        let start = Instant::now();

        let fetched = match self.remote.fetch_quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, collection left untouched");
                return Ok(SyncOutcome::FetchFailed {
                    message: e.to_string(),
                });
            }
        };

        if fetched.is_empty() {
            tracing::info!("No server data available");
            return Ok(SyncOutcome::NoData);
        }

        // Remote always wins: the fetched set replaces the collection
        // wholesale before the echo back is attempted.
        self.store.save_quotes(&fetched)?;

        let push_error = match self.remote.push_quotes(&fetched) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Push failed after replace, not retried");
                Some(e.to_string())
            }
        };

        tracing::info!(
            fetched = fetched.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Sync cycle completed"
        );

        Ok(SyncOutcome::Replaced {
            fetched: fetched.len(),
            push_error,
        })
    }

    /// Run reconciliation cycles forever at the given interval.
    ///
    /// The loop is strictly sequential: the next cycle is scheduled
    /// only after the previous one finished, so cycles cannot overlap
    /// within one process. A cycle failure is logged and the loop
    /// keeps going.
    pub fn run_forever(&self, interval: Duration) -> ! {
        tracing::info!(interval_secs = interval.as_secs(), "Sync daemon started");

        loop {
            match self.sync() {
                Ok(outcome) => {
                    tracing::debug!(?outcome, "Cycle finished");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sync cycle failed");
                }
            }

            std::thread::sleep(interval);
        }
    }

    fn guard_window_secs(&self) -> u64 {
        self.config.sync.interval_secs.max(MIN_GUARD_WINDOW_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppError, Quote};
    use std::cell::RefCell;
    use tempfile::tempdir;

    struct FakeRemote {
        quotes: Vec<Quote>,
        fail_fetch: bool,
        fail_push: bool,
        pushed: RefCell<Vec<Vec<Quote>>>,
    }

    impl FakeRemote {
        fn returning(quotes: Vec<Quote>) -> Self {
            Self {
                quotes,
                fail_fetch: false,
                fail_push: false,
                pushed: RefCell::new(Vec::new()),
            }
        }
    }

    impl RemoteQuoteSource for FakeRemote {
        fn fetch_quotes(&self) -> Result<Vec<Quote>> {
            if self.fail_fetch {
                return Err(AppError::Config {
                    message: "read endpoint down".into(),
                });
            }
            Ok(self.quotes.clone())
        }

        fn push_quotes(&self, quotes: &[Quote]) -> Result<()> {
            if self.fail_push {
                return Err(AppError::Config {
                    message: "write endpoint down".into(),
                });
            }
            self.pushed.borrow_mut().push(quotes.to_vec());
            Ok(())
        }
    }

    fn service_with(
        dir: &tempfile::TempDir,
        remote: FakeRemote,
    ) -> SyncService<FakeRemote> {
        let store = QuoteStore::open(&dir.path().join("test.db")).unwrap();
        SyncService::new(AppConfig::default(), store, remote)
    }

    fn local_quotes() -> Vec<Quote> {
        vec![
            Quote::new("local one", "Local"),
            Quote::new("local two", "Local"),
        ]
    }

    #[test]
    fn test_empty_remote_leaves_collection_untouched() {
        let dir = tempdir().unwrap();
        let service = service_with(&dir, FakeRemote::returning(Vec::new()));
        service.store.save_quotes(&local_quotes()).unwrap();

        let outcome = service.sync().unwrap();

        assert_eq!(outcome, SyncOutcome::NoData);
        assert_eq!(service.store.load_quotes(), local_quotes());
        assert!(!service.store.get_sync_state().unwrap().is_syncing);
    }

    #[test]
    fn test_nonempty_remote_replaces_collection_exactly() {
        let dir = tempdir().unwrap();
        let server = vec![
            Quote::new("server one", "Server"),
            Quote::new("server two", "Server"),
            Quote::new("server three", "Server"),
        ];
        let service = service_with(&dir, FakeRemote::returning(server.clone()));
        service.store.save_quotes(&local_quotes()).unwrap();

        let outcome = service.sync().unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Replaced {
                fetched: 3,
                push_error: None
            }
        );
        // No remnants of the prior local-only quotes
        assert_eq!(service.store.load_quotes(), server);

        let state = service.store.get_sync_state().unwrap();
        assert!(state.last_sync.is_some());
        assert_eq!(state.quote_count, 3);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_replaced_collection_is_pushed_back() {
        let dir = tempdir().unwrap();
        let server = vec![Quote::new("server one", "Server")];
        let service = service_with(&dir, FakeRemote::returning(server.clone()));

        service.sync().unwrap();

        let pushed = service.remote.pushed.borrow();
        assert_eq!(pushed.as_slice(), &[server]);
    }

    #[test]
    fn test_fetch_failure_reports_and_leaves_state() {
        let dir = tempdir().unwrap();
        let mut remote = FakeRemote::returning(Vec::new());
        remote.fail_fetch = true;
        let service = service_with(&dir, remote);
        service.store.save_quotes(&local_quotes()).unwrap();

        let outcome = service.sync().unwrap();

        assert!(matches!(outcome, SyncOutcome::FetchFailed { .. }));
        assert_eq!(service.store.load_quotes(), local_quotes());

        let state = service.store.get_sync_state().unwrap();
        assert!(state.last_error.is_some());
        assert!(state.last_sync.is_none());
    }

    #[test]
    fn test_push_failure_does_not_roll_back_replace() {
        let dir = tempdir().unwrap();
        let server = vec![Quote::new("server one", "Server")];
        let mut remote = FakeRemote::returning(server.clone());
        remote.fail_push = true;
        let service = service_with(&dir, remote);
        service.store.save_quotes(&local_quotes()).unwrap();

        let outcome = service.sync().unwrap();

        match outcome {
            SyncOutcome::Replaced {
                fetched,
                push_error,
            } => {
                assert_eq!(fetched, 1);
                assert!(push_error.is_some());
            }
            other => panic!("expected Replaced, got {other:?}"),
        }
        assert_eq!(service.store.load_quotes(), server);
    }

    #[test]
    fn test_in_progress_guard_skips_cycle() {
        let dir = tempdir().unwrap();
        let service = service_with(&dir, FakeRemote::returning(local_quotes()));

        let state = service.store.get_sync_state().unwrap().syncing();
        service.store.update_sync_state(&state).unwrap();

        assert_eq!(service.sync().unwrap(), SyncOutcome::Skipped);
        // The guarded cycle did not touch the collection
        assert_eq!(service.store.load_quotes().len(), 3);
    }

    #[test]
    fn test_stale_guard_does_not_wedge_reconciler() {
        let dir = tempdir().unwrap();
        let service = service_with(&dir, FakeRemote::returning(local_quotes()));

        // is_syncing with no start time reads as a crashed cycle
        let mut state = service.store.get_sync_state().unwrap();
        state.is_syncing = true;
        service.store.update_sync_state(&state).unwrap();

        assert!(service.sync().unwrap().replaced());
    }
}
