//! HTTP access to the remote quote endpoints.
//!
//! The read endpoint returns a JSON array of records carrying at least
//! a `title` field; only the title survives the mapping into a quote.
//! The write endpoint receives the full collection and its response is
//! logged, not validated.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{AppError, Quote, RemoteConfig, Result};

const CONNECT_TIMEOUT_SECS: u64 = 5;
const READ_TIMEOUT_SECS: u64 = 15;

/// Source of remote snapshots and target of best-effort pushes.
///
/// The reconciler depends on this trait so tests can substitute an
/// in-memory remote.
pub trait RemoteQuoteSource {
    /// Fetch a bounded snapshot of quotes from the read endpoint.
    ///
    /// # Errors
    /// Returns error on network failure, non-2xx status, or a body
    /// that does not decode.
    fn fetch_quotes(&self) -> Result<Vec<Quote>>;

    /// Push the full collection to the write endpoint.
    ///
    /// # Errors
    /// Returns error on network failure or non-2xx status.
    fn push_quotes(&self, quotes: &[Quote]) -> Result<()>;
}

/// A record returned by the read endpoint.
#[derive(Debug, Deserialize)]
struct RemoteRecord {
    #[serde(default)]
    title: String,
}

/// Remote quote endpoints over HTTP.
pub struct HttpRemote {
    client: reqwest::blocking::Client,
    config: RemoteConfig,
}

impl HttpRemote {
    /// Create a client with standard timeouts.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::remote("Failed to build HTTP client", e))?;

        Ok(Self { client, config })
    }
}

impl RemoteQuoteSource for HttpRemote {
    fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let records: Vec<RemoteRecord> = self
            .client
            .get(&self.config.read_url)
            .query(&[("_limit", self.config.fetch_limit.to_string())])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| AppError::remote("Failed to fetch remote snapshot", e))?
            .json()
            .map_err(|e| AppError::remote("Remote snapshot was not valid JSON", e))?;

        // The endpoint honors _limit; truncate anyway in case it does not.
        Ok(records
            .into_iter()
            .take(self.config.fetch_limit)
            .map(|r| Quote::new(r.title, self.config.category_label.clone()))
            .collect())
    }

    fn push_quotes(&self, quotes: &[Quote]) -> Result<()> {
        let response = self
            .client
            .post(&self.config.write_url)
            .json(quotes)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| AppError::remote("Failed to push collection", e))?;

        match response.text() {
            Ok(body) => tracing::debug!(%body, "Write endpoint acknowledged push"),
            Err(e) => tracing::debug!(error = %e, "Push response body was unreadable"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let remote = HttpRemote::new(RemoteConfig::default());
        assert!(remote.is_ok());
    }

    #[test]
    fn test_record_decodes_extra_fields() {
        let raw = r#"{"userId": 1, "id": 2, "title": "hello", "body": "ignored"}"#;
        let record: RemoteRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.title, "hello");
    }

    #[test]
    fn test_record_missing_title_defaults_empty() {
        let record: RemoteRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.title, "");
    }
}
