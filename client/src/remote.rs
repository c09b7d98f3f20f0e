//! Remote adapter - the only component that sees the wire format.
//!
//! The read endpoint returns a JSON array whose items may be in either the
//! native quote shape or a foreign post shape; normalization happens here,
//! so the merge engine only ever receives canonical records.

use chrono::Utc;
use quotesync_engine::{normalize_remote, QuoteRecord};

use crate::error::Result;

/// HTTP client for the remote data source.
pub struct RemoteAdapter {
    client: reqwest::Client,
    url: String,
}

impl RemoteAdapter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch and normalize the remote snapshot.
    ///
    /// A non-success status or an unreadable body is a transport error;
    /// the caller skips the sync cycle and retries at the next interval.
    pub async fn fetch_snapshot(&self) -> Result<Vec<QuoteRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        let items: Vec<serde_json::Value> = response.json().await?;
        Ok(normalize_remote(items, Utc::now()))
    }

    /// Post a locally-created record to the write endpoint.
    ///
    /// Fire-and-forget: failures are logged, never propagated, and never
    /// block local state.
    pub async fn post_record(&self, record: &QuoteRecord) {
        match self.client.post(&self.url).json(record).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(id = ?record.id, "posted quote to server");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "server rejected posted quote");
            }
            Err(err) => {
                tracing::warn!("failed to post quote to server: {err}");
            }
        }
    }
}
