//! Application state shared across commands.
//!
//! The `App` owns the store, the persistence gateway, the remote adapter,
//! the session-scoped last-viewed record, and the pending conflicts of the
//! most recent sync cycle. It is the single writer of the collection:
//! every mutation goes through it, commits with one `replace_all`, and is
//! persisted before the call returns.

use chrono::{DateTime, Utc};
use quotesync_engine::{merge_remote, Conflict, QuoteRecord, ResolutionSession, Store};
use rand::seq::SliceRandom;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::remote::RemoteAdapter;
use crate::storage::{Gateway, SessionStore};

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Result of one completed sync cycle.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Disagreements detected this cycle (server versions already applied)
    pub conflicts: Vec<Conflict>,
    /// Remote records appended as new
    pub added: usize,
    /// Instant the cycle committed
    pub synced_at: DateTime<Utc>,
}

pub struct App {
    pub store: Store,
    pub gateway: Gateway,
    pub remote: RemoteAdapter,
    pub session: SessionStore,
    pub resolution: ResolutionSession,
}

impl App {
    /// Open the application: load (or seed) the persisted collection and
    /// wire up the adapters.
    pub fn open(config: &Config) -> Result<Self> {
        let gateway = Gateway::open(&config.data_dir)?;
        let store = gateway.load_store()?;

        Ok(Self {
            store,
            gateway,
            remote: RemoteAdapter::new(config.server_url.clone()),
            session: SessionStore::new(),
            resolution: ResolutionSession::new(),
        })
    }

    /// Add a quote and persist the collection. The stored record is
    /// returned so the caller can post it to the server.
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<QuoteRecord> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(AppError::InvalidInput(
                "quote text and category must not be empty".to_string(),
            ));
        }

        let record = self.store.add(text, category);
        self.gateway.save_store(&self.store)?;
        Ok(record)
    }

    /// Pick a random quote, honoring and persisting the category filter.
    ///
    /// With no explicit category the last persisted selection applies.
    /// The pick lands in the session store; when the filter matches
    /// nothing, the session store is cleared instead.
    pub fn random_quote(&mut self, category: Option<&str>) -> Result<Option<QuoteRecord>> {
        let selected = match category {
            Some(c) => {
                self.gateway.set_last_category(c)?;
                Some(c.to_string())
            }
            None => self.gateway.last_category(),
        };
        let filter = selected.as_deref().filter(|c| *c != ALL_CATEGORIES);

        let picked = self
            .store
            .filtered(filter)
            .choose(&mut rand::thread_rng())
            .map(|record| (*record).clone());

        match &picked {
            Some(record) => self.session.record_viewed(record),
            None => self.session.clear(),
        }
        Ok(picked)
    }

    /// Run one sync cycle: fetch, merge, commit, persist.
    ///
    /// Returns `None` when the fetch failed - the cycle is skipped
    /// wholesale, nothing is mutated, and the next interval retries.
    /// Conflicts from this cycle replace any still-pending batch.
    pub async fn sync_once(&mut self) -> Result<Option<SyncOutcome>> {
        let snapshot = match self.remote.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("server fetch failed ({err}); skipping this cycle");
                return Ok(None);
            }
        };

        let now = Utc::now();
        let outcome = merge_remote(self.store.records(), &snapshot, now);

        self.store.replace_all(outcome.records);
        self.gateway.save_store(&self.store)?;
        self.gateway.set_last_sync_at(now)?;
        self.resolution.begin(outcome.conflicts.clone());

        Ok(Some(SyncOutcome {
            conflicts: outcome.conflicts,
            added: outcome.added,
            synced_at: now,
        }))
    }

    /// Apply conflict resolutions, keeping the local version for the given
    /// record ids and confirming the server everywhere else, then persist.
    pub fn apply_resolutions(&mut self, keep_local: &[String]) -> Result<usize> {
        let choices = self.resolution.choices_keeping_local(keep_local);

        let mut records = self.store.records().to_vec();
        let applied = self.resolution.resolve(&choices, &mut records, Utc::now());
        self.store.replace_all(records);
        self.gateway.save_store(&self.store)?;

        Ok(applied)
    }

    /// Drop the stored collection and reseed the samples.
    pub fn reset(&mut self) -> Result<()> {
        self.gateway.clear_collection()?;
        self.store = self.gateway.load_store()?;
        self.session.clear();
        Ok(())
    }
}
