//! Durable persistence for the collection and sync metadata.
//!
//! The gateway is a key-value store over a data directory, one file per
//! key: the JSON-encoded collection, the last-selected category, and the
//! last-successful-sync instant. Writes land in a temp file first and are
//! renamed into place, so a failed write never truncates the previous
//! value. A write failure is surfaced to the caller; the in-memory
//! collection stays correct either way.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quotesync_engine::{QuoteRecord, Store};

use crate::error::Result;

const COLLECTION_KEY: &str = "quotes.json";
const LAST_CATEGORY_KEY: &str = "last_category";
const LAST_SYNC_KEY: &str = "last_sync_at";

/// File-backed key-value gateway.
pub struct Gateway {
    dir: PathBuf,
}

impl Gateway {
    /// Open the gateway, creating the data directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Load the stored collection.
    ///
    /// When nothing is stored, or the stored payload is unusable, the
    /// seeded sample collection takes its place and is persisted
    /// immediately.
    pub fn load_store(&self) -> Result<Store> {
        let Some(raw) = self.read_key(COLLECTION_KEY) else {
            let store = Store::seeded();
            self.save_store(&store)?;
            return Ok(store);
        };

        match Store::from_json(&raw) {
            Ok(store) => Ok(store),
            Err(err) => {
                tracing::warn!("stored collection unusable ({err}); reseeding samples");
                let store = Store::seeded();
                self.save_store(&store)?;
                Ok(store)
            }
        }
    }

    /// Persist the collection.
    pub fn save_store(&self, store: &Store) -> Result<()> {
        self.write_key(COLLECTION_KEY, &store.to_json()?)
    }

    /// Remove the stored collection (reset flow).
    pub fn clear_collection(&self) -> Result<()> {
        let path = self.dir.join(COLLECTION_KEY);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Last category the user filtered by, if any.
    pub fn last_category(&self) -> Option<String> {
        self.read_key(LAST_CATEGORY_KEY)
            .map(|raw| raw.trim().to_string())
            .filter(|category| !category.is_empty())
    }

    /// Remember the category filter for the next session.
    pub fn set_last_category(&self, category: &str) -> Result<()> {
        self.write_key(LAST_CATEGORY_KEY, category)
    }

    /// Instant of the last successful sync, if any.
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.read_key(LAST_SYNC_KEY)?;
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }

    /// Record a successful sync instant.
    pub fn set_last_sync_at(&self, at: DateTime<Utc>) -> Result<()> {
        self.write_key(LAST_SYNC_KEY, &at.to_rfc3339())
    }

    fn read_key(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.dir.join(key)).ok()
    }

    fn write_key(&self, key: &str, payload: &str) -> Result<()> {
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, self.dir.join(key))?;
        Ok(())
    }
}

/// Last-displayed record, scoped to the current process.
///
/// Cleared whenever nothing is displayable, mirroring the durable gateway
/// in interface but never touching disk.
#[derive(Debug, Default)]
pub struct SessionStore {
    last_viewed: Option<QuoteRecord>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_viewed(&mut self, record: &QuoteRecord) {
        self.last_viewed = Some(record.clone());
    }

    pub fn clear(&mut self) {
        self.last_viewed = None;
    }

    pub fn last_viewed(&self) -> Option<&QuoteRecord> {
        self.last_viewed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> (tempfile::TempDir, Gateway) {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::open(dir.path()).unwrap();
        (dir, gateway)
    }

    #[test]
    fn missing_collection_falls_back_to_samples_and_persists() {
        let (_dir, gateway) = gateway();

        let store = gateway.load_store().unwrap();
        assert_eq!(store, Store::seeded());

        // The fallback was written through, so a reload sees the same thing.
        let reloaded = gateway.load_store().unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn collection_roundtrip() {
        let (_dir, gateway) = gateway();

        let mut store = Store::new();
        store.add("Persisted", "Test");
        gateway.save_store(&store).unwrap();

        let reloaded = gateway.load_store().unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn unusable_collection_is_reseeded() {
        let (dir, gateway) = gateway();
        fs::write(dir.path().join(COLLECTION_KEY), "{ definitely not").unwrap();

        let store = gateway.load_store().unwrap();
        assert_eq!(store, Store::seeded());
    }

    #[test]
    fn clear_collection_resets_to_samples() {
        let (_dir, gateway) = gateway();

        let mut store = Store::new();
        store.add("Mine", "Test");
        gateway.save_store(&store).unwrap();

        gateway.clear_collection().unwrap();
        assert_eq!(gateway.load_store().unwrap(), Store::seeded());
    }

    #[test]
    fn last_category_roundtrip() {
        let (_dir, gateway) = gateway();

        assert_eq!(gateway.last_category(), None);
        gateway.set_last_category("Motivation").unwrap();
        assert_eq!(gateway.last_category().as_deref(), Some("Motivation"));
    }

    #[test]
    fn last_sync_roundtrip() {
        let (_dir, gateway) = gateway();

        assert_eq!(gateway.last_sync_at(), None);
        let at = Utc::now();
        gateway.set_last_sync_at(at).unwrap();
        assert_eq!(gateway.last_sync_at(), Some(at));
    }

    #[test]
    fn garbage_sync_timestamp_reads_as_none() {
        let (dir, gateway) = gateway();
        fs::write(dir.path().join(LAST_SYNC_KEY), "yesterday-ish").unwrap();

        assert_eq!(gateway.last_sync_at(), None);
    }

    #[test]
    fn session_store_tracks_last_viewed() {
        let mut session = SessionStore::new();
        assert!(session.last_viewed().is_none());

        let record = QuoteRecord::bare("Hello", "Greeting");
        session.record_viewed(&record);
        assert_eq!(session.last_viewed(), Some(&record));

        session.clear();
        assert!(session.last_viewed().is_none());
    }
}
