//! Store - the canonical in-memory quote collection.
//!
//! The store owns the authoritative, insertion-ordered collection for the
//! running session. Mutation goes through `add`, `import_merge`, and
//! `replace_all`; the latter is the commit path for merge results, so a
//! reader only ever sees a fully committed collection, never a partially
//! merged one. Persisting the collection is the caller's job.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;

use crate::record::local_record_id;
use crate::{Error, QuoteRecord, Result};

/// Sample quotes seeded when no stored collection is usable.
pub const SAMPLE_QUOTES: &[(&str, &str)] = &[
    (
        "The best way to get started is to quit talking and begin doing.",
        "Motivation",
    ),
    (
        "In the middle of every difficulty lies opportunity.",
        "Inspiration",
    ),
    (
        "Life is what happens when you're busy making other plans.",
        "Life",
    ),
];

/// Counts reported by the import path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Items that passed validation
    pub valid: usize,
    /// Items actually appended (duplicates skipped)
    pub added: usize,
}

/// The canonical ordered quote collection.
///
/// Identifiers the store assigns itself are unique; identifiers arriving
/// through `replace_all` are trusted to be (the merge engine preserves
/// uniqueness), and import never matches by identifier at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    records: Vec<QuoteRecord>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an existing collection.
    pub fn with_records(records: Vec<QuoteRecord>) -> Self {
        Self { records }
    }

    /// Create a store pre-populated with the sample quotes.
    pub fn seeded() -> Self {
        Self::with_records(
            SAMPLE_QUOTES
                .iter()
                .map(|(text, category)| QuoteRecord::bare(*text, *category))
                .collect(),
        )
    }

    /// Current collection snapshot.
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Number of records in the collection.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the collection holds nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &str) -> Option<&QuoteRecord> {
        self.records
            .iter()
            .find(|q| q.id.as_deref() == Some(id))
    }

    /// Append a record, assigning a fresh local identifier and the current
    /// time. Returns the record as stored.
    pub fn add(&mut self, text: impl Into<String>, category: impl Into<String>) -> QuoteRecord {
        let record = QuoteRecord {
            id: Some(local_record_id()),
            text: text.into(),
            category: category.into(),
            updated_at: Some(Utc::now()),
        };
        self.records.push(record.clone());
        record
    }

    /// Replace the whole collection in one step.
    ///
    /// Used by the merge commit, import/reset, and restore paths; callers
    /// swap in the new collection atomically instead of mutating in place.
    pub fn replace_all(&mut self, records: Vec<QuoteRecord>) {
        self.records = records;
    }

    /// Append validated import records whose `(text, category)` pair is
    /// not already present.
    ///
    /// Import files carry no reliable identifier namespace, so dedup is
    /// content-addressed: exact string equality on both fields.
    pub fn import_merge(&mut self, valid: Vec<QuoteRecord>) -> ImportSummary {
        let mut seen: HashSet<(String, String)> =
            self.records.iter().map(QuoteRecord::content_key).collect();

        let total = valid.len();
        let mut added = 0;
        for record in valid {
            if seen.insert(record.content_key()) {
                self.records.push(record);
                added += 1;
            }
        }

        ImportSummary {
            valid: total,
            added,
        }
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|q| q.category.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Records matching the category filter, in collection order. `None`
    /// means all.
    pub fn filtered(&self, category: Option<&str>) -> Vec<&QuoteRecord> {
        self.records
            .iter()
            .filter(|q| category.map_or(true, |c| q.category == c))
            .collect()
    }

    /// Encode the collection as compact JSON (the persistence format).
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.records).map_err(|e| Error::InvalidCollection(e.to_string()))
    }

    /// Encode the collection as pretty-printed JSON (the export format).
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records)
            .map_err(|e| Error::InvalidCollection(e.to_string()))
    }

    /// Decode a stored collection, keeping only well-formed entries.
    ///
    /// A payload that is not a JSON array is an error so the caller can
    /// fall back to the samples; individual malformed entries are dropped.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| Error::InvalidCollection(e.to_string()))?;

        let serde_json::Value::Array(items) = value else {
            return Err(Error::InvalidCollection(
                "expected a JSON array of quote records".to_string(),
            ));
        };

        let records = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<QuoteRecord>(item).ok())
            .filter(|q| !q.text.is_empty() && !q.category.is_empty())
            .collect();

        Ok(Self::with_records(records))
    }
}
