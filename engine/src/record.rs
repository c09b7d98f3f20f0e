//! Quote record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RecordId;

/// Prefix of identifiers minted on this device.
pub const LOCAL_ID_PREFIX: &str = "l-";

/// Prefix of identifiers derived from a server-assigned id.
pub const SERVER_ID_PREFIX: &str = "s-";

/// Mint a fresh local-namespace identifier.
///
/// The namespaces are disjoint by prefix so a later merge can always tell
/// where a record was born.
pub fn local_record_id() -> RecordId {
    format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4())
}

/// Derive a server-namespace identifier from a foreign id.
pub fn server_record_id(foreign: impl std::fmt::Display) -> RecordId {
    format!("{SERVER_ID_PREFIX}{foreign}")
}

/// A quote in the collection.
///
/// Legacy records (seeded samples, imported items) carry neither an
/// identifier nor a timestamp; both fields stay absent on the wire so old
/// payloads round-trip untouched. Identifier-less records can only be
/// matched by content, never by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Stable identifier, unique within the collection when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Display text, non-empty after validation
    pub text: String,
    /// Classification label, non-empty after validation
    pub category: String,
    /// Instant of the last local mutation; record-keeping only, never used
    /// for conflict tie-breaking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    /// Create a record with an identifier and update instant.
    pub fn new(
        id: impl Into<RecordId>,
        text: impl Into<String>,
        category: impl Into<String>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
            category: category.into(),
            updated_at: Some(updated_at),
        }
    }

    /// Create an identity-less record (import and seed path).
    pub fn bare(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            category: category.into(),
            updated_at: None,
        }
    }

    /// True when `other` shows the same text and category.
    pub fn same_content(&self, other: &QuoteRecord) -> bool {
        self.text == other.text && self.category == other.category
    }

    /// Key used by the content-addressed import dedup.
    pub fn content_key(&self) -> (String, String) {
        (self.text.clone(), self.category.clone())
    }

    /// Copy of this record stamped with a new update instant.
    pub fn stamped(&self, now: DateTime<Utc>) -> QuoteRecord {
        QuoteRecord {
            updated_at: Some(now),
            ..self.clone()
        }
    }

    /// True when this record was minted on this device.
    pub fn is_local(&self) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| id.starts_with(LOCAL_ID_PREFIX))
    }
}
