//! Validation and normalization of externally-sourced payloads.
//!
//! Two kinds of data cross this boundary: snapshot items fetched from the
//! remote source and user-supplied import files. Remote items arrive in
//! one of two shapes and are bridged into [`QuoteRecord`]s here, so the
//! merge engine never sees server-specific shapes. Import items are
//! accepted only when they carry non-empty string `text` and `category`.
//!
//! Normalization never fails on malformed input: items matching neither
//! shape are dropped silently, and an unusable import is signaled through
//! [`Error`] before anything is committed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::record::{local_record_id, server_record_id};
use crate::{Error, QuoteRecord, RecordId, Result};

/// An identifier as it appears on the wire: native items may use strings,
/// foreign items use numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Text(s) => write!(f, "{s}"),
            RawId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A remote payload item, decoded shape-first.
///
/// Decode order matters: the native shape is attempted before the foreign
/// one, and anything matching neither is dropped by the caller.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteItem {
    Native {
        #[serde(default)]
        id: Option<RawId>,
        text: String,
        category: String,
        #[serde(default, rename = "updatedAt")]
        updated_at: Option<DateTime<Utc>>,
    },
    Foreign {
        id: RawId,
        title: String,
        #[serde(default)]
        body: Option<String>,
        #[serde(default, rename = "userId")]
        user_id: Option<i64>,
    },
}

/// Bridge a fetched snapshot into canonical records.
///
/// Native-shape items pass through, gaining `now` as their update instant
/// when they carry none and a fresh local-style identifier when they carry
/// no id. Foreign-shape items map `title` (falling back to `body`) to the
/// text, `userId` to a derived category, and prefix the foreign id with
/// the server-origin marker. Items that match neither shape, or normalize
/// to an empty text or category, are dropped.
pub fn normalize_remote(items: Vec<serde_json::Value>, now: DateTime<Utc>) -> Vec<QuoteRecord> {
    items
        .into_iter()
        .filter_map(|item| normalize_item(item, now))
        .collect()
}

fn normalize_item(item: serde_json::Value, now: DateTime<Utc>) -> Option<QuoteRecord> {
    match serde_json::from_value::<RemoteItem>(item).ok()? {
        RemoteItem::Native {
            id,
            text,
            category,
            updated_at,
        } => {
            if text.is_empty() || category.is_empty() {
                return None;
            }
            let id: RecordId = match id {
                Some(raw) => raw.to_string(),
                None => local_record_id(),
            };
            Some(QuoteRecord {
                id: Some(id),
                text,
                category,
                updated_at: Some(updated_at.unwrap_or(now)),
            })
        }
        RemoteItem::Foreign {
            id,
            title,
            body,
            user_id,
        } => {
            let text = if title.is_empty() {
                body.unwrap_or_default()
            } else {
                title
            };
            if text.is_empty() {
                return None;
            }
            let category = match user_id {
                Some(user) => format!("user-{user}"),
                None => "Server".to_string(),
            };
            Some(QuoteRecord {
                id: Some(server_record_id(id)),
                text,
                category,
                updated_at: Some(now),
            })
        }
    }
}

/// Parse and validate an import payload.
///
/// The whole payload is rejected when it is not valid JSON or its top
/// level is not an array; no partial result escapes. Items with non-empty
/// string `text` and `category` are kept, everything else is discarded,
/// and an empty survivor set is its own error so callers can report
/// "nothing usable found" distinctly from a parse failure.
///
/// Accepted records are returned identity-less: import files carry no
/// reliable identifier namespace, so the import path matches by content
/// only.
pub fn parse_import(payload: &str) -> Result<Vec<QuoteRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| Error::ImportParse(e.to_string()))?;

    let serde_json::Value::Array(items) = value else {
        return Err(Error::ImportNotAnArray);
    };

    let valid: Vec<QuoteRecord> = items.iter().filter_map(import_item).collect();
    if valid.is_empty() {
        return Err(Error::NoValidItems);
    }
    Ok(valid)
}

fn import_item(item: &serde_json::Value) -> Option<QuoteRecord> {
    let text = item.get("text")?.as_str()?;
    let category = item.get("category")?.as_str()?;
    if text.is_empty() || category.is_empty() {
        return None;
    }
    Some(QuoteRecord::bare(text, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn native_shape_passes_through() {
        let items = vec![json!({
            "id": "s-7",
            "text": "Hello",
            "category": "Greeting",
            "updatedAt": "2024-03-01T10:00:00Z"
        })];

        let records = normalize_remote(items, now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("s-7"));
        assert_eq!(records[0].text, "Hello");
        assert_eq!(records[0].category, "Greeting");
        assert_eq!(
            records[0].updated_at.unwrap().to_rfc3339(),
            "2024-03-01T10:00:00+00:00"
        );
    }

    #[test]
    fn native_shape_without_timestamp_gets_now() {
        let at = now();
        let items = vec![json!({"id": "s-7", "text": "Hello", "category": "Greeting"})];

        let records = normalize_remote(items, at);
        assert_eq!(records[0].updated_at, Some(at));
    }

    #[test]
    fn native_shape_without_id_gets_local_style_id() {
        let items = vec![json!({"text": "Hello", "category": "Greeting"})];

        let records = normalize_remote(items, now());
        let id = records[0].id.as_deref().unwrap();
        assert!(id.starts_with(crate::LOCAL_ID_PREFIX));
    }

    #[test]
    fn native_shape_numeric_id_is_stringified() {
        let items = vec![json!({"id": 12, "text": "Hello", "category": "Greeting"})];

        let records = normalize_remote(items, now());
        assert_eq!(records[0].id.as_deref(), Some("12"));
    }

    #[test]
    fn foreign_shape_is_bridged() {
        let items = vec![json!({
            "id": 5,
            "title": "A post title",
            "body": "The body",
            "userId": 3
        })];

        let records = normalize_remote(items, now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("s-5"));
        assert_eq!(records[0].text, "A post title");
        assert_eq!(records[0].category, "user-3");
    }

    #[test]
    fn foreign_shape_falls_back_to_body() {
        let items = vec![json!({"id": 5, "title": "", "body": "The body", "userId": 3})];

        let records = normalize_remote(items, now());
        assert_eq!(records[0].text, "The body");
    }

    #[test]
    fn foreign_shape_without_user_gets_default_category() {
        let items = vec![json!({"id": 5, "title": "A post"})];

        let records = normalize_remote(items, now());
        assert_eq!(records[0].category, "Server");
    }

    #[test]
    fn junk_items_are_dropped_silently() {
        let items = vec![
            json!(42),
            json!("just a string"),
            json!({"something": "else"}),
            json!(null),
            // empty text after normalization
            json!({"id": 1, "title": "", "body": ""}),
            json!({"id": "x", "text": "", "category": "C"}),
            // one good item
            json!({"id": "s-1", "text": "Keep me", "category": "Good"}),
        ];

        let records = normalize_remote(items, now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Keep me");
    }

    #[test]
    fn import_accepts_valid_items_identity_less() {
        let payload = r#"[
            {"text": "One", "category": "A"},
            {"text": "Two", "category": "B", "id": "ignored-by-shape"}
        ]"#;

        let records = parse_import(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|q| q.id.is_none()));
    }

    #[test]
    fn import_rejects_malformed_json() {
        let result = parse_import("{not json");
        assert!(matches!(result, Err(Error::ImportParse(_))));
    }

    #[test]
    fn import_rejects_non_array_top_level() {
        let result = parse_import(r#"{"text": "One", "category": "A"}"#);
        assert!(matches!(result, Err(Error::ImportNotAnArray)));
    }

    #[test]
    fn import_with_no_valid_items_is_distinct() {
        let result = parse_import(r#"[{"text": 1}, {"category": "only"}, "junk"]"#);
        assert!(matches!(result, Err(Error::NoValidItems)));
    }

    #[test]
    fn import_skips_empty_strings() {
        let payload = r#"[
            {"text": "", "category": "A"},
            {"text": "Fine", "category": "A"}
        ]"#;

        let records = parse_import(payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Fine");
    }
}
