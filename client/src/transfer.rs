//! Import and export of quote collections as JSON files.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use quotesync_engine::{parse_import, ImportSummary, Store};

use crate::error::Result;

/// Default export file name for the given day: `quotes-YYYY-MM-DD.json`.
pub fn export_file_name(today: DateTime<Utc>) -> String {
    format!("quotes-{}.json", today.format("%Y-%m-%d"))
}

/// Write the full collection as pretty-printed JSON.
pub fn export_to_file(store: &Store, path: &Path) -> Result<()> {
    fs::write(path, store.to_json_pretty()?)?;
    Ok(())
}

/// Read an import file and merge its valid items into the store.
///
/// The whole import is rejected on malformed JSON or a non-array top
/// level, and when no item passes validation; nothing partial is
/// committed. Persisting the merged collection is the caller's job.
pub fn import_from_file(store: &mut Store, path: &Path) -> Result<ImportSummary> {
    let payload = fs::read_to_string(path)?;
    let valid = parse_import(&payload)?;
    Ok(store.import_merge(valid))
}
