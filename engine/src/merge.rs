//! Reconciliation of the local collection against a remote snapshot.
//!
//! This is the core of the sync cycle. Given the current local records and
//! a freshly normalized remote snapshot, it produces the new collection,
//! the list of detected conflicts, and the count of appended records.
//!
//! # Algorithm
//!
//! 1. Index local records by identifier (identifier-less records never
//!    take part in id matching)
//! 2. For each remote record: identical content at the same id is left
//!    untouched; differing content emits a conflict and the server version
//!    replaces the local entry in place; an unknown id is appended
//! 3. Local records without a remote counterpart are retained unchanged
//!
//! The default resolution is server-wins, regardless of which side is
//! newer. The snapshot is treated as a partial view, never as an
//! authoritative full state, so the merge never deletes local data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{QuoteRecord, RecordId};

/// A detected disagreement between the local and server versions of the
/// same identified record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The local version at merge time
    pub local: QuoteRecord,
    /// The server version that was applied by default
    pub server: QuoteRecord,
}

/// Result of one merge cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The reconciled collection, ready to swap in as the new local state
    pub records: Vec<QuoteRecord>,
    /// Disagreements detected this cycle, in snapshot order
    pub conflicts: Vec<Conflict>,
    /// Number of remote records appended as new
    pub added: usize,
}

/// Merge a remote snapshot into the local collection.
///
/// Returns a new collection rather than mutating shared state; the caller
/// commits it in one swap so readers never observe a partially merged
/// collection. `now` stamps every record the merge rewrites; records that
/// are already consistent keep their timestamps untouched.
pub fn merge_remote(
    local: &[QuoteRecord],
    remote: &[QuoteRecord],
    now: DateTime<Utc>,
) -> MergeOutcome {
    let mut records: Vec<QuoteRecord> = local.to_vec();
    let mut conflicts = Vec::new();
    let mut added = 0;

    let index: HashMap<RecordId, usize> = records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| record.id.clone().map(|id| (id, position)))
        .collect();

    for server in remote {
        // Normalization guarantees remote records carry ids; skip any that
        // slipped through rather than matching them against everything.
        let Some(id) = server.id.as_deref() else {
            continue;
        };

        match index.get(id) {
            Some(&position) => {
                if records[position].same_content(server) {
                    continue;
                }
                conflicts.push(Conflict {
                    local: records[position].clone(),
                    server: server.clone(),
                });
                // Server wins by default, no matter which side is newer.
                records[position] = server.stamped(now);
            }
            None => {
                let mut fresh = server.clone();
                if fresh.updated_at.is_none() {
                    fresh.updated_at = Some(now);
                }
                records.push(fresh);
                added += 1;
            }
        }
    }

    MergeOutcome {
        records,
        conflicts,
        added,
    }
}
