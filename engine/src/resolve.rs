//! Conflict review between sync cycles.
//!
//! The merge engine applies the server version of every conflicting record
//! by default. The [`ResolutionSession`] keeps those conflicts around so a
//! caller can override the default per record before the collection is
//! committed for good.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Conflict, QuoteRecord};

/// Which side of a conflict to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    /// Re-assert the local record over the already-applied server value
    Local,
    /// Confirm the server record (the merge default)
    #[default]
    Server,
}

/// The pending conflicts of the most recent merge cycle.
#[derive(Debug, Clone, Default)]
pub struct ResolutionSession {
    pending: Vec<Conflict>,
}

impl ResolutionSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending batch with the conflicts of a new cycle.
    ///
    /// Any batch still unresolved from a previous cycle is discarded, not
    /// carried forward: each cycle's conflicts supersede the last.
    pub fn begin(&mut self, conflicts: Vec<Conflict>) {
        self.pending = conflicts;
    }

    /// Conflicts awaiting review.
    pub fn pending(&self) -> &[Conflict] {
        &self.pending
    }

    /// Number of conflicts awaiting review.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is awaiting review.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Build a choice per pending conflict, keeping the local version for
    /// the given record ids and the server version everywhere else.
    pub fn choices_keeping_local(&self, ids: &[String]) -> Vec<Choice> {
        self.pending
            .iter()
            .map(|conflict| match conflict.server.id.as_deref() {
                Some(id) if ids.iter().any(|keep| keep == id) => Choice::Local,
                _ => Choice::Server,
            })
            .collect()
    }

    /// Apply per-conflict choices to `records` and clear the batch.
    ///
    /// `Local` restores the local record at that identifier (or appends it
    /// if the id has vanished); `Server` confirms the server record. Both
    /// branches stamp `now`. Conflicts without an explicit choice keep the
    /// server version. Returns the number of conflicts applied; persisting
    /// the result is the caller's job.
    pub fn resolve(
        &mut self,
        choices: &[Choice],
        records: &mut Vec<QuoteRecord>,
        now: DateTime<Utc>,
    ) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let applied = pending.len();

        for (position, conflict) in pending.into_iter().enumerate() {
            let choice = choices.get(position).copied().unwrap_or_default();
            let Some(id) = conflict.server.id.clone() else {
                continue;
            };
            let winner = match choice {
                Choice::Local => conflict.local,
                Choice::Server => conflict.server,
            }
            .stamped(now);

            match records
                .iter()
                .position(|q| q.id.as_deref() == Some(id.as_str()))
            {
                Some(slot) => records[slot] = winner,
                None => records.push(winner),
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{merge_remote, QuoteRecord};

    fn record(id: &str, text: &str, category: &str) -> QuoteRecord {
        QuoteRecord::new(id, text, category, Utc::now())
    }

    fn conflicted() -> (Vec<QuoteRecord>, ResolutionSession) {
        let local = vec![record("1", "A", "X")];
        let remote = vec![record("1", "B", "X")];
        let outcome = merge_remote(&local, &remote, Utc::now());

        let mut session = ResolutionSession::new();
        session.begin(outcome.conflicts);
        (outcome.records, session)
    }

    #[test]
    fn choosing_local_restores_the_local_record() {
        let (mut records, mut session) = conflicted();

        let applied = session.resolve(&[Choice::Local], &mut records, Utc::now());

        assert_eq!(applied, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "A");
        assert!(session.is_empty());
    }

    #[test]
    fn choosing_server_confirms_the_server_record() {
        let (mut records, mut session) = conflicted();

        session.resolve(&[Choice::Server], &mut records, Utc::now());

        assert_eq!(records[0].text, "B");
        assert!(session.is_empty());
    }

    #[test]
    fn missing_choices_default_to_server() {
        let (mut records, mut session) = conflicted();

        session.resolve(&[], &mut records, Utc::now());

        assert_eq!(records[0].text, "B");
    }

    #[test]
    fn resolution_stamps_a_fresh_timestamp() {
        let (mut records, mut session) = conflicted();
        let later = Utc::now() + chrono::Duration::minutes(5);

        session.resolve(&[Choice::Local], &mut records, later);

        assert_eq!(records[0].updated_at, Some(later));
    }

    #[test]
    fn vanished_id_is_reinstated_by_append() {
        let (_, mut session) = conflicted();
        // The record was removed between merge and resolution.
        let mut records = Vec::new();

        session.resolve(&[Choice::Local], &mut records, Utc::now());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "A");
    }

    #[test]
    fn new_cycle_supersedes_pending_batch() {
        let (_, mut session) = conflicted();
        assert_eq!(session.len(), 1);

        let local = vec![record("2", "C", "Y")];
        let remote = vec![record("2", "D", "Y")];
        let outcome = merge_remote(&local, &remote, Utc::now());
        session.begin(outcome.conflicts);

        assert_eq!(session.len(), 1);
        assert_eq!(session.pending()[0].server.text, "D");
    }

    #[test]
    fn choices_keeping_local_maps_ids() {
        let local = vec![record("1", "A", "X"), record("2", "C", "Y")];
        let remote = vec![record("1", "B", "X"), record("2", "D", "Y")];
        let outcome = merge_remote(&local, &remote, Utc::now());

        let mut session = ResolutionSession::new();
        session.begin(outcome.conflicts);

        let choices = session.choices_keeping_local(&["2".to_string()]);
        assert_eq!(choices, vec![Choice::Server, Choice::Local]);
    }
}
