//! # Quotesync Engine
//!
//! The reconciliation core for a locally persisted quote collection that is
//! periodically synchronized against a remote snapshot.
//!
//! This crate holds all of the state-management and conflict-handling logic.
//! It has no knowledge of files, network, or timers - those live in the
//! client crate. Every merge and resolution operation receives its
//! timestamp as an argument, so the same inputs always produce the same
//! outputs.
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`QuoteRecord`] is a short text with a category. Records created on
//! this device carry an `l-` prefixed identifier; records originating from
//! the server carry an `s-` prefix. Legacy records (seeded samples and
//! imported items) have no identifier at all and are matched only by
//! content, never by id.
//!
//! ### Merging
//!
//! [`merge_remote`] reconciles the local collection against a freshly
//! fetched remote snapshot. Identified records that disagree produce a
//! [`Conflict`]; the server version is applied by default, regardless of
//! which side is newer. Local records the snapshot does not mention are
//! always retained.
//!
//! ### Conflict review
//!
//! A [`ResolutionSession`] holds the conflicts of the most recent merge
//! cycle. The caller may override the default per conflict with a
//! [`Choice`] before the result is committed; a new cycle supersedes any
//! batch still pending.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use quotesync_engine::{merge_remote, Choice, QuoteRecord, ResolutionSession, Store};
//!
//! let mut store = Store::new();
//! store.replace_all(vec![QuoteRecord::new(
//!     "s-1",
//!     "Stay hungry",
//!     "Motivation",
//!     Utc::now(),
//! )]);
//!
//! // The remote snapshot disagrees about record "s-1".
//! let remote = vec![QuoteRecord::new("s-1", "Stay foolish", "Motivation", Utc::now())];
//!
//! let now = Utc::now();
//! let outcome = merge_remote(store.records(), &remote, now);
//! assert_eq!(outcome.conflicts.len(), 1);
//!
//! // Server wins by default.
//! store.replace_all(outcome.records);
//! assert_eq!(store.records()[0].text, "Stay foolish");
//!
//! // The user can still keep the local wording.
//! let mut session = ResolutionSession::new();
//! session.begin(outcome.conflicts);
//! let mut records = store.records().to_vec();
//! session.resolve(&[Choice::Local], &mut records, now);
//! store.replace_all(records);
//! assert_eq!(store.records()[0].text, "Stay hungry");
//! ```

pub mod error;
pub mod merge;
pub mod record;
pub mod resolve;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use error::{Error, Result};
pub use merge::{merge_remote, Conflict, MergeOutcome};
pub use record::{
    local_record_id, server_record_id, QuoteRecord, LOCAL_ID_PREFIX, SERVER_ID_PREFIX,
};
pub use resolve::{Choice, ResolutionSession};
pub use store::{ImportSummary, Store, SAMPLE_QUOTES};
pub use validate::{normalize_remote, parse_import};

/// Type aliases for clarity
pub type RecordId = String;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
