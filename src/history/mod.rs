//! Session history of completed rewrites.
//!
//! Entries are append-only: once recorded they are never modified. The
//! history lives in memory for the session and can optionally be mirrored to
//! a JSON Lines log file via [`HistoryLog`].

mod log;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rewrite::{RewriteRequest, RewriteResult};

pub use log::HistoryLog;

/// One completed rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the rewrite completed.
    pub timestamp: DateTime<Utc>,
    /// Tone label (e.g. `formal`).
    pub tone: String,
    /// Target language.
    pub language: String,
    /// Original feedback text.
    pub original: String,
    /// Rewritten text shown to the user.
    pub rewritten: String,
    /// Candidate identifier or `fallback`.
    pub source_model: String,
    /// Whether a backend candidate produced the text.
    pub succeeded: bool,
}

impl HistoryEntry {
    /// Builds an entry from a request and its result.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, request: &RewriteRequest, result: &RewriteResult) -> Self {
        Self {
            timestamp,
            tone: request.tone().label().to_owned(),
            language: request.target_language().to_owned(),
            original: request.original_text().to_owned(),
            rewritten: result.text().to_owned(),
            source_model: result.source_model().to_owned(),
            succeeded: result.succeeded(),
        }
    }
}

/// Append-only list of rewrites made during one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rewrite timestamped with the current time and returns the
    /// new entry.
    pub fn record(&mut self, request: &RewriteRequest, result: &RewriteResult) -> HistoryEntry {
        self.record_at(Utc::now(), request, result)
    }

    /// Records a rewrite with an explicit timestamp.
    pub fn record_at(
        &mut self,
        timestamp: DateTime<Utc>,
        request: &RewriteRequest,
        result: &RewriteResult,
    ) -> HistoryEntry {
        let entry = HistoryEntry::new(timestamp, request, result);
        self.entries.push(entry.clone());
        entry
    }

    /// Recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        self.entries.as_slice()
    }

    /// Number of recorded entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
