//! Query/refresh service over the three logs.
//!
//! `refresh()` is the single read path the UI layer depends on: all
//! three logs sorted by recency plus the summary counters. It never
//! mutates the store.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::DateTime;
use serde::Serialize;

use nous_core::error::NousError;
use nous_core::types::{Capture, HistoryEntry, HistoryKind, Note};

use crate::db::Database;
use crate::repository::{CaptureRepository, HistoryRepository, NoteRepository};

/// Summary counters shown alongside the lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// History entries of kind voice.
    pub voice: u64,
    /// Total notes.
    pub notes: u64,
    /// Total captures.
    pub captures: u64,
    /// Total history entries of any kind.
    pub events: u64,
}

/// Everything a render pass needs: the three logs newest-first plus counts.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub history: Vec<HistoryEntry>,
    pub notes: Vec<Note>,
    pub captures: Vec<Capture>,
    pub counts: Counts,
}

/// Read-only service producing refresh snapshots.
pub struct RefreshService {
    history: HistoryRepository,
    notes: NoteRepository,
    captures: CaptureRepository,
}

impl RefreshService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            history: HistoryRepository::new(db.clone()),
            notes: NoteRepository::new(db.clone()),
            captures: CaptureRepository::new(db),
        }
    }

    /// Read all three logs, sort each by created_at descending, and
    /// compute the summary counters.
    ///
    /// Unparseable timestamps compare equal, so malformed records never
    /// fail the call; the sort is stable, so ties keep insertion order.
    pub fn refresh(&self) -> Result<Snapshot, NousError> {
        let mut history = self.history.read_all()?;
        let mut notes = self.notes.read_all()?;
        let mut captures = self.captures.read_all()?;

        history.sort_by(|a, b| cmp_created_desc(&a.created_at, &b.created_at));
        notes.sort_by(|a, b| cmp_created_desc(&a.created_at, &b.created_at));
        captures.sort_by(|a, b| cmp_created_desc(&a.created_at, &b.created_at));

        let counts = Counts {
            voice: history
                .iter()
                .filter(|e| e.kind == HistoryKind::Voice)
                .count() as u64,
            notes: notes.len() as u64,
            captures: captures.len() as u64,
            events: history.len() as u64,
        };

        Ok(Snapshot {
            history,
            notes,
            captures,
            counts,
        })
    }

    /// The most recent note by created_at, if any.
    pub fn last_note(&self) -> Result<Option<Note>, NousError> {
        let mut notes = self.notes.read_all()?;
        notes.sort_by(|a, b| cmp_created_desc(&a.created_at, &b.created_at));
        Ok(notes.into_iter().next())
    }

    /// All notes, newest first, as pretty-printed JSON for export.
    pub fn export_notes(&self) -> Result<String, NousError> {
        let mut notes = self.notes.read_all()?;
        notes.sort_by(|a, b| cmp_created_desc(&a.created_at, &b.created_at));
        Ok(serde_json::to_string_pretty(&notes)?)
    }
}

/// Descending comparator over ISO-8601 timestamp strings.
///
/// Either side failing to parse yields Equal rather than an error.
fn cmp_created_desc(a: &str, b: &str) -> Ordering {
    match (
        DateTime::parse_from_rfc3339(a),
        DateTime::parse_from_rfc3339(b),
    ) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        _ => Ordering::Equal,
    }
}
