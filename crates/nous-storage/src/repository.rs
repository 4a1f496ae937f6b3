//! Repository implementations for the three append-only logs.
//!
//! Each repository owns one table and exposes the store contract:
//! append (returns the assigned id), read_all (unordered), clear, count.
//! Records are never updated; "delete" only exists as clear-all.

use std::sync::Arc;

use nous_core::error::NousError;
use nous_core::types::{now_iso, Capture, HistoryEntry, HistoryKind, Note, OverlayMode};

use crate::db::Database;

/// Repository for the event history log.
pub struct HistoryRepository {
    db: Arc<Database>,
}

impl HistoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a history entry, stamping it with the current time.
    /// Returns the assigned id.
    pub fn append(&self, kind: HistoryKind, text: &str) -> Result<i64, NousError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO history (kind, text, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![kind.as_str(), text, now_iso()],
            )
            .map_err(|e| NousError::Storage(format!("Failed to append history: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Read every entry in the log. Ordering is the caller's concern.
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>, NousError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, kind, text, created_at FROM history")
                .map_err(|e| NousError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    let kind: String = row.get(1)?;
                    Ok(HistoryEntry {
                        id: row.get(0)?,
                        kind: HistoryKind::parse(&kind).unwrap_or(HistoryKind::Error),
                        text: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .map_err(|e| NousError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| NousError::Storage(e.to_string()))
        })
    }

    /// Delete every entry in the history log only.
    pub fn clear(&self) -> Result<(), NousError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM history", [])
                .map_err(|e| NousError::Storage(format!("Failed to clear history: {}", e)))?;
            Ok(())
        })
    }

    pub fn count(&self) -> Result<u64, NousError> {
        count_table(&self.db, "history")
    }
}

/// Repository for the notes log.
pub struct NoteRepository {
    db: Arc<Database>,
}

impl NoteRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a note. Returns the assigned id.
    pub fn append(&self, text: &str) -> Result<i64, NousError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (text, created_at) VALUES (?1, ?2)",
                rusqlite::params![text, now_iso()],
            )
            .map_err(|e| NousError::Storage(format!("Failed to append note: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn read_all(&self) -> Result<Vec<Note>, NousError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, text, created_at FROM notes")
                .map_err(|e| NousError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(Note {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                })
                .map_err(|e| NousError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| NousError::Storage(e.to_string()))
        })
    }

    pub fn clear(&self) -> Result<(), NousError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM notes", [])
                .map_err(|e| NousError::Storage(format!("Failed to clear notes: {}", e)))?;
            Ok(())
        })
    }

    pub fn count(&self) -> Result<u64, NousError> {
        count_table(&self.db, "notes")
    }
}

/// Repository for captured still frames.
pub struct CaptureRepository {
    db: Arc<Database>,
}

impl CaptureRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append a capture with the overlay mode active at capture time.
    /// Returns the assigned id.
    pub fn append(&self, image: &str, mode: OverlayMode) -> Result<i64, NousError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO captures (image, mode, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![image, mode.as_str(), now_iso()],
            )
            .map_err(|e| NousError::Storage(format!("Failed to append capture: {}", e)))?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn read_all(&self) -> Result<Vec<Capture>, NousError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, image, mode, created_at FROM captures")
                .map_err(|e| NousError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| {
                    let mode: String = row.get(2)?;
                    Ok(Capture {
                        id: row.get(0)?,
                        image: row.get(1)?,
                        mode: OverlayMode::parse(&mode).unwrap_or_default(),
                        created_at: row.get(3)?,
                    })
                })
                .map_err(|e| NousError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| NousError::Storage(e.to_string()))
        })
    }

    pub fn clear(&self) -> Result<(), NousError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM captures", [])
                .map_err(|e| NousError::Storage(format!("Failed to clear captures: {}", e)))?;
            Ok(())
        })
    }

    pub fn count(&self) -> Result<u64, NousError> {
        count_table(&self.db, "captures")
    }
}

fn count_table(db: &Database, table: &str) -> Result<u64, NousError> {
    db.with_conn(|conn| {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(|e| NousError::Storage(e.to_string()))?;
        Ok(count as u64)
    })
}
