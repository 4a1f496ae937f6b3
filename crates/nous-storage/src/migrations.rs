//! Database schema migrations.
//!
//! Applies the initial schema: the three independent log tables
//! (history, notes, captures) plus the schema_migrations tracking table.
//! There are no cross-table relationships; a capture's mode and the
//! history texts are denormalized snapshots taken at write time.

use rusqlite::Connection;
use tracing::info;

use nous_core::error::NousError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Re-running is
/// idempotent.
pub fn run_migrations(conn: &Connection) -> Result<(), NousError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| NousError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| NousError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<(), NousError> {
    conn.execute_batch(
        "
        -- Event history log, append-only.
        CREATE TABLE IF NOT EXISTS history (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            kind        TEXT NOT NULL
                        CHECK (kind IN ('voice', 'camera', 'note', 'tts', 'error', 'capture')),
            text        TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_created_at
            ON history (created_at DESC);

        CREATE INDEX IF NOT EXISTS idx_history_kind
            ON history (kind);

        -- Free-text notes log.
        CREATE TABLE IF NOT EXISTS notes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            text        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_created_at
            ON notes (created_at DESC);

        -- Captured still frames.
        CREATE TABLE IF NOT EXISTS captures (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            image       TEXT NOT NULL,
            mode        TEXT NOT NULL
                        CHECK (mode IN ('none', 'hands', 'face')),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_captures_created_at
            ON captures (created_at DESC);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| NousError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
