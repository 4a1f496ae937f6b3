//! NousSense storage crate - SQLite persistence for the three logs.
//!
//! Provides a WAL-mode SQLite database with idempotent migrations,
//! append-only repositories for history/notes/captures, and the
//! refresh service that produces recency-sorted snapshots and counters.

pub mod db;
pub mod migrations;
pub mod queries;
pub mod repository;

pub use db::Database;
pub use queries::{Counts, RefreshService, Snapshot};
pub use repository::{CaptureRepository, HistoryRepository, NoteRepository};
