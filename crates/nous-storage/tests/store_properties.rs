//! Integration tests for the store contract across the three logs.

use std::collections::HashSet;
use std::sync::Arc;

use nous_core::types::{HistoryKind, OverlayMode};
use nous_storage::{
    CaptureRepository, Database, HistoryRepository, NoteRepository, RefreshService,
};

fn open() -> Arc<Database> {
    Arc::new(Database::in_memory().unwrap())
}

#[test]
fn append_sequence_read_all_set_equality() {
    let db = open();
    let notes = NoteRepository::new(db);

    let texts = ["uno", "dos", "tres", "cuatro", "cinco"];
    let mut ids = Vec::new();
    for text in &texts {
        ids.push(notes.append(text).unwrap());
    }

    let stored = notes.read_all().unwrap();
    assert_eq!(stored.len(), texts.len());

    // Unique ids, non-empty timestamps, exact record set.
    let unique: HashSet<i64> = stored.iter().map(|n| n.id).collect();
    assert_eq!(unique.len(), texts.len());
    assert!(stored.iter().all(|n| !n.created_at.is_empty()));

    let stored_texts: HashSet<&str> = stored.iter().map(|n| n.text.as_str()).collect();
    let expected: HashSet<&str> = texts.iter().copied().collect();
    assert_eq!(stored_texts, expected);
}

#[test]
fn clear_empties_one_log_and_leaves_others() {
    let db = open();
    let history = HistoryRepository::new(db.clone());
    let notes = NoteRepository::new(db.clone());
    let captures = CaptureRepository::new(db.clone());

    history.append(HistoryKind::Voice, "hola").unwrap();
    history.append(HistoryKind::Error, "Speech error: network").unwrap();
    notes.append("recordar esto").unwrap();
    captures.append("data:image/png;base64,AA", OverlayMode::Hands).unwrap();

    history.clear().unwrap();

    assert!(history.read_all().unwrap().is_empty());
    assert_eq!(notes.read_all().unwrap().len(), 1);
    assert_eq!(captures.read_all().unwrap().len(), 1);
}

#[test]
fn refresh_orders_each_log_and_counts_match() {
    let db = open();
    let history = HistoryRepository::new(db.clone());
    let notes = NoteRepository::new(db.clone());
    let captures = CaptureRepository::new(db.clone());
    let refresh = RefreshService::new(db);

    history.append(HistoryKind::Voice, "primero").unwrap();
    history.append(HistoryKind::Camera, "Cámara iniciada").unwrap();
    history.append(HistoryKind::Voice, "segundo").unwrap();
    notes.append("nota a").unwrap();
    notes.append("nota b").unwrap();
    captures.append("data:", OverlayMode::None).unwrap();

    let snapshot = refresh.refresh().unwrap();

    // created_at descending within each log (lenient comparator is
    // exercised elsewhere; here all timestamps parse).
    for window in snapshot.history.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
    for window in snapshot.notes.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }

    assert_eq!(snapshot.counts.voice, 2);
    assert_eq!(snapshot.counts.events, 3);
    assert_eq!(snapshot.counts.notes, 2);
    assert_eq!(snapshot.counts.captures, 1);
    assert!(snapshot.counts.voice <= snapshot.counts.events);
}

#[test]
fn ids_are_scoped_per_log() {
    let db = open();
    let history = HistoryRepository::new(db.clone());
    let notes = NoteRepository::new(db.clone());
    let captures = CaptureRepository::new(db);

    // Each log starts its own id sequence; cross-log collisions are fine.
    let h = history.append(HistoryKind::Note, "Nota guardada").unwrap();
    let n = notes.append("texto").unwrap();
    let c = captures.append("data:", OverlayMode::Face).unwrap();
    assert_eq!(h, 1);
    assert_eq!(n, 1);
    assert_eq!(c, 1);
}

#[test]
fn on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.db");

    {
        let db = Arc::new(Database::open(&path).unwrap());
        NoteRepository::new(db).append("persistente").unwrap();
    }

    let db = Arc::new(Database::open(&path).unwrap());
    let notes = NoteRepository::new(db).read_all().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "persistente");
}
