use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{HistoryKind, OverlayMode};

/// Domain events emitted by the assistant core.
///
/// Consumed by UI listeners (status badge, lists, counters). The core
/// only emits; rendering is an external concern.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum AssistantEvent {
    /// The recognition engine produced a final utterance.
    UtteranceRecognized { text: String, confidence: f32 },

    /// A listening session started (or auto-restarted).
    ListeningStarted { session_id: Uuid },

    /// The user-requested stop completed.
    ListeningStopped { session_id: Uuid },

    /// The recognition engine reported an error code.
    RecognitionFailed { code: String },

    /// The overlay mode changed.
    ModeChanged { mode: OverlayMode },

    CameraStarted,
    CameraStopped,

    /// A still frame was persisted.
    CaptureSaved { capture_id: i64, mode: OverlayMode },

    /// A note was persisted.
    NoteSaved { note_id: i64 },

    /// A whole log was cleared.
    LogCleared { log: ClearedLog },

    /// A history entry of any kind was appended.
    HistoryAppended { entry_id: i64, kind: HistoryKind },

    /// The synthesizer was asked to speak.
    SpeechRequested { text: String, fallback: bool },
}

/// Which log a clear-all operation targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearedLog {
    History,
    Notes,
    Captures,
}
