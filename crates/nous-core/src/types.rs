use chrono::Utc;
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The active vision overlay mode.
///
/// Controls which landmark detection the camera collaborator applies.
/// `None` means plain passthrough video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMode {
    /// Plain video, no landmark overlay.
    #[default]
    None,
    /// Hand landmark overlay.
    Hands,
    /// Face mesh overlay.
    Face,
}

impl OverlayMode {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayMode::None => "none",
            OverlayMode::Hands => "hands",
            OverlayMode::Face => "face",
        }
    }

    /// Parse the storage representation back into a mode.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(OverlayMode::None),
            "hands" => Some(OverlayMode::Hands),
            "face" => Some(OverlayMode::Face),
            _ => None,
        }
    }

    /// Spanish label used in spoken confirmations and history text.
    pub fn label(&self) -> &'static str {
        match self {
            OverlayMode::None => "normal",
            OverlayMode::Hands => "manos",
            OverlayMode::Face => "cara",
        }
    }
}

impl std::fmt::Display for OverlayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag of a history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    /// A recognized voice utterance.
    Voice,
    /// A camera lifecycle event (started/stopped).
    Camera,
    /// A note mutation (saved, cleared).
    Note,
    /// Text spoken on request through the synthesizer.
    Tts,
    /// A recognition or collaborator failure.
    Error,
    /// A still frame was captured.
    Capture,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Voice => "voice",
            HistoryKind::Camera => "camera",
            HistoryKind::Note => "note",
            HistoryKind::Tts => "tts",
            HistoryKind::Error => "error",
            HistoryKind::Capture => "capture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "voice" => Some(HistoryKind::Voice),
            "camera" => Some(HistoryKind::Camera),
            "note" => Some(HistoryKind::Note),
            "tts" => Some(HistoryKind::Tts),
            "error" => Some(HistoryKind::Error),
            "capture" => Some(HistoryKind::Capture),
            _ => None,
        }
    }
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a transient user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTone {
    Success,
    Error,
    Info,
    Warning,
}

// =============================================================================
// Records
// =============================================================================

/// One entry in the append-only event history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Log-local identifier assigned by the store.
    pub id: i64,
    pub kind: HistoryKind,
    pub text: String,
    /// ISO-8601 creation timestamp. Treated as opaque text on read;
    /// consumers must tolerate unparseable values.
    pub created_at: String,
}

/// A free-text note, user- or voice-authored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub text: String,
    pub created_at: String,
}

/// A captured still frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub id: i64,
    /// Encoded frame, e.g. a PNG data URL.
    pub image: String,
    /// Overlay mode snapshot at capture time, not a live reference.
    pub mode: OverlayMode,
    pub created_at: String,
}

/// Current UTC time as an RFC 3339 string, the on-disk timestamp format.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// =============================================================================
// Tests
// =============================================================================
