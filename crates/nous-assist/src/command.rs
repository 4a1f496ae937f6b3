//! Voice command interpretation.
//!
//! A fixed-priority table of literal, case-insensitive substring and
//! prefix tests. The first matching rule wins and the rest of the
//! utterance is ignored. Matching is intentionally permissive: "modo
//! cara algo mas" still activates face mode.

use nous_core::types::OverlayMode;

/// A discrete action for the dispatcher to execute against the store
/// or an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetMode(OverlayMode),
    StartCamera,
    StopCamera,
    CaptureImage,
    /// Persist a note with the given text.
    SaveNote(String),
    /// Speak the most recent note, or a no-notes message.
    SpeakLastNote,
    /// Clear the whole notes log.
    ClearNotes,
    /// Forward text to the synthesizer. `fallback` marks the echo of an
    /// unmatched utterance.
    Speak { text: String, fallback: bool },
}

/// Map an utterance to its effects.
///
/// Every matched rule yields exactly one effect; an empty note after
/// "guardar nota" yields none. Unmatched input echoes the original
/// utterance back as a fallback.
pub fn interpret(utterance: &str) -> Vec<Effect> {
    let text = utterance.to_lowercase();

    if text.contains("modo manos") {
        return vec![Effect::SetMode(OverlayMode::Hands)];
    }
    if text.contains("modo cara") {
        return vec![Effect::SetMode(OverlayMode::Face)];
    }
    if text.contains("modo normal") {
        return vec![Effect::SetMode(OverlayMode::None)];
    }
    if text.contains("iniciar cámara") || text.contains("iniciar camara") {
        return vec![Effect::StartCamera];
    }
    if text.contains("detener cámara") || text.contains("detener camara") {
        return vec![Effect::StopCamera];
    }
    if text.contains("capturar") {
        return vec![Effect::CaptureImage];
    }
    if text.starts_with("guardar nota") {
        // Strip the prefix from the original text to keep its casing.
        let note = utterance["guardar nota".len()..].trim();
        if note.is_empty() {
            return Vec::new();
        }
        return vec![Effect::SaveNote(note.to_string())];
    }
    if text.contains("leer notas") {
        return vec![Effect::SpeakLastNote];
    }
    if text.contains("eliminar notas") {
        return vec![Effect::ClearNotes];
    }

    vec![Effect::Speak {
        text: format!("He escuchado: {}", utterance),
        fallback: true,
    }]
}
