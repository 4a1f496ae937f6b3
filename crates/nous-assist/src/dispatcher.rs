//! Command dispatcher: effects against the store and collaborators.
//!
//! Every mutating path appends its history entry and ends with a
//! refresh, so callers always get a snapshot consistent with what they
//! just did. Failures are converted into a user notice at this
//! boundary; the session stays usable after any single failure.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use nous_core::config::SpeechConfig;
use nous_core::error::NousError;
use nous_core::events::{AssistantEvent, ClearedLog};
use nous_core::types::{HistoryKind, NoticeTone, OverlayMode};
use nous_storage::{
    CaptureRepository, Database, HistoryRepository, NoteRepository, RefreshService, Snapshot,
};

use crate::collaborator::{CameraController, Notifier, SpeechSynthesizer};
use crate::command::{interpret, Effect};
use crate::session::SessionState;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Executes interpreted effects and the direct button-path operations.
pub struct CommandDispatcher {
    history: HistoryRepository,
    notes: NoteRepository,
    captures: CaptureRepository,
    refresh: RefreshService,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    camera: Arc<dyn CameraController>,
    notifier: Arc<dyn Notifier>,
    speech: SpeechConfig,
    session: Mutex<SessionState>,
    events: broadcast::Sender<AssistantEvent>,
}

impl CommandDispatcher {
    pub fn new(
        db: Arc<Database>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        camera: Arc<dyn CameraController>,
        notifier: Arc<dyn Notifier>,
        speech: SpeechConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            history: HistoryRepository::new(db.clone()),
            notes: NoteRepository::new(db.clone()),
            captures: CaptureRepository::new(db.clone()),
            refresh: RefreshService::new(db),
            synthesizer,
            camera,
            notifier,
            speech,
            session: Mutex::new(SessionState::new()),
            events,
        }
    }

    /// Subscribe to domain events (UI listeners).
    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    /// Copy of the current session state.
    pub fn session(&self) -> SessionState {
        *self.session.lock().expect("session mutex poisoned")
    }

    /// Current overlay mode.
    pub fn mode(&self) -> OverlayMode {
        self.session().mode
    }

    /// Re-read all three logs (the reload button path).
    pub fn refresh(&self) -> Result<Snapshot, NousError> {
        self.refresh.refresh()
    }

    /// Notes as pretty-printed JSON, newest first.
    pub fn export_notes(&self) -> Result<String, NousError> {
        self.guard(self.refresh.export_notes())
    }

    // =========================================================================
    // Voice path
    // =========================================================================

    /// Handle a recognized utterance: log it, interpret it, apply the
    /// effects, and return a fresh snapshot.
    pub async fn handle_utterance(
        &self,
        text: &str,
        confidence: f32,
    ) -> Result<Snapshot, NousError> {
        tracing::info!(confidence, "Utterance recognized: {}", text);
        self.emit(AssistantEvent::UtteranceRecognized {
            text: text.to_string(),
            confidence,
        });

        self.guard(self.append_history(HistoryKind::Voice, text))?;

        for effect in interpret(text) {
            let result = self.apply(effect).await;
            self.guard(result)?;
        }

        self.guard(self.refresh.refresh())
    }

    /// Log a recognition engine error. A "no-speech" end is benign and
    /// only recorded; every other code is also surfaced to the user.
    pub fn on_recognition_error(&self, code: &str) -> Result<Snapshot, NousError> {
        self.guard(self.append_history(HistoryKind::Error, &format!("Speech error: {}", code)))?;
        self.emit(AssistantEvent::RecognitionFailed {
            code: code.to_string(),
        });

        if code != "no-speech" {
            self.notifier
                .notify(&format!("Error de voz: {}", code), NoticeTone::Error);
        }

        self.guard(self.refresh.refresh())
    }

    async fn apply(&self, effect: Effect) -> Result<(), NousError> {
        match effect {
            Effect::SetMode(mode) => {
                self.update_mode(mode);
                self.synthesizer
                    .speak(&format!("Modo {} activado", mode.label()))
            }
            Effect::StartCamera => {
                if self.start_camera_inner().await? {
                    self.synthesizer.speak("Cámara iniciada")?;
                }
                Ok(())
            }
            Effect::StopCamera => {
                if self.stop_camera_inner().await? {
                    self.synthesizer.speak("Cámara detenida")?;
                }
                Ok(())
            }
            Effect::CaptureImage => self.capture_inner(),
            Effect::SaveNote(text) => {
                let note_id = self.notes.append(&text)?;
                self.append_history(HistoryKind::Note, &format!("Nota guardada: {}", text))?;
                self.emit(AssistantEvent::NoteSaved { note_id });
                self.synthesizer.speak("Nota guardada")
            }
            Effect::SpeakLastNote => match self.refresh.last_note()? {
                Some(note) => self
                    .synthesizer
                    .speak(&format!("Última nota: {}", note.text)),
                None => self.synthesizer.speak("No hay notas guardadas"),
            },
            Effect::ClearNotes => {
                self.notes.clear()?;
                self.append_history(HistoryKind::Note, "Notas eliminadas por comando de voz")?;
                self.emit(AssistantEvent::LogCleared {
                    log: ClearedLog::Notes,
                });
                self.synthesizer.speak("Notas eliminadas")
            }
            Effect::Speak { text, fallback } => {
                if fallback && !self.speech.fallback_echo {
                    tracing::debug!("Fallback echo disabled; dropping: {}", text);
                    return Ok(());
                }
                self.emit(AssistantEvent::SpeechRequested {
                    text: text.clone(),
                    fallback,
                });
                self.synthesizer.speak(&text)
            }
        }
    }

    // =========================================================================
    // Button path (bypasses the interpreter)
    // =========================================================================

    /// Set the overlay mode directly (the mode selector path).
    pub fn set_mode(&self, mode: OverlayMode) {
        self.update_mode(mode);
    }

    pub async fn start_camera(&self) -> Result<Snapshot, NousError> {
        let result = self.start_camera_inner().await;
        self.guard(result)?;
        self.guard(self.refresh.refresh())
    }

    pub async fn stop_camera(&self) -> Result<Snapshot, NousError> {
        let result = self.stop_camera_inner().await;
        self.guard(result)?;
        self.guard(self.refresh.refresh())
    }

    pub async fn capture_image(&self) -> Result<Snapshot, NousError> {
        self.guard(self.capture_inner())?;
        self.guard(self.refresh.refresh())
    }

    /// Speak arbitrary text on request, logging it as a tts entry.
    pub fn speak_text(&self, text: &str) -> Result<Snapshot, NousError> {
        let text = text.trim();
        if !text.is_empty() {
            self.emit(AssistantEvent::SpeechRequested {
                text: text.to_string(),
                fallback: false,
            });
            self.guard(self.synthesizer.speak(text))?;
            self.guard(self.append_history(HistoryKind::Tts, text))?;
        }
        self.guard(self.refresh.refresh())
    }

    /// Clear the notes log (confirmed UI action, no history entry).
    pub fn clear_notes(&self) -> Result<Snapshot, NousError> {
        self.guard(self.notes.clear())?;
        self.emit(AssistantEvent::LogCleared {
            log: ClearedLog::Notes,
        });
        self.guard(self.refresh.refresh())
    }

    /// Clear the whole event history log.
    pub fn clear_history(&self) -> Result<Snapshot, NousError> {
        self.guard(self.history.clear())?;
        self.emit(AssistantEvent::LogCleared {
            log: ClearedLog::History,
        });
        self.guard(self.refresh.refresh())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn update_mode(&self, mode: OverlayMode) {
        self.session.lock().expect("session mutex poisoned").mode = mode;
        tracing::info!("Overlay mode set to {}", mode);
        self.emit(AssistantEvent::ModeChanged { mode });
    }

    /// Start the camera if it is not already running. Returns whether a
    /// start actually happened.
    async fn start_camera_inner(&self) -> Result<bool, NousError> {
        if self.session().camera_active {
            return Ok(false);
        }
        self.camera.start().await?;
        self.session
            .lock()
            .expect("session mutex poisoned")
            .camera_active = true;

        self.append_history(HistoryKind::Camera, "Cámara iniciada")?;
        self.emit(AssistantEvent::CameraStarted);
        self.notifier.notify("Cámara iniciada", NoticeTone::Success);
        Ok(true)
    }

    /// Stop the camera if it is running. Returns whether a stop happened.
    async fn stop_camera_inner(&self) -> Result<bool, NousError> {
        if !self.session().camera_active {
            return Ok(false);
        }
        self.camera.stop().await?;
        self.session
            .lock()
            .expect("session mutex poisoned")
            .camera_active = false;

        self.append_history(HistoryKind::Camera, "Cámara detenida")?;
        self.emit(AssistantEvent::CameraStopped);
        self.notifier.notify("Cámara detenida", NoticeTone::Info);
        Ok(true)
    }

    /// Persist a still frame with the current mode snapshot.
    fn capture_inner(&self) -> Result<(), NousError> {
        let session = self.session();
        if !session.camera_active {
            self.notifier
                .notify("Primero inicia la cámara", NoticeTone::Warning);
            return Ok(());
        }

        let image = self.camera.snapshot()?;
        let capture_id = self.captures.append(&image, session.mode)?;
        self.append_history(
            HistoryKind::Capture,
            &format!("Captura guardada en modo {}", session.mode.label()),
        )?;
        self.emit(AssistantEvent::CaptureSaved {
            capture_id,
            mode: session.mode,
        });
        self.notifier.notify("Captura guardada", NoticeTone::Success);
        Ok(())
    }

    fn append_history(&self, kind: HistoryKind, text: &str) -> Result<i64, NousError> {
        let entry_id = self.history.append(kind, text)?;
        self.emit(AssistantEvent::HistoryAppended { entry_id, kind });
        Ok(entry_id)
    }

    /// Convert a failure into a user notice before propagating it.
    fn guard<T>(&self, result: Result<T, NousError>) -> Result<T, NousError> {
        if let Err(ref e) = result {
            tracing::warn!("Operation failed: {}", e);
            self.notifier.notify(&e.to_string(), NoticeTone::Error);
        }
        result
    }

    fn emit(&self, event: AssistantEvent) {
        // No receivers is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("session", &self.session())
            .finish()
    }
}
