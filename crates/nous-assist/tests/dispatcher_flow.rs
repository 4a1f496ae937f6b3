//! End-to-end dispatcher tests over an in-memory database with mock
//! collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use nous_assist::{CameraController, CommandDispatcher, Notifier, SpeechSynthesizer};
use nous_core::config::SpeechConfig;
use nous_core::error::NousError;
use nous_core::types::{HistoryKind, NoticeTone, OverlayMode};
use nous_storage::Database;

#[derive(Default)]
struct MockSynthesizer {
    spoken: Mutex<Vec<String>>,
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&self, text: &str) -> Result<(), NousError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl MockSynthesizer {
    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

struct MockCamera {
    fail_start: bool,
}

#[async_trait]
impl CameraController for MockCamera {
    async fn start(&self) -> Result<(), NousError> {
        if self.fail_start {
            return Err(NousError::Camera("permission denied".to_string()));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), NousError> {
        Ok(())
    }

    fn snapshot(&self) -> Result<String, NousError> {
        Ok("data:image/png;base64,MOCK".to_string())
    }
}

#[derive(Default)]
struct MockNotifier {
    notices: Mutex<Vec<(String, NoticeTone)>>,
}

impl Notifier for MockNotifier {
    fn notify(&self, message: &str, tone: NoticeTone) {
        self.notices.lock().unwrap().push((message.to_string(), tone));
    }
}

impl MockNotifier {
    fn notices(&self) -> Vec<(String, NoticeTone)> {
        self.notices.lock().unwrap().clone()
    }
}

struct Harness {
    dispatcher: CommandDispatcher,
    synthesizer: Arc<MockSynthesizer>,
    notifier: Arc<MockNotifier>,
}

fn harness_with(speech: SpeechConfig, fail_camera_start: bool) -> Harness {
    let db = Arc::new(Database::in_memory().unwrap());
    let synthesizer = Arc::new(MockSynthesizer::default());
    let notifier = Arc::new(MockNotifier::default());
    let camera = Arc::new(MockCamera {
        fail_start: fail_camera_start,
    });
    let dispatcher = CommandDispatcher::new(
        db,
        synthesizer.clone(),
        camera,
        notifier.clone(),
        speech,
    );
    Harness {
        dispatcher,
        synthesizer,
        notifier,
    }
}

fn harness() -> Harness {
    harness_with(SpeechConfig::default(), false)
}

#[tokio::test]
async fn mode_command_updates_session_and_speaks() {
    let h = harness();
    let snapshot = h.dispatcher.handle_utterance("modo manos", 0.9).await.unwrap();

    assert_eq!(h.dispatcher.mode(), OverlayMode::Hands);
    assert_eq!(h.synthesizer.spoken(), vec!["Modo manos activado"]);

    // The utterance itself lands in the voice history.
    assert_eq!(snapshot.counts.voice, 1);
    assert_eq!(snapshot.history[0].kind, HistoryKind::Voice);
    assert_eq!(snapshot.history[0].text, "modo manos");
}

#[tokio::test]
async fn save_note_persists_and_logs() {
    let h = harness();
    let snapshot = h
        .dispatcher
        .handle_utterance("guardar nota comprar leche", 0.8)
        .await
        .unwrap();

    assert_eq!(snapshot.counts.notes, 1);
    assert_eq!(snapshot.notes[0].text, "comprar leche");
    assert!(snapshot
        .history
        .iter()
        .any(|e| e.kind == HistoryKind::Note && e.text == "Nota guardada: comprar leche"));
    assert!(h.synthesizer.spoken().contains(&"Nota guardada".to_string()));
}

#[tokio::test]
async fn empty_note_saves_nothing() {
    let h = harness();
    let snapshot = h
        .dispatcher
        .handle_utterance("guardar nota   ", 0.8)
        .await
        .unwrap();

    assert_eq!(snapshot.counts.notes, 0);
    // Only the voice entry, no note history.
    assert_eq!(snapshot.counts.events, 1);
}

#[tokio::test]
async fn read_notes_when_empty_speaks_no_notes() {
    let h = harness();
    h.dispatcher.handle_utterance("leer notas", 0.9).await.unwrap();
    assert_eq!(h.synthesizer.spoken(), vec!["No hay notas guardadas"]);
}

#[tokio::test]
async fn read_notes_speaks_most_recent() {
    let h = harness();
    h.dispatcher
        .handle_utterance("guardar nota primera", 0.9)
        .await
        .unwrap();
    h.dispatcher
        .handle_utterance("guardar nota segunda", 0.9)
        .await
        .unwrap();
    h.dispatcher.handle_utterance("leer notas", 0.9).await.unwrap();

    let spoken = h.synthesizer.spoken();
    assert_eq!(spoken.last().unwrap(), "Última nota: segunda");
}

#[tokio::test]
async fn clear_notes_command_empties_log_and_records_history() {
    let h = harness();
    h.dispatcher
        .handle_utterance("guardar nota temporal", 0.9)
        .await
        .unwrap();
    let snapshot = h
        .dispatcher
        .handle_utterance("eliminar notas", 0.9)
        .await
        .unwrap();

    assert_eq!(snapshot.counts.notes, 0);
    assert!(snapshot
        .history
        .iter()
        .any(|e| e.text == "Notas eliminadas por comando de voz"));
}

#[tokio::test]
async fn capture_without_camera_warns_and_stores_nothing() {
    let h = harness();
    let snapshot = h.dispatcher.handle_utterance("capturar", 0.9).await.unwrap();

    assert_eq!(snapshot.counts.captures, 0);
    assert!(h
        .notifier
        .notices()
        .iter()
        .any(|(msg, tone)| msg == "Primero inicia la cámara" && *tone == NoticeTone::Warning));
}

#[tokio::test]
async fn capture_snapshots_current_mode() {
    let h = harness();
    h.dispatcher.handle_utterance("modo cara", 0.9).await.unwrap();
    h.dispatcher.start_camera().await.unwrap();
    let snapshot = h.dispatcher.handle_utterance("capturar", 0.9).await.unwrap();

    assert_eq!(snapshot.counts.captures, 1);
    assert_eq!(snapshot.captures[0].mode, OverlayMode::Face);
    assert_eq!(snapshot.captures[0].image, "data:image/png;base64,MOCK");
    assert!(snapshot
        .history
        .iter()
        .any(|e| e.kind == HistoryKind::Capture && e.text == "Captura guardada en modo cara"));
}

#[tokio::test]
async fn camera_lifecycle_via_voice() {
    let h = harness();
    let snapshot = h
        .dispatcher
        .handle_utterance("iniciar cámara", 0.9)
        .await
        .unwrap();
    assert!(h.dispatcher.session().camera_active);
    assert!(snapshot
        .history
        .iter()
        .any(|e| e.kind == HistoryKind::Camera && e.text == "Cámara iniciada"));

    let snapshot = h
        .dispatcher
        .handle_utterance("detener camara", 0.9)
        .await
        .unwrap();
    assert!(!h.dispatcher.session().camera_active);
    assert!(snapshot
        .history
        .iter()
        .any(|e| e.text == "Cámara detenida"));
}

#[tokio::test]
async fn double_start_camera_is_noop() {
    let h = harness();
    h.dispatcher.start_camera().await.unwrap();
    let snapshot = h.dispatcher.start_camera().await.unwrap();

    let starts = snapshot
        .history
        .iter()
        .filter(|e| e.text == "Cámara iniciada")
        .count();
    assert_eq!(starts, 1);
}

#[tokio::test]
async fn stop_camera_when_inactive_is_noop() {
    let h = harness();
    let snapshot = h.dispatcher.stop_camera().await.unwrap();
    assert_eq!(snapshot.counts.events, 0);
}

#[tokio::test]
async fn camera_start_failure_notifies_and_session_stays_usable() {
    let h = harness_with(SpeechConfig::default(), true);
    let result = h.dispatcher.start_camera().await;
    assert!(result.is_err());
    assert!(!h.dispatcher.session().camera_active);
    assert!(h
        .notifier
        .notices()
        .iter()
        .any(|(_, tone)| *tone == NoticeTone::Error));

    // The failure must not poison later operations.
    let snapshot = h
        .dispatcher
        .handle_utterance("guardar nota aun funciona", 0.9)
        .await
        .unwrap();
    assert_eq!(snapshot.counts.notes, 1);
}

#[tokio::test]
async fn fallback_echo_speaks_original_utterance() {
    let h = harness();
    h.dispatcher
        .handle_utterance("xyz random phrase", 0.4)
        .await
        .unwrap();
    assert_eq!(
        h.synthesizer.spoken(),
        vec!["He escuchado: xyz random phrase"]
    );
}

#[tokio::test]
async fn fallback_echo_can_be_disabled() {
    let speech = SpeechConfig {
        fallback_echo: false,
        ..SpeechConfig::default()
    };
    let h = harness_with(speech, false);
    h.dispatcher
        .handle_utterance("xyz random phrase", 0.4)
        .await
        .unwrap();
    assert!(h.synthesizer.spoken().is_empty());
}

#[tokio::test]
async fn recognition_error_no_speech_is_silent() {
    let h = harness();
    let snapshot = h.dispatcher.on_recognition_error("no-speech").unwrap();

    assert!(snapshot
        .history
        .iter()
        .any(|e| e.kind == HistoryKind::Error && e.text == "Speech error: no-speech"));
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn recognition_error_other_codes_notify() {
    let h = harness();
    h.dispatcher.on_recognition_error("audio-capture").unwrap();

    assert!(h
        .notifier
        .notices()
        .iter()
        .any(|(msg, tone)| msg == "Error de voz: audio-capture" && *tone == NoticeTone::Error));
}

#[tokio::test]
async fn speak_text_logs_tts_entry() {
    let h = harness();
    let snapshot = h.dispatcher.speak_text("hola mundo").unwrap();

    assert!(snapshot
        .history
        .iter()
        .any(|e| e.kind == HistoryKind::Tts && e.text == "hola mundo"));
    assert_eq!(h.synthesizer.spoken(), vec!["hola mundo"]);
}

#[tokio::test]
async fn speak_text_ignores_blank_input() {
    let h = harness();
    let snapshot = h.dispatcher.speak_text("   ").unwrap();
    assert_eq!(snapshot.counts.events, 0);
    assert!(h.synthesizer.spoken().is_empty());
}

#[tokio::test]
async fn clear_history_leaves_notes_and_captures() {
    let h = harness();
    h.dispatcher
        .handle_utterance("guardar nota persistente", 0.9)
        .await
        .unwrap();
    let snapshot = h.dispatcher.clear_history().unwrap();

    assert_eq!(snapshot.counts.events, 0);
    assert_eq!(snapshot.counts.notes, 1);
}

#[tokio::test]
async fn export_notes_round_trips() {
    let h = harness();
    h.dispatcher
        .handle_utterance("guardar nota exportame", 0.9)
        .await
        .unwrap();

    let json = h.dispatcher.export_notes().unwrap();
    let notes: Vec<nous_core::types::Note> = serde_json::from_str(&json).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "exportame");
}

#[tokio::test]
async fn events_are_broadcast() {
    let h = harness();
    let mut rx = h.dispatcher.subscribe();

    h.dispatcher.handle_utterance("modo manos", 0.9).await.unwrap();

    let mut saw_mode_change = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(
            event,
            nous_core::events::AssistantEvent::ModeChanged { mode: OverlayMode::Hands }
        ) {
            saw_mode_change = true;
        }
    }
    assert!(saw_mode_change);
}
