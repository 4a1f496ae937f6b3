//! Console-backed collaborator implementations for the harness.
//!
//! The real speech and camera engines live in the embedding platform;
//! here the synthesizer and notifier print to stdout and the camera is
//! simulated so the capture path can run end to end.

use std::sync::Mutex;

use async_trait::async_trait;

use nous_assist::{CameraController, Notifier, SpeechSynthesizer};
use nous_core::config::CameraConfig;
use nous_core::error::NousError;
use nous_core::types::NoticeTone;

/// Prints spoken text to stdout.
pub struct ConsoleSynthesizer;

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&self, text: &str) -> Result<(), NousError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        println!("[voz] {}", text);
        Ok(())
    }
}

/// Simulated camera: tracks running state and produces placeholder
/// frame snapshots.
pub struct SimulatedCamera {
    running: Mutex<bool>,
    config: CameraConfig,
    frame_counter: Mutex<u64>,
}

impl SimulatedCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            running: Mutex::new(false),
            config,
            frame_counter: Mutex::new(0),
        }
    }
}

#[async_trait]
impl CameraController for SimulatedCamera {
    async fn start(&self) -> Result<(), NousError> {
        *self.running.lock().expect("camera mutex poisoned") = true;
        tracing::info!(
            "Simulated camera started ({}x{})",
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    async fn stop(&self) -> Result<(), NousError> {
        *self.running.lock().expect("camera mutex poisoned") = false;
        tracing::info!("Simulated camera stopped");
        Ok(())
    }

    fn snapshot(&self) -> Result<String, NousError> {
        if !*self.running.lock().expect("camera mutex poisoned") {
            return Err(NousError::Camera("camera is not running".to_string()));
        }
        let mut counter = self.frame_counter.lock().expect("camera mutex poisoned");
        *counter += 1;
        Ok(format!(
            "data:image/png;base64,sim-frame-{}-{}x{}",
            counter, self.config.width, self.config.height
        ))
    }
}

/// Prints notices to stdout with a tone marker.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, tone: NoticeTone) {
        let icon = match tone {
            NoticeTone::Success => "✓",
            NoticeTone::Error => "✗",
            NoticeTone::Info => "ℹ",
            NoticeTone::Warning => "⚠",
        };
        println!("[{}] {}", icon, message);
    }
}
