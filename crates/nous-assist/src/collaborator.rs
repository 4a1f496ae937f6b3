//! Trait seams for the external collaborators.
//!
//! The speech synthesizer, camera/vision engine, and notification
//! surface are platform services this core only drives. Real
//! implementations live with the embedding application; tests use
//! in-memory mocks.

use async_trait::async_trait;

use nous_core::error::NousError;
use nous_core::types::NoticeTone;

/// Text-to-speech output.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak the given text. Blank text is the implementation's
    /// responsibility to ignore.
    fn speak(&self, text: &str) -> Result<(), NousError>;
}

/// Camera/vision engine lifecycle plus a snapshot accessor.
#[async_trait]
pub trait CameraController: Send + Sync {
    /// Start the camera and the overlay render loop.
    async fn start(&self) -> Result<(), NousError>;

    /// Stop the camera and release the device.
    async fn stop(&self) -> Result<(), NousError>;

    /// Encoded still frame of the current rendered output (e.g. a PNG
    /// data URL). Only meaningful while the camera is running.
    fn snapshot(&self) -> Result<String, NousError>;
}

/// Transient, dismissible user notification surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, tone: NoticeTone);
}
