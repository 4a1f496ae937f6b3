//! NousSense assistant crate - voice command dispatch.
//!
//! Maps recognized utterances to effects, applies them against the
//! store and the external collaborators (synthesizer, camera,
//! notifier), and manages the recognition lifecycle state machine.

pub mod collaborator;
pub mod command;
pub mod dispatcher;
pub mod recognition;
pub mod session;

pub use collaborator::{CameraController, Notifier, SpeechSynthesizer};
pub use command::{interpret, Effect};
pub use dispatcher::CommandDispatcher;
pub use recognition::{EndOutcome, ListenLifecycle, ListenState};
pub use session::SessionState;
