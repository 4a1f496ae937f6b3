//! Recognition lifecycle state machine with thread-safe transitions.
//!
//! The recognition engine runs a continuous-listening loop that ends
//! sessions on its own (silence, engine hiccups). The lifecycle keeps
//! those benign ends from looking like a user stop:
//! - Idle -> Listening (user starts listening)
//! - Listening -> Stopping (user asked to stop; engine end pending)
//! - Listening -> Idle (engine end without restart policy)
//! - Stopping -> Idle (engine end after a requested stop)
//!
//! An engine "end" while in Listening triggers an automatic restart;
//! an "end" while in Stopping completes the stop.

use std::fmt;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use nous_core::error::NousError;

/// Operational state of the recognition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenState {
    /// Not listening. Ready to start.
    Idle,
    /// Recognition session active.
    Listening,
    /// User requested a stop; waiting for the engine's end event.
    Stopping,
}

impl fmt::Display for ListenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenState::Idle => write!(f, "Idle"),
            ListenState::Listening => write!(f, "Listening"),
            ListenState::Stopping => write!(f, "Stopping"),
        }
    }
}

impl ListenState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &ListenState) -> bool {
        matches!(
            (self, target),
            (ListenState::Idle, ListenState::Listening)
                | (ListenState::Listening, ListenState::Stopping)
                | (ListenState::Listening, ListenState::Idle)
                | (ListenState::Stopping, ListenState::Idle)
        )
    }
}

/// What the recognition driver should do after an engine end event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// The session ended on its own; restart the engine.
    Restart,
    /// The stop the user asked for completed; stay idle.
    Stopped,
}

struct Inner {
    state: ListenState,
    session_id: Option<Uuid>,
}

/// Thread-safe recognition lifecycle.
///
/// Wraps the state in an `Arc<Mutex<>>` so clones share one lifecycle.
/// All transitions are validated before being applied.
#[derive(Clone)]
pub struct ListenLifecycle {
    inner: Arc<Mutex<Inner>>,
    auto_restart: bool,
}

impl ListenLifecycle {
    /// Create a lifecycle initialized to `Idle`.
    pub fn new(auto_restart: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ListenState::Idle,
                session_id: None,
            })),
            auto_restart,
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> ListenState {
        self.inner.lock().expect("state mutex poisoned").state
    }

    /// Returns the active session id, if listening.
    pub fn session_id(&self) -> Option<Uuid> {
        self.inner.lock().expect("state mutex poisoned").session_id
    }

    /// Start listening: Idle -> Listening. Assigns a fresh session id.
    pub fn begin(&self) -> Result<Uuid, NousError> {
        let mut inner = self.inner.lock().expect("state mutex poisoned");
        if !inner.state.can_transition_to(&ListenState::Listening) {
            return Err(NousError::Recognition(format!(
                "Invalid state transition: {} -> Listening",
                inner.state
            )));
        }
        let id = Uuid::new_v4();
        tracing::debug!("Listen state: {} -> Listening ({})", inner.state, id);
        inner.state = ListenState::Listening;
        inner.session_id = Some(id);
        Ok(id)
    }

    /// User-initiated stop: Listening -> Stopping.
    ///
    /// The engine keeps running until it emits its end event; routing
    /// through Stopping keeps the restart policy from resurrecting a
    /// session the user asked to end.
    pub fn request_stop(&self) -> Result<(), NousError> {
        let mut inner = self.inner.lock().expect("state mutex poisoned");
        if !inner.state.can_transition_to(&ListenState::Stopping) {
            return Err(NousError::Recognition(format!(
                "Invalid state transition: {} -> Stopping",
                inner.state
            )));
        }
        tracing::debug!("Listen state: {} -> Stopping", inner.state);
        inner.state = ListenState::Stopping;
        Ok(())
    }

    /// Handle the engine's end event.
    ///
    /// While Listening this is an unexpected end: with auto_restart the
    /// lifecycle stays Listening under a fresh session id and the caller
    /// restarts the engine. While Stopping the stop completes.
    pub fn on_end(&self) -> Result<EndOutcome, NousError> {
        let mut inner = self.inner.lock().expect("state mutex poisoned");
        match inner.state {
            ListenState::Listening if self.auto_restart => {
                let id = Uuid::new_v4();
                tracing::debug!("Recognition ended unexpectedly; restarting ({})", id);
                inner.session_id = Some(id);
                Ok(EndOutcome::Restart)
            }
            ListenState::Listening => {
                tracing::debug!("Listen state: Listening -> Idle (no restart policy)");
                inner.state = ListenState::Idle;
                inner.session_id = None;
                Ok(EndOutcome::Stopped)
            }
            ListenState::Stopping => {
                tracing::debug!("Listen state: Stopping -> Idle");
                inner.state = ListenState::Idle;
                inner.session_id = None;
                Ok(EndOutcome::Stopped)
            }
            ListenState::Idle => Err(NousError::Recognition(
                "End event received while Idle".to_string(),
            )),
        }
    }

    /// Force the lifecycle back to Idle (error recovery).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("state mutex poisoned");
        tracing::warn!("Listen lifecycle reset to Idle from {}", inner.state);
        inner.state = ListenState::Idle;
        inner.session_id = None;
    }
}

impl fmt::Debug for ListenLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenLifecycle")
            .field("state", &self.current())
            .field("auto_restart", &self.auto_restart)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
