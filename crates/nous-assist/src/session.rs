//! Owned session state.
//!
//! The overlay mode and camera flag live in one struct handed to the
//! dispatcher, instead of ambient globals. Mode is snapshotted into
//! capture records and history text at write time.

use nous_core::types::OverlayMode;

/// Mutable per-session assistant state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Active overlay mode. Starts at `None`.
    pub mode: OverlayMode,
    /// Whether the camera collaborator is currently running.
    pub camera_active: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}
