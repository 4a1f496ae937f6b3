//! NousSense core crate - shared types, errors, events, configuration.
//!
//! Everything the storage and assistant crates agree on lives here:
//! the three record kinds (history entries, notes, captures), the
//! overlay mode, the error taxonomy, and the TOML configuration.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::NousConfig;
pub use error::{NousError, Result};
pub use types::*;
