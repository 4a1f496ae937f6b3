use thiserror::Error;

/// Top-level error type for the NousSense system.
///
/// Each variant wraps a subsystem-specific failure. Storage failures
/// cover the "store unavailable" case (open failure, rejected write);
/// recognition failures carry the engine's error code as text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NousError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for NousError {
    fn from(err: toml::de::Error) -> Self {
        NousError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for NousError {
    fn from(err: toml::ser::Error) -> Self {
        NousError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for NousError {
    fn from(err: serde_json::Error) -> Self {
        NousError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for NousSense operations.
pub type Result<T> = std::result::Result<T, NousError>;
