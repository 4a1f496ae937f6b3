use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NousError, Result};

/// Top-level configuration for the NousSense assistant.
///
/// Loaded from `~/.noussense/config.toml` by default. Every field has a
/// default so a missing or partial file still yields a working setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NousConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl NousConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NousConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is
    /// missing or unparseable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| NousError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: "info".to_string(),
        }
    }
}

/// Speech recognition and synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// BCP-47 language tag for recognition and synthesis.
    pub language: String,
    /// Restart the recognition engine when a session ends without a
    /// user-requested stop (continuous listening).
    pub auto_restart: bool,
    /// Echo unmatched utterances back through the synthesizer.
    pub fallback_echo: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "es-ES".to_string(),
            auto_restart: true,
            fallback_echo: true,
        }
    }
}

/// Camera collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file name inside the data directory.
    pub db_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: "noussense.db".to_string(),
        }
    }
}

fn default_data_dir() -> String {
    std::env::var("HOME")
        .map(|h| format!("{}/.noussense", h))
        .unwrap_or_else(|_| ".noussense".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NousConfig::default();
        assert_eq!(config.speech.language, "es-ES");
        assert!(config.speech.auto_restart);
        assert!(config.speech.fallback_echo);
        assert_eq!(config.camera.width, 640);
        assert_eq!(config.camera.height, 480);
        assert_eq!(config.storage.db_file, "noussense.db");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: NousConfig = toml::from_str(
            r#"
            [speech]
            language = "en-US"
            "#,
        )
        .unwrap();
        assert_eq!(config.speech.language, "en-US");
        assert!(config.speech.auto_restart);
        assert_eq!(config.camera.width, 640);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = NousConfig::default();
        config.speech.auto_restart = false;
        config.camera.width = 1280;
        config.save(&path).unwrap();

        let loaded = NousConfig::load(&path).unwrap();
        assert!(!loaded.speech.auto_restart);
        assert_eq!(loaded.camera.width, 1280);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = NousConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.speech.language, "es-ES");
    }
}
