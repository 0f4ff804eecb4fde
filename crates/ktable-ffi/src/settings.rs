//! Process-wide client settings for the export boundary.
//!
//! Loaded once, on first use, from `KTABLE_CONFIG` or the platform config
//! file.  A file that cannot be read or parsed does not stop the library:
//! the built-in defaults are used and the load error is kept so it can be
//! logged again once a subscriber exists.

use std::sync::OnceLock;

use ktable_client::infrastructure::storage::config::load_config;
use ktable_client::{ClientConfig, ConfigError};
use tracing::warn;

/// Effective configuration plus the reason defaults were used, if any.
#[derive(Debug)]
pub struct Settings {
    config: ClientConfig,
    load_error: Option<String>,
}

impl Settings {
    /// Resolves a config load result, falling back to defaults on error.
    pub fn from_load(result: Result<ClientConfig, ConfigError>) -> Self {
        match result {
            Ok(config) => Self {
                config,
                load_error: None,
            },
            Err(e) => {
                warn!("using default client config: {e}");
                Self {
                    config: ClientConfig::default(),
                    load_error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Why the defaults are in effect, when the config file was unusable.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// The settings every export uses, loading them on first call.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| Settings::from_load(load_config()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ktable_client::infrastructure::storage::config::load_config_from;

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote\nconnect_timeout_ms = ").unwrap();

        // Act
        let settings = Settings::from_load(load_config_from(&path));

        // Assert
        assert_eq!(*settings.config(), ClientConfig::default());
        assert!(settings.load_error().is_some_and(|e| e.contains("parse")));
    }

    #[test]
    fn test_zero_default_port_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote]\ndefault_port = 0\n").unwrap();

        let settings = Settings::from_load(load_config_from(&path));

        assert_eq!(settings.config().remote.default_port.get(), 9000);
        assert!(settings.load_error().is_some());
    }

    #[test]
    fn test_valid_file_is_used_as_is() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[local]\ndefault_endpoint = \"kinect:4\"\n").unwrap();

        // Act
        let settings = Settings::from_load(load_config_from(&path));

        // Assert
        assert_eq!(settings.config().local.default_endpoint, "kinect:4");
        assert!(settings.load_error().is_none());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let settings = Settings::from_load(load_config_from(&dir.path().join("absent.toml")));

        assert_eq!(*settings.config(), ClientConfig::default());
        assert!(settings.load_error().is_none());
    }
}
