//! Viewer configuration.
//!
//! Everything is optional in the JSON form; missing fields take their
//! defaults and unknown fields are rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::{ViewportController, ZoomSteps};
use crate::notice::{DEFAULT_NOTICE_DELAY, NoticeState};
use crate::viewport::{BASE_ZOOM, ZoomBounds};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Options handed to the rendering collaborator once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderOptions {
    pub theme: String,
    pub security_level: String,
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            security_level: "loose".to_string(),
            font_family: "inherit".to_string(),
        }
    }
}

/// Tunables for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerConfig {
    pub zoom: ZoomBounds,
    pub steps: ZoomSteps,
    /// How long a zoom limit notice stays up, in milliseconds.
    pub notice_delay_ms: u64,
    pub render: RenderOptions,
    /// Explicit path to the Mermaid CLI; `mmdc` on `PATH` otherwise.
    pub mmdc_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomBounds::default(),
            steps: ZoomSteps::default(),
            notice_delay_ms: DEFAULT_NOTICE_DELAY.as_millis() as u64,
            render: RenderOptions::default(),
            mmdc_path: None,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check the numeric invariants the viewport relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        let ZoomBounds { min, max } = self.zoom;
        if !(min.is_finite() && min > 0.0) {
            return Err(ConfigError::Invalid(format!("zoom.min must be positive, got {}", min)));
        }
        if !(max.is_finite() && min <= BASE_ZOOM && BASE_ZOOM <= max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] must contain 1.0",
                min, max
            )));
        }
        let steps = [
            ("steps.button", self.steps.button),
            ("steps.wheelIn", self.steps.wheel_in),
            ("steps.wheelOut", self.steps.wheel_out),
        ];
        for (name, value) in steps {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }

    pub fn notice_delay(&self) -> Duration {
        Duration::from_millis(self.notice_delay_ms)
    }

    /// Build a viewport controller with these settings.
    pub fn controller(&self) -> ViewportController {
        ViewportController::new(self.zoom, self.steps, NoticeState::with_delay(self.notice_delay()))
    }

    /// Load a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Write a config file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, self.to_json()?)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Load `path` if it exists, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Default config location: `<config_dir>/inkmaid/config.json`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|base| base.join("inkmaid").join("config.json"))
    }

    /// Load from the default location, or defaults if there is none.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert!((config.zoom.min - 0.2).abs() < f64::EPSILON);
        assert!((config.zoom.max - 3.0).abs() < f64::EPSILON);
        assert!((config.steps.button - 1.2).abs() < f64::EPSILON);
        assert_eq!(config.notice_delay(), Duration::from_millis(1000));
        assert_eq!(config.render.theme, "default");
        assert_eq!(config.render.security_level, "loose");
        assert_eq!(config.render.font_family, "inherit");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            ViewerConfig::from_json(r#"{ "zoom": { "max": 5.0 }, "render": { "theme": "dark" } }"#)
                .unwrap();
        assert!((config.zoom.min - 0.2).abs() < f64::EPSILON);
        assert!((config.zoom.max - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.render.theme, "dark");
        assert_eq!(config.render.security_level, "loose");
    }

    #[test]
    fn test_camel_case_fields() {
        let config = ViewerConfig::from_json(
            r#"{ "noticeDelayMs": 250, "steps": { "wheelIn": 1.05 }, "render": { "fontFamily": "monospace" } }"#,
        )
        .unwrap();
        assert_eq!(config.notice_delay_ms, 250);
        assert!((config.steps.wheel_in - 1.05).abs() < f64::EPSILON);
        assert!((config.steps.wheel_out - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.render.font_family, "monospace");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = ViewerConfig::from_json(r#"{ "zoomMax": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let cases = [
            r#"{ "zoom": { "min": 0.0 } }"#,
            r#"{ "zoom": { "min": 1.5, "max": 3.0 } }"#,
            r#"{ "zoom": { "min": 0.2, "max": 0.8 } }"#,
            r#"{ "steps": { "button": -1.2 } }"#,
        ];
        for json in cases {
            let err = ViewerConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}", json);
        }
    }

    #[test]
    fn test_controller_from_config() {
        let config = ViewerConfig::from_json(r#"{ "zoom": { "max": 2.0 }, "steps": { "button": 2.0 } }"#)
            .unwrap();
        let mut controller = config.controller();
        controller.zoom_in();
        assert!((controller.zoom() - 2.0).abs() < f64::EPSILON);
        assert_eq!(controller.notice(), None);
        controller.zoom_in();
        assert_eq!(controller.notice_message().as_deref(), Some("Maximum zoom (200%)"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = ViewerConfig::default();
        config.mmdc_path = Some(PathBuf::from("/opt/mermaid/mmdc"));
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert_eq!(ViewerConfig::load_or_default(&missing), ViewerConfig::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert_eq!(ViewerConfig::load_or_default(&broken), ViewerConfig::default());

        let valid = dir.path().join("valid.json");
        std::fs::write(&valid, r#"{ "noticeDelayMs": 2000 }"#).unwrap();
        assert_eq!(ViewerConfig::load_or_default(&valid).notice_delay_ms, 2000);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
