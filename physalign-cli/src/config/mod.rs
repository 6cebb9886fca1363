use anyhow::{Context, Result};
use physalign::models::CameraView;
use physalign::TrackingConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,

    #[serde(default)]
    pub replay: ReplayConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default = "default_target_reps")]
    pub target_reps: u32,

    #[serde(default)]
    pub view: CameraView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_target_reps() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            target_reps: default_target_reps(),
            view: CameraView::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: default_true(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.physalign/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".physalign"))
    }

    /// Get config file path (~/.physalign/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_file = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file()?,
        };

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config
            .tracking
            .validate()
            .with_context(|| format!("Invalid tracking section in {}", config_file.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`, or the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_file = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_file()?,
        };

        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_file, contents).context("Failed to write config file")?;

        Ok(config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.replay.target_reps, 10);
        assert_eq!(config.replay.view, CameraView::Side);
        assert!(config.ui.color);
        assert_eq!(config.tracking.rep_cooldown_ms, 800);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.tracking, deserialized.tracking);
        assert_eq!(config.replay.view, deserialized.replay.view);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tracking]
            rep_cooldown_ms = 1200

            [replay]
            view = "front"
            "#,
        )
        .unwrap();

        assert_eq!(config.tracking.rep_cooldown_ms, 1200);
        assert_eq!(config.tracking.calibration_duration_ms, 3000);
        assert_eq!(config.replay.view, CameraView::Front);
        assert_eq!(config.replay.target_reps, 10);
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.replay.target_reps = 12;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.replay.target_reps, 12);
    }

    #[test]
    fn test_rejects_invalid_tracking_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tracking]\ntempo_window = 0\n").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }
}
