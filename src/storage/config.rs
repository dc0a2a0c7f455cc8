//! Application configuration management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::{PoseAnalysisSettings, ShootingHand, VideoRequirements};
use crate::processing::{RouterSettings, UserConsent};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Capability detection settings
    pub capability: CapabilitySettings,
    /// Router settings
    pub processing: ProcessingSettings,
    /// Pose analysis settings
    pub analysis: AnalysisSettings,
    /// Stored user consent
    pub consent: UserConsent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            capability: CapabilitySettings::default(),
            processing: ProcessingSettings::default(),
            analysis: AnalysisSettings::default(),
            consent: UserConsent::default(),
        }
    }
}

impl AppConfig {
    /// Path of the SQLite database inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("shotcoach.db")
    }
}

/// Capability detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySettings {
    /// Days before a cached capability record is re-detected
    pub cache_max_age_days: u32,
}

impl Default for CapabilitySettings {
    fn default() -> Self {
        Self {
            cache_max_age_days: 7,
        }
    }
}

impl CapabilitySettings {
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.cache_max_age_days))
    }
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Hard limit per strategy invocation in seconds (0 disables)
    pub strategy_timeout_secs: u64,
    /// Soft budget for basic analysis in milliseconds
    pub basic_budget_ms: u64,
    /// Soft budget for ML analysis in milliseconds
    pub ml_budget_ms: u64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            strategy_timeout_secs: 30,
            basic_budget_ms: 2000,
            ml_budget_ms: 5000,
        }
    }
}

impl ProcessingSettings {
    pub fn router_settings(&self) -> RouterSettings {
        RouterSettings {
            strategy_timeout: match self.strategy_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            basic_budget: Duration::from_millis(self.basic_budget_ms),
            ml_budget: Duration::from_millis(self.ml_budget_ms),
        }
    }
}

/// Pose analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub shooting_hand: ShootingHand,
    /// Keypoints below this confidence are ignored
    pub min_keypoint_confidence: f64,
    /// Minimum of frame width and height in pixels
    pub min_frame_height: u32,
    pub min_frame_rate: f32,
    pub min_duration_secs: f32,
    pub max_duration_secs: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        let requirements = VideoRequirements::default();
        Self {
            shooting_hand: ShootingHand::Right,
            min_keypoint_confidence: 0.3,
            min_frame_height: requirements.min_frame_height,
            min_frame_rate: requirements.min_frame_rate,
            min_duration_secs: requirements.min_duration_secs,
            max_duration_secs: requirements.max_duration_secs,
        }
    }
}

impl AnalysisSettings {
    pub fn pose_settings(&self) -> PoseAnalysisSettings {
        PoseAnalysisSettings {
            shooting_hand: self.shooting_hand,
            min_keypoint_confidence: self.min_keypoint_confidence,
            video_requirements: VideoRequirements {
                min_frame_height: self.min_frame_height,
                min_frame_rate: self.min_frame_rate,
                min_duration_secs: self.min_duration_secs,
                max_duration_secs: self.max_duration_secs,
            },
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "shotcoach", "ShotCoach")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from `path`, or the default location.
///
/// A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    if !path.exists() {
        let config = AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    Ok(config)
}

/// Save configuration to `path`, or the default location.
pub fn save_config(config: &AppConfig, path: Option<&Path>) -> Result<(), ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
