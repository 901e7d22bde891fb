use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::app_dirs::AppDirs;

pub const DEFAULT_TIMEOUT_MINUTES: u32 = 25;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub timeout_minutes: u32,
    /// Sound played on timeout. Empty disables audio.
    pub sound_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            sound_file: String::new(),
        }
    }
}

impl Config {
    pub fn timeout_seconds(&self) -> u64 {
        u64::from(self.timeout_minutes) * 60
    }

    pub fn sound_path(&self) -> Option<&Path> {
        let trimmed = self.sound_file.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Path::new(trimmed))
        }
    }

    /// Apply an edited timeout. On error the current value is kept.
    pub fn set_timeout_minutes(&mut self, input: &str) -> Result<u32, ConfigError> {
        let minutes = parse_timeout_minutes(input)?;
        self.timeout_minutes = minutes;
        Ok(minutes)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("timeout must be a whole number of minutes, got {0:?}")]
    NotANumber(String),
    #[error("timeout must be at least one minute")]
    NotPositive,
}

pub fn parse_timeout_minutes(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ConfigError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(ConfigError::NotPositive);
    }
    u32::try_from(value).map_err(|_| ConfigError::NotANumber(trimmed.to_string()))
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("pomotimer_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            // A hand-edited zero would disable the timeout check entirely.
            Ok(cfg) if cfg.timeout_minutes > 0 => cfg,
            Ok(cfg) => {
                warn!(path = %self.path.display(), "ignoring non-positive timeout in config");
                Config {
                    timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
                    ..cfg
                }
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)?;
        info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}
