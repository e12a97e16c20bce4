use crate::error::{EnvDeckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration for envdeck, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvDeckConfig {
    /// Where the environment and document collections live.
    /// `None` means the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Log level for the CLI (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for EnvDeckConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl EnvDeckConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(EnvDeckError::Io)?;
        let config: EnvDeckConfig =
            serde_json::from_str(&content).map_err(EnvDeckError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(EnvDeckError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(EnvDeckError::Serialization)?;
        fs::write(config_path, content).map_err(EnvDeckError::Io)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["data-dir", "log-level"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data-dir" => Some(
                self.data_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "log-level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    /// Set a key from its string form. An empty `data-dir` resets it.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "data-dir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            "log-level" => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(format!(
                        "Invalid log level: {} (expected one of {})",
                        value,
                        LOG_LEVELS.join(", ")
                    ));
                }
                self.log_level = level;
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}
