/// Application configuration management
/// Stores user preferences in <config_dir>/pulsetop/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::constants::{DEFAULT_REFRESH_MS, MIN_REFRESH_MS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Display refresh rate; the collector ticks at 4/5 of it
    pub refresh_ms: u64,
    /// Cap on concurrent per-subject fetches per tick
    pub max_concurrency: Option<usize>,
    /// Include stopped containers in the container dashboard
    pub all_containers: bool,
    pub log_file: Option<PathBuf>,
    pub log_filter: Option<String>,
    pub theme: ThemeConfig,
}

/// Color names as understood by ratatui (`cyan`, `lightred`, `#ff8800`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub cursor: String,
    pub kill_cursor: String,
    pub border: String,
    pub active_border: String,
    pub header: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_ms: DEFAULT_REFRESH_MS,
            max_concurrency: None,
            all_containers: false,
            log_file: None,
            log_filter: None,
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cursor: "cyan".to_string(),
            kill_cursor: "magenta".to_string(),
            border: "cyan".to_string(),
            active_border: "white".to_string(),
            header: "yellow".to_string(),
        }
    }
}

impl AppConfig {
    /// Get default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine the user config directory")?
            .join("pulsetop");
        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location.
    /// A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`, or the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, contents)
            .context("Failed to write config file")?;

        Ok(path)
    }

    /// Refresh rate, never below the supported minimum
    pub fn refresh_rate(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(MIN_REFRESH_MS))
    }
}
