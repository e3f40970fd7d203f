use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// location = "Colombo"
/// display_name = "Colombo, Sri Lanka"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// WeatherAPI.com key; nothing can be fetched without it.
    pub api_key: Option<String>,

    /// Query sent as `q`, e.g. a city name or "lat,lon".
    #[serde(default = "default_location")]
    pub location: String,

    /// Heading shown on screen instead of the raw location query.
    pub display_name: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_slide_duration_ms")]
    pub slide_duration_ms: u64,
}

fn default_location() -> String {
    "Colombo".to_string()
}

fn default_display_name() -> String {
    "Colombo, Sri Lanka".to_string()
}

fn default_base_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

const fn default_slide_duration_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            location: default_location(),
            display_name: Some(default_display_name()),
            base_url: default_base_url(),
            slide_duration_ms: default_slide_duration_ms(),
        }
    }
}

impl Config {
    /// Returns the API key or a hint on how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No WeatherAPI key configured.\n\
                 Hint: run `skyview configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Switch to another location. The old display name would now be wrong, so it is cleared.
    pub fn set_location(&mut self, location: String) {
        if location != self.location {
            self.display_name = None;
        }
        self.location = location;
    }

    pub fn heading(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.location)
    }

    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms)
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // The default heading only fits the default location.
        if cfg.display_name.is_none() && cfg.location == default_location() {
            cfg.display_name = Some(default_display_name());
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyview", "skyview")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
