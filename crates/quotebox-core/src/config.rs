use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from a TOML file; a missing file means defaults.
/// Priority: CLI > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub limits: LimitConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from default location, defaults if it doesn't exist
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> crate::Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            config.limits.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// `<config_dir>/quotebox/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("quotebox");

        Ok(config_dir.join("config.toml"))
    }

    /// Database location: configured path, else `<data_dir>/quotebox/quotebox.db`
    pub fn db_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.storage.db_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("quotebox");

        Ok(data_dir.join("quotebox.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the quote API, `/quotes/` is appended
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request timeout. Unset means wait as long as it takes.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "https://zenquotes.io/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Quotes allowed per window
    #[serde(default = "default_max_quotes")]
    pub max_quotes: usize,

    /// Rolling window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
}

fn default_max_quotes() -> usize {
    4
}

fn default_window_ms() -> i64 {
    3_600_000 // one hour
}

impl LimitConfig {
    /// A window of zero or less would let every timestamp expire at once
    pub fn validate(&self) -> crate::Result<()> {
        if self.window_ms <= 0 {
            return Err(crate::Error::ConfigError(format!(
                "limits.window_ms must be positive, got {}",
                self.window_ms
            )));
        }
        Ok(())
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_quotes: default_max_quotes(),
            window_ms: default_window_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}
