//! Configuration management.
//!
//! Configuration is read from `~/.config/feedwatch/config.toml` at
//! startup. If the file doesn't exist, a default configuration with
//! comments is created. Missing fields fall back to defaults.
//!
//! The bot token can also be supplied via the `FEEDWATCH_BOT_TOKEN`
//! environment variable, which takes precedence over the file.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub const BOT_TOKEN_ENV: &str = "FEEDWATCH_BOT_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scheduler: SchedulerConfig,
    pub telegram: TelegramConfig,
    /// Override for the state directory (subscribers + dedup cache).
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between cycle starts, in "30s" / "5m" / "1h" / "1d"
    /// form or raw seconds.
    pub interval: String,
    /// Per-request fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Run the first cycle immediately on startup.
    pub run_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: "5m".to_string(),
            fetch_timeout_secs: 10,
            run_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
}

impl Config {
    /// Load configuration from the default path, creating a commented
    /// default file on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Bot token from the environment, falling back to the config
    /// file.
    pub fn bot_token(&self) -> Option<String> {
        std::env::var(BOT_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.telegram.bot_token.clone())
    }

    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedwatch").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r#"# feedwatch configuration

[scheduler]
# Seconds between poll cycles. Accepts "30s", "5m", "1h", "1d",
# or raw seconds.
interval = "5m"

# Per-request fetch timeout in seconds. A timed-out fetch skips the
# source for that cycle only.
fetch_timeout_secs = 10

# Run the first cycle immediately on startup.
run_on_start = true

[telegram]
# Telegram Bot API token. May also be set via the FEEDWATCH_BOT_TOKEN
# environment variable, which takes precedence. Without a token,
# matches are only logged.
# bot_token = "123456:ABC-DEF..."

# Override the state directory (default: platform data dir).
# data_dir = "/var/lib/feedwatch"
"#
        .to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
