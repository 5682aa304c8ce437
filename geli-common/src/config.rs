//! Configuration loading and config file resolution
//!
//! Bootstrap configuration comes from a TOML file located by priority:
//! 1. Command-line argument (highest priority)
//! 2. `GELI_CONFIG` environment variable
//! 3. Per-user config file (`~/.config/geli/config.toml` on Linux)
//! 4. Built-in defaults (fallback)
//!
//! A missing file is not an error: defaults are used and a warning logged.
//! A file that exists but does not parse is a configuration error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, MediaType, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "GELI_CONFIG";

/// Client configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the rating server
    ///
    /// Default: http://127.0.0.1:5000
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Catalog selected at startup
    #[serde(default)]
    pub media: MediaType,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// UI timing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Quiet period after the last keystroke before a search is sent
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// How long a toast stays visible
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Delay between a successful removal and the view reload
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_search_debounce_ms() -> u64 {
    350
}

fn default_toast_duration_ms() -> u64 {
    3000
}

fn default_reload_delay_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            media: MediaType::default(),
            request_timeout_ms: default_request_timeout_ms(),
            timing: TimingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            toast_duration_ms: default_toast_duration_ms(),
            reload_delay_ms: default_reload_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl TimingConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}

impl TomlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Apply command-line / environment overrides on top of file values
    pub fn with_overrides(mut self, server_url: Option<String>, media: Option<MediaType>) -> Self {
        if let Some(url) = server_url {
            self.server_url = url;
        }
        if let Some(media) = media {
            self.media = media;
        }
        self
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "server_url must be an http(s) URL: {}",
                self.server_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::Config(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.timing.toast_duration_ms == 0 {
            return Err(Error::Config(
                "timing.toast_duration_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when neither the argument nor the environment names a file
/// and no per-user file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    user_config_path().filter(|p| p.exists())
}

/// Platform config location: `<config_dir>/geli/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("geli").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Resolve and load configuration, falling back to defaults
pub fn load_or_default(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    // Priority 4: Built-in defaults
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_config(&path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
