// Configuration loading and parsing (config/sentinel.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name shared by `defaults/` and `config/`.
pub const CONFIG_FILE: &str = "sentinel.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error(
        "no config at {} and no defaults at {} to create it from",
        target.display(),
        defaults.display()
    )]
    NoConfig { target: PathBuf, defaults: PathBuf },

    #[error("failed to create {} from defaults: {source}", path.display())]
    InitFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Every section is optional in the file; missing sections and keys fall
/// back to the values the hosted product shipped with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the polling ("courtroom") debate backend.
    pub courtroom_url: String,
    /// Base URL of the debate-room and chatbot backend.
    pub arena_url: String,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            courtroom_url: "https://techfest-backend-4334b5c7ec3d.herokuapp.com".to_string(),
            arena_url: "http://localhost:5003".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub first_poll_delay_ms: u64,
    pub poll_retry_delay_ms: u64,
    pub debate_duration_secs: u32,
    pub countdown_tick_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            first_poll_delay_ms: 2000,
            poll_retry_delay_ms: 3000,
            debate_duration_secs: 300,
            countdown_tick_ms: 1000,
        }
    }
}

impl TimingConfig {
    pub fn first_poll_delay(&self) -> Duration {
        Duration::from_millis(self.first_poll_delay_ms)
    }

    pub fn poll_retry_delay(&self) -> Duration {
        Duration::from_millis(self.poll_retry_delay_ms)
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "sentinel=info,warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/sentinel.toml` relative to `base_dir`.
///
/// Does not create the file; see [`ensure_config_file`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|source| ConfigError::ParseError {
        path: path.clone(),
        source,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse config text without touching the filesystem.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Create `config/sentinel.toml` from `defaults/sentinel.toml` on first run.
///
/// Returns the path written, or `None` when a config already exists. An
/// existing config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }
    let defaults = base_dir.join("defaults").join(CONFIG_FILE);
    if !defaults.is_file() {
        return Err(ConfigError::NoConfig { target, defaults });
    }

    let init_failed = |source| ConfigError::InitFailed {
        path: target.clone(),
        source,
    };
    let text = std::fs::read(&defaults).map_err(init_failed)?;
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(init_failed)?;
    }
    // create_new: another process may have written it since the check above.
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut file) => {
            std::io::Write::write_all(&mut file, &text).map_err(init_failed)?;
            tracing::info!("Created {} from defaults", target.display());
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(init_failed(e)),
    }
}

/// Load `config/sentinel.toml` from the working directory, creating it from
/// the shipped defaults on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let urls = [
        ("gateway.courtroom_url", &config.gateway.courtroom_url),
        ("gateway.arena_url", &config.gateway.arena_url),
    ];
    for (field, url) in urls {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: format!("must be an http:// or https:// URL, got {url:?}"),
            });
        }
    }

    let positive: &[(&str, u64)] = &[
        (
            "gateway.request_timeout_secs",
            config.gateway.request_timeout_secs,
        ),
        ("timing.countdown_tick_ms", config.timing.countdown_tick_ms),
        (
            "timing.debate_duration_secs",
            u64::from(config.timing.debate_duration_secs),
        ),
    ];
    for (field, val) in positive {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
