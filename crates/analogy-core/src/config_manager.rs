use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upper bound accepted for `service.max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Main configuration for the analogy form
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalogyConfig {
    /// Analogy service connection settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how to reach the analogy service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Base URL serving `/generate_analogy` and `/submit_feedback`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for generation requests that fail in transport (feedback is never retried)
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    120
} // the generation pipeline runs three LLM agents in sequence
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration manager with layered sources
pub struct ConfigManager {
    config: AnalogyConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (.analogy.toml)
    /// 3. Sensible defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_dotenv();

        let (config, config_path) = Self::load_config_file()?;
        let config = Self::apply_env_overrides(config);
        Self::validate_config(&config)?;

        info!("Configuration loaded");
        match &config_path {
            Some(path) => info!("   config file: {}", path.display()),
            None => info!("   config file: NONE (using defaults)"),
        }
        info!("   service: {}", config.service.base_url);

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load a specific config file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let config = Self::apply_env_overrides(Self::read_toml_file(path)?);
        Self::validate_config(&config)?;

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Load .env file if it exists
    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".analogy.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .analogy.env: {}", e);
                }
            }
        }
    }

    /// Find and load config file
    /// Search order:
    /// 1. ./.analogy.toml (current directory)
    /// 2. ~/.analogy/config.toml (user config)
    /// 3. Use defaults
    fn load_config_file() -> Result<(AnalogyConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".analogy.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                let config = Self::read_toml_file(&user_config)?;
                return Ok((config, Some(user_config)));
            }
        }

        Ok((AnalogyConfig::default(), None))
    }

    /// `~/.analogy/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".analogy").join("config.toml"))
    }

    fn read_toml_file(path: &Path) -> Result<AnalogyConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: AnalogyConfig) -> AnalogyConfig {
        if let Ok(url) = std::env::var("ANALOGY_SERVICE_URL") {
            config.service.base_url = url;
        }
        if let Ok(timeout) = std::env::var("ANALOGY_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.service.timeout_secs = secs,
                Err(_) => warn!("Ignoring ANALOGY_TIMEOUT_SECS={}: not a number", timeout),
            }
        }
        if let Ok(retries) = std::env::var("ANALOGY_MAX_RETRIES") {
            match retries.parse() {
                Ok(n) => config.service.max_retries = n,
                Err(_) => warn!("Ignoring ANALOGY_MAX_RETRIES={}: not a number", retries),
            }
        }

        // RUST_LOG is not folded in here: it carries full filter directives
        // and goes straight to the subscriber's filter.
        if let Ok(format) = std::env::var("ANALOGY_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    /// Validate configuration
    pub fn validate_config(config: &AnalogyConfig) -> Result<(), ConfigError> {
        let url = config.service.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Service base_url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid service base_url: {}. Must start with http:// or https://",
                url
            )));
        }

        if config.service.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Service timeout_secs must be greater than 0".to_string(),
            ));
        }

        if config.service.max_retries > MAX_RETRIES_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "Service max_retries must be at most {}",
                MAX_RETRIES_LIMIT
            )));
        }

        match config.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    other
                )))
            }
        }

        match config.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, compact, json",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &AnalogyConfig {
        &self.config
    }

    /// Get the path to the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = AnalogyConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}
