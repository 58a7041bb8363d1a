//! Application configuration
//!
//! Layered with the `config` crate, later sources win:
//! 1. Built-in defaults
//! 2. `ko-drink.{toml,json,yaml}` in the user config dir, then in the working dir
//!    (or one explicit file)
//! 3. `KOREANSOOL__SECTION__KEY` environment variables
//! 4. Legacy `KOREANSOOL_API_BASE_URL`

#![allow(clippy::uninlined_format_args)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::DEFAULT_LIMIT;

const CONFIG_FILE_STEM: &str = "ko-drink";
const ENV_PREFIX: &str = "KOREANSOOL";
const ENV_SEPARATOR: &str = "__";
const LEGACY_BASE_URL_VAR: &str = "KOREANSOOL_API_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream archive connection
    pub upstream: UpstreamConfig,

    /// Page/limit normalisation for list queries
    pub pagination: PaginationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Upstream archive (koreansool.kr) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL the PHP endpoints hang off
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    pub user_agent: String,

    pub accept_language: String,

    /// Rate limit towards the archive (governor quota)
    pub max_requests_per_second: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://koreansool.kr/ktw/php".to_string(),
            timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            accept_language: "ko-KR,ko;q=0.9".to_string(),
            max_requests_per_second: 5,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit used when the query carries none
    pub default_limit: u32,

    /// Upper bound for a requested limit
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: 100,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr; stdout carries command output)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            module_filters: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from the default locations and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(None, None)
    }

    /// Load with one explicit config file instead of the default locations
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::build(Some(path), None)
    }

    /// `env` replaces the process environment when given
    fn build(file: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        match file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                if let Some(user_dir) = dirs::config_dir() {
                    let user_file = user_dir.join(CONFIG_FILE_STEM).join(CONFIG_FILE_STEM);
                    builder = builder.add_source(config::File::from(user_file).required(false));
                }
                builder = builder.add_source(config::File::with_name(CONFIG_FILE_STEM).required(false));
            }
        }

        let legacy_base_url = match &env {
            Some(vars) => vars.get(LEGACY_BASE_URL_VAR).cloned(),
            None => std::env::var(LEGACY_BASE_URL_VAR).ok(),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

        if let Some(base_url) = legacy_base_url.filter(|url| !url.trim().is_empty()) {
            builder = builder.set_override("upstream.base_url", base_url)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "upstream.base_url must not be empty".to_string(),
            });
        }

        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "upstream.timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.upstream.max_requests_per_second == 0 {
            return Err(ConfigError::Validation {
                message: "upstream.max_requests_per_second must be greater than 0".to_string(),
            });
        }

        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            return Err(ConfigError::Validation {
                message: "pagination limits must be greater than 0".to_string(),
            });
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::Validation {
                message: format!(
                    "pagination.default_limit {} exceeds max_limit {}",
                    self.pagination.default_limit, self.pagination.max_limit
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upstream.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[upstream]\nbase_url = \"http://mirror.local/php\"\ntimeout_seconds = 12\n\n[pagination]\ndefault_limit = 20"
        )
        .unwrap();

        let config = AppConfig::build(Some(file.path()), env(&[("KOREANSOOL__UPSTREAM__TIMEOUT_SECONDS", "7")])).unwrap();

        assert_eq!(config.upstream.base_url, "http://mirror.local/php");
        assert_eq!(config.upstream.timeout_seconds, 7);
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
    }

    #[test]
    fn test_legacy_base_url_variable() {
        let config = AppConfig::build(None, env(&[("KOREANSOOL_API_BASE_URL", "http://legacy.local/php")])).unwrap();

        assert_eq!(config.upstream.base_url, "http://legacy.local/php");
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        let mut config = AppConfig::default();
        config.pagination.default_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        let mut config = AppConfig::default();
        config.pagination.default_limit = 500;
        assert!(config.validate().is_err());
    }
}
