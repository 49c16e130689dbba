use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::locale::{DEFAULT_LOCALE, Locale};

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Per-request timeout applied by the gateway.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const ENV_API_BASE_URL: &str = "UNICMS_API_BASE_URL";
const ENV_TIMEOUT_MS: &str = "UNICMS_TIMEOUT_MS";
const ENV_STORAGE_PATH: &str = "UNICMS_STORAGE_PATH";
const ENV_LOG_LEVEL: &str = "UNICMS_LOG_LEVEL";
const ENV_LOCALE: &str = "UNICMS_LOCALE";

/// Errors raised while resolving a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is neither YAML nor JSON.
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,

    /// The file contents did not parse.
    #[error("failed to parse configuration file: {0}")]
    Parse(String),

    /// A resolved value failed validation.
    #[error("Invalid {field} value: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Values supplied on the command line; they win over files and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--api-base`.
    pub api_base_url: Option<String>,
    /// `--storage`.
    pub storage_path: Option<PathBuf>,
    /// `--locale`.
    pub locale: Option<Locale>,
}

/// Configuration for the UniCMS client core.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base address of the CMS backend
    pub api_base_url: Url,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Location of the durable session storage file
    pub storage_path: Option<PathBuf>,

    /// Logging level
    pub log_level: String,

    /// Ambient locale used when a path carries none
    pub default_locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    ///
    /// # Panics
    /// Never: the default base URL is a valid constant.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_path: None,
            log_level: "info".to_string(),
            default_locale: DEFAULT_LOCALE,
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Precedence, highest first: `overrides`, the configuration file,
    /// `UNICMS_*` environment variables, built-in defaults. Environment
    /// variables only fill values the file left at their defaults.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the resolved values fail validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => defaults.clone(),
        };

        if config.api_base_url == defaults.api_base_url {
            if let Ok(value) = env::var(ENV_API_BASE_URL) {
                config.api_base_url = parse_base_url(&value)?;
            }
        }
        if config.timeout_ms == defaults.timeout_ms {
            if let Ok(value) = env::var(ENV_TIMEOUT_MS) {
                config.timeout_ms = value.parse().map_err(|_| ConfigError::Invalid {
                    field: ENV_TIMEOUT_MS,
                    message: "must be a whole number of milliseconds".to_string(),
                })?;
            }
        }
        if config.storage_path.is_none() {
            if let Ok(value) = env::var(ENV_STORAGE_PATH) {
                config.storage_path = Some(PathBuf::from(value));
            }
        }
        if config.log_level == defaults.log_level {
            if let Ok(value) = env::var(ENV_LOG_LEVEL) {
                config.log_level = value;
            }
        }
        if config.default_locale == defaults.default_locale {
            if let Ok(value) = env::var(ENV_LOCALE) {
                config.default_locale = value.parse().map_err(|err| ConfigError::Invalid {
                    field: ENV_LOCALE,
                    message: format!("{err}"),
                })?;
            }
        }

        if let Some(url) = overrides.api_base_url {
            config.api_base_url = parse_base_url(&url)?;
        }
        if let Some(path) = overrides.storage_path {
            config.storage_path = Some(path);
        }
        if let Some(locale) = overrides.locale {
            config.default_locale = locale;
        }

        config.validate()?;
        debug!(
            api_base_url = %config.api_base_url,
            timeout_ms = config.timeout_ms,
            "configuration resolved"
        );
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        debug!(path = %path.display(), "loading configuration file");
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        match extension.as_deref() {
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat),
        }
    }

    /// Validate the resolved configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a non-HTTP base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                message: format!("unsupported scheme `{}`", self.api_base_url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// The storage file to use, falling back to the per-user config directory.
    #[cfg(not(target_arch = "wasm32"))]
    #[must_use]
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_storage_path)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|err| ConfigError::Invalid {
        field: ENV_API_BASE_URL,
        message: err.to_string(),
    })
}

/// Default location of the durable session file.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn default_storage_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("unicms").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./unicms-session.json"))
}
