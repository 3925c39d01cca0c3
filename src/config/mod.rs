//! Configuration management.
//!
//! Configuration is assembled once at startup into an [`EphemeralConfig`] and
//! passed by reference to everything that needs it. Sources, lowest priority
//! first:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file (`~/.config/ephemeral/config.toml` or `--config`)
//! 3. Environment variables (a `.env` file is loaded into the environment by
//!    the binary before this runs)
//!
//! API credentials are read from the environment only, never from the file.
//!
//! ```toml
//! max_tweet_age = "720h"
//! whitelist = [1234567890, "987654321"]
//!
//! [http]
//! timeout_ms = 30000
//!
//! [logging]
//! format = "json"
//! ```

mod duration;

pub use duration::{DurationParseError, format_duration, parse_duration};

use crate::sweep::ExemptionSet;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the OAuth consumer key.
pub const CONSUMER_KEY_ENV: &str = "TWITTER_CONSUMER_KEY";
/// Environment variable holding the OAuth consumer secret.
pub const CONSUMER_SECRET_ENV: &str = "TWITTER_CONSUMER_SECRET";
/// Environment variable holding the OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "TWITTER_ACCESS_TOKEN";
/// Environment variable holding the OAuth access token secret.
pub const ACCESS_TOKEN_SECRET_ENV: &str = "TWITTER_ACCESS_TOKEN_SECRET";
/// Environment variable holding the maximum tweet age (e.g. `720h`).
pub const MAX_TWEET_AGE_ENV: &str = "MAX_TWEET_AGE";
/// Environment variable holding colon-separated whitelisted tweet ids.
pub const WHITELIST_ENV: &str = "WHITELIST";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

/// Fatal configuration problems, detected before any API call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {name}")]
    MissingVar {
        /// Variable name.
        name: &'static str,
    },

    /// The maximum tweet age could not be parsed.
    #[error("cannot parse max tweet age '{value}': {reason}")]
    InvalidDuration {
        /// The raw value.
        value: String,
        /// Why it was rejected.
        #[source]
        reason: DurationParseError,
    },

    /// An optional setting had an unusable value.
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// The raw value.
        value: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("cannot load config file {}: {cause}", path.display())]
    File {
        /// Path to the file.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },
}

/// OAuth 1.0a credentials for the Twitter API.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Consumer (application) key.
    pub consumer_key: SecretString,
    /// Consumer (application) secret.
    pub consumer_secret: SecretString,
    /// User access token.
    pub access_token: SecretString,
    /// User access token secret.
    pub access_token_secret: SecretString,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// Logging settings as they appear in the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directive, e.g. `ephemeral=debug`.
    pub filter: Option<String>,
}

/// Main configuration for ephemeral.
#[derive(Debug, Clone)]
pub struct EphemeralConfig {
    /// API credentials.
    pub credentials: Credentials,
    /// Tweets strictly older than this are deleted.
    pub max_tweet_age: Duration,
    /// Tweet ids that are never deleted.
    pub whitelist: ExemptionSet,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Maximum tweet age.
    pub max_tweet_age: Option<String>,
    /// Whitelisted tweet ids.
    pub whitelist: Option<ConfigFileWhitelist>,
    /// HTTP section.
    pub http: Option<ConfigFileHttp>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Whitelist in the config file: an array of ids or a colon-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConfigFileWhitelist {
    /// `whitelist = [123, "456"]`
    List(Vec<ConfigFileTweetId>),
    /// `whitelist = "123:456"`
    Joined(String),
}

/// A single whitelisted id, written as a TOML integer or string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConfigFileTweetId {
    /// Integer form.
    Number(i64),
    /// String form.
    Text(String),
}

/// HTTP section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileHttp {
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

impl ConfigFile {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::File {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })
    }

    /// Returns the default config file location, if a home directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("ephemeral").join("config.toml"))
    }
}

impl EphemeralConfig {
    /// Builds configuration from the process environment alone.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(ConfigFile::default(), |name| std::env::var(name).ok())
    }

    /// Loads configuration from an optional file plus the environment.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable, a required
    /// variable is missing, or a value cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigFile::load(path)?,
            None => match ConfigFile::default_path() {
                Some(default) if default.exists() => ConfigFile::load(&default)?,
                _ => ConfigFile::default(),
            },
        };
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Builds configuration from a parsed file and a variable lookup.
    ///
    /// Empty variables are treated as unset. Environment values take
    /// precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required value is missing or invalid.
    pub fn from_sources<F>(file: ConfigFile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let require = |name: &'static str| var(name).ok_or(ConfigError::MissingVar { name });

        let credentials = Credentials {
            consumer_key: SecretString::from(require(CONSUMER_KEY_ENV)?),
            consumer_secret: SecretString::from(require(CONSUMER_SECRET_ENV)?),
            access_token: SecretString::from(require(ACCESS_TOKEN_ENV)?),
            access_token_secret: SecretString::from(require(ACCESS_TOKEN_SECRET_ENV)?),
        };

        let raw_age = var(MAX_TWEET_AGE_ENV)
            .or(file.max_tweet_age)
            .ok_or(ConfigError::MissingVar {
                name: MAX_TWEET_AGE_ENV,
            })?;
        let max_tweet_age =
            parse_duration(&raw_age).map_err(|reason| ConfigError::InvalidDuration {
                value: raw_age.clone(),
                reason,
            })?;

        let whitelist = match (var(WHITELIST_ENV), file.whitelist) {
            (Some(joined), _) | (None, Some(ConfigFileWhitelist::Joined(joined))) => {
                ExemptionSet::parse(&joined)
            },
            (None, Some(ConfigFileWhitelist::List(ids))) => {
                ExemptionSet::from_ids(ids.into_iter().map(|id| match id {
                    ConfigFileTweetId::Number(n) => n.to_string(),
                    ConfigFileTweetId::Text(s) => s,
                }))
            },
            (None, None) => ExemptionSet::default(),
        };

        let mut http = HttpConfig::default();
        if let Some(section) = file.http {
            if let Some(base_url) = section.base_url {
                http.base_url = base_url;
            }
            if let Some(timeout_ms) = section.timeout_ms {
                http.timeout_ms = timeout_ms;
            }
            if let Some(connect_timeout_ms) = section.connect_timeout_ms {
                http.connect_timeout_ms = connect_timeout_ms;
            }
        }
        if let Some(base_url) = var("EPHEMERAL_API_BASE_URL") {
            http.base_url = base_url;
        }
        if let Some(v) = var("EPHEMERAL_HTTP_TIMEOUT_MS") {
            http.timeout_ms = parse_millis("EPHEMERAL_HTTP_TIMEOUT_MS", v)?;
        }
        if let Some(v) = var("EPHEMERAL_HTTP_CONNECT_TIMEOUT_MS") {
            http.connect_timeout_ms = parse_millis("EPHEMERAL_HTTP_CONNECT_TIMEOUT_MS", v)?;
        }
        http.base_url = http.base_url.trim_end_matches('/').to_string();

        let mut logging = file.logging.unwrap_or_default();
        if let Some(format) = var("EPHEMERAL_LOG_FORMAT") {
            logging.format = Some(format);
        }
        if let Some(path) = var("EPHEMERAL_LOG_FILE") {
            logging.file = Some(PathBuf::from(path));
        }

        Ok(Self {
            credentials,
            max_tweet_age,
            whitelist,
            http,
            logging,
        })
    }

    /// Describes the effective configuration with credentials redacted.
    #[must_use]
    pub fn redacted_summary(&self) -> Vec<(&'static str, String)> {
        const REDACTED: &str = "***REDACTED***";
        let whitelist = if self.whitelist.is_empty() {
            "(none)".to_string()
        } else {
            self.whitelist.sorted_ids().join(", ")
        };
        vec![
            (CONSUMER_KEY_ENV, REDACTED.to_string()),
            (CONSUMER_SECRET_ENV, REDACTED.to_string()),
            (ACCESS_TOKEN_ENV, REDACTED.to_string()),
            (ACCESS_TOKEN_SECRET_ENV, REDACTED.to_string()),
            ("max_tweet_age", format_duration(self.max_tweet_age)),
            ("whitelist", whitelist),
            ("http.base_url", self.http.base_url.clone()),
            ("http.timeout_ms", self.http.timeout_ms.to_string()),
            (
                "http.connect_timeout_ms",
                self.http.connect_timeout_ms.to_string(),
            ),
        ]
    }
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
