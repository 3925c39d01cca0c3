//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config file provides one.
const DEFAULT_FILTER: &str = "ephemeral=info";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "ephemeral=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from config file settings.
    ///
    /// `--verbose` wins over everything, then `RUST_LOG`, then the file's
    /// `filter`, then the default.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();
        let file = settings.and_then(|s| s.file.clone());
        let configured = settings.and_then(|s| s.filter.as_deref());

        let filter = if verbose {
            EnvFilter::new(VERBOSE_FILTER)
        } else {
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        };

        Self {
            format,
            file,
            filter,
        }
    }
}
