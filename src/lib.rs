//! # Ephemeral
//!
//! Deletes tweets older than a configured age.
//!
//! Ephemeral fetches the most recent page of the authenticated account's
//! timeline, deletes every tweet older than `MAX_TWEET_AGE` whose id is not
//! whitelisted, and reports how many were removed. It is meant to be run
//! periodically by an external scheduler (cron, a serverless timer, a CI job).
//!
//! ## Example
//!
//! ```rust,ignore
//! use ephemeral::{EphemeralConfig, TwitterClient, sweep};
//!
//! let config = EphemeralConfig::from_env()?;
//! let client = TwitterClient::from_config(&config);
//! let outcome = sweep::run_once(&config, &client, false);
//! println!("{}", outcome.response.message);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod observability;
pub mod sweep;
pub mod twitter;

// Re-exports for convenience
pub use config::{ConfigError, EphemeralConfig};
pub use sweep::{
    ExemptionSet, InvocationResponse, RetentionSweeper, SweepError, SweepErrors, SweepResult,
};
pub use twitter::{TimelineClient, Tweet, TwitterClient};

/// Error type for ephemeral operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Config` | Required environment variable missing, unparsable duration |
/// | `Fetch` | The timeline could not be retrieved |
/// | `Sweep` | One or more tweets could not be parsed or deleted |
/// | `Http` | Transport failure talking to the API |
/// | `Api` | The API answered with a non-success status |
/// | `Json` | A response body did not match the expected shape |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration is missing or invalid. Fatal before any API call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The timeline could not be fetched. Fatal to the sweep.
    #[error("could not get timeline: {cause}")]
    Fetch {
        /// The underlying failure.
        cause: Box<Self>,
    },

    /// Per-tweet failures collected during a sweep.
    #[error(transparent)]
    Sweep(#[from] SweepErrors),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("api returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// A response could not be decoded.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Wraps an error as a timeline fetch failure.
    #[must_use]
    pub fn fetch(cause: Self) -> Self {
        Self::Fetch {
            cause: Box::new(cause),
        }
    }
}

/// Result type alias for ephemeral operations.
pub type Result<T> = std::result::Result<T, Error>;
