//! One scheduled invocation: sweep, summarize, respond.

use super::RetentionSweeper;
use crate::config::EphemeralConfig;
use crate::twitter::TimelineClient;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Status code reported once a sweep has run.
pub const STATUS_OK: &str = "200";

/// Response handed back to whatever triggered the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    /// Status code, as a string.
    #[serde(rename = "StatusCode")]
    pub status_code: String,

    /// Human-readable outcome.
    #[serde(rename = "Body")]
    pub message: String,
}

impl InvocationResponse {
    /// Serializes the response to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything a caller needs after an invocation.
#[derive(Debug)]
pub struct RunOutcome {
    /// The response to report.
    pub response: InvocationResponse,

    /// Tweets deleted (or that would be, in a dry run).
    pub deleted: usize,

    /// Fetch failure or combined per-tweet failures, if any.
    pub error: Option<Error>,
}

impl RunOutcome {
    /// Returns `true` if the pass finished without any failure.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs one sweep with an already validated configuration.
///
/// The summary always states how many tweets were deleted. Failures are
/// appended to it, never substituted for it; a failed fetch reports zero
/// deletions.
pub fn run_once<C: TimelineClient + ?Sized>(
    config: &EphemeralConfig,
    client: &C,
    dry_run: bool,
) -> RunOutcome {
    let sweeper = RetentionSweeper::new(client, &config.whitelist).with_dry_run(dry_run);

    let (summary, deleted, error) = match sweeper.sweep(config.max_tweet_age) {
        Ok(result) => {
            let summary = result.summary();
            let (deleted, errors) = result.into_parts();
            (summary, deleted, errors.map(Error::from))
        },
        Err(err) => {
            let action = if dry_run { "Would delete" } else { "Deleted" };
            (format!("{action} 0 tweets."), 0, Some(err))
        },
    };

    info!(deleted, dry_run, "{summary}");

    let mut message = summary;
    if let Some(ref err) = error {
        let error_message = format!(" Errors occurred: {err}");
        warn!("{error_message}");
        message.push(' ');
        message.push_str(&error_message);
    }

    RunOutcome {
        response: InvocationResponse {
            status_code: STATUS_OK.to_string(),
            message,
        },
        deleted,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{FakeTimeline, created_ago};
    use super::*;
    use crate::config::{Credentials, HttpConfig, LoggingSettings};
    use crate::{ExemptionSet, Tweet};
    use chrono::Utc;
    use secrecy::SecretString;
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn config(whitelist: &str) -> EphemeralConfig {
        EphemeralConfig {
            credentials: Credentials {
                consumer_key: SecretString::from("ck"),
                consumer_secret: SecretString::from("cs"),
                access_token: SecretString::from("at"),
                access_token_secret: SecretString::from("ats"),
            },
            max_tweet_age: 24 * HOUR,
            whitelist: ExemptionSet::parse(whitelist),
            http: HttpConfig::default(),
            logging: LoggingSettings::default(),
        }
    }

    // run_once samples the real clock, so ages are relative to now.
    fn tweet(id: i64, age: Duration) -> Tweet {
        Tweet::new(id, created_ago(Utc::now(), age), format!("tweet {id}"))
    }

    #[test]
    fn test_clean_run() {
        let client = FakeTimeline::new(vec![tweet(42, 48 * HOUR), tweet(43, 48 * HOUR)]);

        let outcome = run_once(&config("42"), &client, false);

        assert!(outcome.is_clean());
        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.response.status_code, "200");
        assert_eq!(outcome.response.message, "Deleted 1 tweets.");
    }

    #[test]
    fn test_errors_are_appended_to_summary() {
        let client = FakeTimeline::new(vec![
            tweet(1, 48 * HOUR),
            Tweet::new(2, "garbage", "bad"),
            tweet(3, 48 * HOUR),
        ])
        .with_failing_deletes([3]);

        let outcome = run_once(&config(""), &client, false);

        assert_eq!(outcome.deleted, 1);
        assert!(matches!(outcome.error, Some(Error::Sweep(ref e)) if e.len() == 2));
        let message = &outcome.response.message;
        assert!(message.starts_with(
            "Deleted 1 tweets.  Errors occurred: could not parse time for 2: "
        ));
        assert!(message.contains("; failed to delete 3: api returned status 403"));
    }

    #[test]
    fn test_fetch_failure_reports_zero() {
        let client = FakeTimeline::new(vec![tweet(1, 48 * HOUR)]).with_failing_fetch();

        let outcome = run_once(&config(""), &client, false);

        assert_eq!(outcome.deleted, 0);
        assert!(matches!(outcome.error, Some(Error::Fetch { .. })));
        assert_eq!(
            outcome.response.message,
            "Deleted 0 tweets.  Errors occurred: could not get timeline: \
             api returned status 503: Over capacity"
        );
        assert!(client.delete_calls.borrow().is_empty());
        assert_eq!(client.fetch_calls.get(), 1);
    }

    #[test]
    fn test_dry_run_summary() {
        let client = FakeTimeline::new(vec![tweet(1, 48 * HOUR)]);

        let outcome = run_once(&config(""), &client, true);

        assert_eq!(outcome.response.message, "Would delete 1 tweets.");
        assert!(client.delete_calls.borrow().is_empty());
    }

    #[test]
    fn test_response_json_shape() {
        let response = InvocationResponse {
            status_code: STATUS_OK.to_string(),
            message: "Deleted 0 tweets.".to_string(),
        };

        let json = response.to_json().expect("serializable");
        assert_eq!(json, r#"{"StatusCode":"200","Body":"Deleted 0 tweets."}"#);
    }
}
