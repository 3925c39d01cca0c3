//! Retention sweep.
//!
//! One sweep fetches the newest page of the timeline and deletes every tweet
//! that is older than the age threshold and not whitelisted.
//!
//! # Overview
//!
//! Each tweet is handled independently:
//!
//! - `created_at` does not parse: a [`SweepError::TimeParse`] is recorded
//! - older than the threshold and not whitelisted: the tweet is deleted, and a
//!   failed delete records a [`SweepError::Delete`]
//! - otherwise the tweet is left alone
//!
//! Per-tweet failures never stop the pass. Only a failed timeline fetch
//! aborts it.
//!
//! # Example
//!
//! ```rust,ignore
//! use ephemeral::{ExemptionSet, RetentionSweeper, TwitterClient};
//! use std::time::Duration;
//!
//! let whitelist = ExemptionSet::parse("1050118621198921728");
//! let sweeper = RetentionSweeper::new(&client, &whitelist);
//!
//! // Dry run to see what would be deleted
//! let result = sweeper.with_dry_run(true).sweep(Duration::from_secs(30 * 86_400))?;
//! println!("{}", result.summary());
//! ```

mod errors;
mod exemption;
mod run;

pub use errors::{SweepError, SweepErrors};
pub use exemption::ExemptionSet;
pub use run::{InvocationResponse, RunOutcome, STATUS_OK, run_once};

use crate::twitter::{TimelineClient, Tweet};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Number of tweets requested per sweep. The v1.1 API caps a page at 200.
pub const TIMELINE_PAGE_SIZE: u32 = 200;

/// Safely converts Duration to milliseconds as u64, capping at `u64::MAX`.
#[inline]
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Outcome of one sweep pass.
#[derive(Debug, Default)]
pub struct SweepResult {
    /// Tweets examined.
    pub checked: usize,

    /// Tweets deleted (or, in a dry run, that would have been deleted).
    pub deleted: usize,

    /// Old enough to delete but kept because they are whitelisted.
    pub whitelisted: usize,

    /// Per-tweet failures, in timeline order.
    pub errors: Vec<SweepError>,

    /// Whether this was a dry run (no delete calls made).
    pub dry_run: bool,

    /// Duration of the pass in milliseconds.
    pub duration_ms: u64,
}

impl SweepResult {
    /// Returns `true` if any per-tweet failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns a one-line summary such as `Deleted 3 tweets.`
    #[must_use]
    pub fn summary(&self) -> String {
        let action = if self.dry_run {
            "Would delete"
        } else {
            "Deleted"
        };
        format!("{action} {} tweets.", self.deleted)
    }

    /// Splits the result into the deletion count and the combined failure.
    #[must_use]
    pub fn into_parts(self) -> (usize, Option<SweepErrors>) {
        (self.deleted, SweepErrors::from_vec(self.errors))
    }
}

/// Deletes old tweets from the authenticated user's timeline.
pub struct RetentionSweeper<'a, C: TimelineClient + ?Sized> {
    /// Remote timeline.
    client: &'a C,

    /// Ids that are never deleted.
    whitelist: &'a ExemptionSet,

    /// Report eligible tweets without deleting them.
    dry_run: bool,
}

impl<'a, C: TimelineClient + ?Sized> RetentionSweeper<'a, C> {
    /// Creates a sweeper over `client` that never touches `whitelist`ed ids.
    #[must_use]
    pub const fn new(client: &'a C, whitelist: &'a ExemptionSet) -> Self {
        Self {
            client,
            whitelist,
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fetches the newest [`TIMELINE_PAGE_SIZE`] tweets, retweets included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] wrapping the client failure.
    pub fn fetch_recent_tweets(&self) -> Result<Vec<Tweet>> {
        self.client
            .user_timeline(TIMELINE_PAGE_SIZE, true)
            .map_err(Error::fetch)
    }

    /// Returns `true` if the tweet id is whitelisted.
    #[must_use]
    pub fn is_exempt(&self, id: i64) -> bool {
        self.whitelist.contains(id)
    }

    /// Runs one pass, measuring tweet ages against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the timeline cannot be retrieved. Per-tweet
    /// failures are collected in [`SweepResult::errors`] instead.
    #[instrument(
        name = "ephemeral.sweep",
        skip(self),
        fields(
            component = "sweep",
            dry_run = self.dry_run,
            max_age_secs = max_age.as_secs()
        )
    )]
    pub fn sweep(&self, max_age: Duration) -> Result<SweepResult> {
        self.sweep_at(max_age, Utc::now())
    }

    /// Runs one pass, measuring tweet ages against `now`.
    ///
    /// `now` is sampled once by the caller so that every tweet in the pass
    /// is judged against the same instant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] if the timeline cannot be retrieved.
    pub fn sweep_at(&self, max_age: Duration, now: DateTime<Utc>) -> Result<SweepResult> {
        let start = Instant::now();
        let timeline = self.fetch_recent_tweets()?;

        let mut result = SweepResult {
            dry_run: self.dry_run,
            ..Default::default()
        };

        for tweet in &timeline {
            self.process_tweet(tweet, max_age, now, &mut result);
        }

        result.duration_ms = duration_to_millis(start.elapsed());

        debug!(
            checked = result.checked,
            deleted = result.deleted,
            whitelisted = result.whitelisted,
            errors = result.errors.len(),
            duration_ms = result.duration_ms,
            "Sweep completed"
        );

        Ok(result)
    }

    /// Evaluates a single tweet.
    fn process_tweet(
        &self,
        tweet: &Tweet,
        max_age: Duration,
        now: DateTime<Utc>,
        result: &mut SweepResult,
    ) {
        result.checked += 1;

        let created = match tweet.created_at_time() {
            Ok(created) => created,
            Err(cause) => {
                result
                    .errors
                    .push(SweepError::TimeParse { id: tweet.id, cause });
                return;
            },
        };

        // Tweets stamped in the future have age zero
        let age = (now - created).to_std().unwrap_or(Duration::ZERO);
        if age <= max_age {
            return;
        }
        if self.is_exempt(tweet.id) {
            result.whitelisted += 1;
            return;
        }

        if self.dry_run {
            result.deleted += 1;
            info!(
                tweet_id = tweet.id,
                created_at = %created,
                text = %tweet.text,
                "Would delete tweet"
            );
            return;
        }

        let Err(cause) = self.client.delete_tweet(tweet.id) else {
            result.deleted += 1;
            info!(
                tweet_id = tweet.id,
                created_at = %created,
                text = %tweet.text,
                "Deleted tweet"
            );
            return;
        };

        result.errors.push(SweepError::Delete {
            id: tweet.id,
            cause: Box::new(cause),
        });
    }
}
