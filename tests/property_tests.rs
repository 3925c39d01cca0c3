//! Property-based tests for the retention sweep.
//!
//! Every generated timeline is swept against a fixed instant with a 24 hour
//! threshold, and the outcome is compared with a straightforward model of
//! which tweets should have been deleted.
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use chrono::{DateTime, TimeDelta, Utc};
use ephemeral::twitter::TWITTER_TIME_FORMAT;
use ephemeral::{Error, ExemptionSet, RetentionSweeper, SweepError, TimelineClient, Tweet};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

const THRESHOLD: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Clone)]
struct TweetCase {
    age_hours: i64,
    malformed: bool,
    whitelisted: bool,
    delete_fails: bool,
}

impl TweetCase {
    fn eligible(&self) -> bool {
        !self.malformed && self.age_hours > 24 && !self.whitelisted
    }
}

fn tweet_case() -> impl Strategy<Value = TweetCase> {
    (0i64..96, prop::bool::weighted(0.1), any::<bool>(), any::<bool>()).prop_map(
        |(age_hours, malformed, whitelisted, delete_fails)| TweetCase {
            age_hours,
            malformed,
            whitelisted,
            delete_fails,
        },
    )
}

struct RecordingTimeline {
    tweets: RefCell<Vec<Tweet>>,
    failing: HashSet<i64>,
    delete_calls: RefCell<Vec<i64>>,
}

impl TimelineClient for RecordingTimeline {
    fn user_timeline(&self, count: u32, _include_retweets: bool) -> ephemeral::Result<Vec<Tweet>> {
        Ok(self
            .tweets
            .borrow()
            .iter()
            .take(count as usize)
            .cloned()
            .collect())
    }

    fn delete_tweet(&self, id: i64) -> ephemeral::Result<()> {
        self.delete_calls.borrow_mut().push(id);
        if self.failing.contains(&id) {
            return Err(Error::Api {
                status: 500,
                body: "Internal error".to_string(),
            });
        }
        self.tweets.borrow_mut().retain(|t| t.id != id);
        Ok(())
    }
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn build(cases: &[TweetCase]) -> (RecordingTimeline, ExemptionSet) {
    let mut tweets = Vec::new();
    let mut failing = HashSet::new();
    let mut whitelisted = Vec::new();

    for (i, case) in cases.iter().enumerate() {
        let id = i64::try_from(i).expect("small index") + 1;
        let created_at = if case.malformed {
            "not a timestamp".to_string()
        } else {
            (now() - TimeDelta::hours(case.age_hours))
                .format(TWITTER_TIME_FORMAT)
                .to_string()
        };
        tweets.push(Tweet::new(id, created_at, format!("tweet {id}")));
        if case.delete_fails {
            failing.insert(id);
        }
        if case.whitelisted {
            whitelisted.push(id.to_string());
        }
    }

    let client = RecordingTimeline {
        tweets: RefCell::new(tweets),
        failing,
        delete_calls: RefCell::new(Vec::new()),
    };
    (client, ExemptionSet::from_ids(whitelisted))
}

proptest! {
    #[test]
    fn prop_sweep_matches_model(cases in prop::collection::vec(tweet_case(), 0..60)) {
        let (client, whitelist) = build(&cases);
        let sweeper = RetentionSweeper::new(&client, &whitelist);

        let result = sweeper.sweep_at(THRESHOLD, now()).expect("fetch never fails here");

        let expected_calls: Vec<i64> = cases
            .iter()
            .enumerate()
            .filter(|(_, s)| s.eligible())
            .map(|(i, _)| i64::try_from(i).expect("small index") + 1)
            .collect();
        let expected_deleted = cases.iter().filter(|s| s.eligible() && !s.delete_fails).count();
        let expected_delete_errors = cases.iter().filter(|s| s.eligible() && s.delete_fails).count();
        let expected_parse_errors = cases.iter().filter(|s| s.malformed).count();

        // Exactly one delete attempt per eligible tweet, in timeline order
        prop_assert_eq!(&*client.delete_calls.borrow(), &expected_calls);
        prop_assert_eq!(result.deleted, expected_deleted);
        prop_assert_eq!(result.checked, cases.len());

        let parse_errors = result
            .errors
            .iter()
            .filter(|e| matches!(e, SweepError::TimeParse { .. }))
            .count();
        let delete_errors = result
            .errors
            .iter()
            .filter(|e| matches!(e, SweepError::Delete { .. }))
            .count();
        prop_assert_eq!(parse_errors, expected_parse_errors);
        prop_assert_eq!(delete_errors, expected_delete_errors);
    }

    #[test]
    fn prop_second_sweep_deletes_nothing_new(cases in prop::collection::vec(tweet_case(), 0..40)) {
        let (client, whitelist) = build(&cases);
        let sweeper = RetentionSweeper::new(&client, &whitelist);

        sweeper.sweep_at(THRESHOLD, now()).expect("first sweep");
        let second = sweeper.sweep_at(THRESHOLD, now()).expect("second sweep");

        // Only tweets whose delete failed the first time are attempted again
        let retried = cases.iter().filter(|s| s.eligible() && s.delete_fails).count();
        prop_assert_eq!(second.deleted, 0);
        prop_assert_eq!(second.errors.len(), retried + cases.iter().filter(|s| s.malformed).count());
    }

    #[test]
    fn prop_whitelisted_never_deleted(cases in prop::collection::vec(tweet_case(), 1..40)) {
        let (client, whitelist) = build(&cases);
        let sweeper = RetentionSweeper::new(&client, &whitelist);

        sweeper.sweep_at(THRESHOLD, now()).expect("sweep");

        for id in client.delete_calls.borrow().iter() {
            prop_assert!(!whitelist.contains(*id));
        }
    }
}

#[test]
fn test_all_failing_deletes_yield_one_error_each() {
    let cases: Vec<TweetCase> = (0..5)
        .map(|_| TweetCase {
            age_hours: 48,
            malformed: false,
            whitelisted: false,
            delete_fails: true,
        })
        .collect();
    let (client, whitelist) = build(&cases);

    let result = RetentionSweeper::new(&client, &whitelist)
        .sweep_at(THRESHOLD, now())
        .expect("sweep");

    assert_eq!(result.deleted, 0);
    assert_eq!(result.errors.len(), 5);
    assert!(
        result
            .errors
            .iter()
            .all(|e| matches!(e, SweepError::Delete { .. }))
    );
}
