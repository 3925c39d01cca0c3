//! Tweet payloads.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

/// `created_at` layout used by the v1.1 API, e.g. `Wed Aug 27 13:08:45 +0000 2008`.
pub const TWITTER_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// [`TWITTER_TIME_FORMAT`] after the leading weekday. The weekday carries no
/// information the date does not, and a mismatched one is tolerated.
const TIME_FORMAT_WITHOUT_WEEKDAY: &str = "%b %d %H:%M:%S %z %Y";

/// A tweet as returned by the timeline endpoint.
///
/// Only the fields the sweep needs are decoded; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet id.
    pub id: i64,
    /// Creation time in [`TWITTER_TIME_FORMAT`]. Empty when the payload
    /// omits it or sends `null`, which then fails to parse for this tweet only.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    /// Tweet text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

impl Tweet {
    /// Creates a tweet.
    #[must_use]
    pub fn new(id: i64, created_at: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            created_at: created_at.into(),
            text: text.into(),
        }
    }

    /// Parses `created_at` into a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if `created_at` is malformed.
    pub fn created_at_time(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        let parsed = match self.created_at.split_once(' ') {
            Some((weekday, rest)) if weekday.parse::<Weekday>().is_ok() => {
                DateTime::parse_from_str(rest, TIME_FORMAT_WITHOUT_WEEKDAY)
            },
            _ => DateTime::parse_from_str(&self.created_at, TWITTER_TIME_FORMAT),
        };
        parsed.map(|dt| dt.with_timezone(&Utc))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
