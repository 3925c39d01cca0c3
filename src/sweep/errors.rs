//! Per-tweet failures collected during a sweep.

use thiserror::Error;

/// A recoverable failure for a single tweet. The sweep records it and moves on.
#[derive(Debug, Error)]
pub enum SweepError {
    /// `created_at` could not be parsed; the tweet was not considered for deletion.
    #[error("could not parse time for {id}: {cause}")]
    TimeParse {
        /// Tweet id.
        id: i64,
        /// Parse failure.
        #[source]
        cause: chrono::ParseError,
    },

    /// The delete call failed.
    #[error("failed to delete {id}: {cause}")]
    Delete {
        /// Tweet id.
        id: i64,
        /// API failure.
        #[source]
        cause: Box<crate::Error>,
    },
}

impl SweepError {
    /// The tweet this failure belongs to.
    #[must_use]
    pub const fn tweet_id(&self) -> i64 {
        match self {
            Self::TimeParse { id, .. } | Self::Delete { id, .. } => *id,
        }
    }
}

/// All per-tweet failures of one sweep, in the order they happened.
///
/// Displays as the individual messages joined by `"; "`.
#[derive(Debug, Error)]
#[error("{}", join_messages(.0))]
pub struct SweepErrors(Vec<SweepError>);

impl SweepErrors {
    /// Wraps a list of failures, or returns `None` if there were none.
    #[must_use]
    pub fn from_vec(errors: Vec<SweepError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The individual failures.
    #[must_use]
    pub fn errors(&self) -> &[SweepError] {
        &self.0
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; an empty list is never wrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_messages(errors: &[SweepError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tweet;

    fn time_parse_error(id: i64) -> SweepError {
        let cause = Tweet::new(id, "not a time", "")
            .created_at_time()
            .expect_err("malformed time");
        SweepError::TimeParse { id, cause }
    }

    fn delete_error(id: i64) -> SweepError {
        SweepError::Delete {
            id,
            cause: Box::new(crate::Error::Api {
                status: 404,
                body: "No status found with that ID.".to_string(),
            }),
        }
    }

    #[test]
    fn test_from_vec_empty() {
        assert!(SweepErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_messages() {
        assert!(
            time_parse_error(7)
                .to_string()
                .starts_with("could not parse time for 7: ")
        );
        assert_eq!(
            delete_error(8).to_string(),
            "failed to delete 8: api returned status 404: No status found with that ID."
        );
    }

    #[test]
    fn test_joined_display_preserves_order() {
        let errors =
            SweepErrors::from_vec(vec![delete_error(1), delete_error(2)]).expect("non-empty");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "failed to delete 1: api returned status 404: No status found with that ID.; \
             failed to delete 2: api returned status 404: No status found with that ID."
        );
        let ids: Vec<i64> = errors.errors().iter().map(SweepError::tweet_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
