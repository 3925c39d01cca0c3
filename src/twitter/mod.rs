//! Twitter API access.
//!
//! The sweep only needs two capabilities from the remote service, captured by
//! [`TimelineClient`]. [`TwitterClient`] implements them against the v1.1
//! REST API with OAuth 1.0a user-context signing.

mod client;
mod models;
mod oauth;

pub use client::{TwitterClient, build_http_client};
pub use models::{TWITTER_TIME_FORMAT, Tweet};
pub use oauth::{OAuthSigner, percent_encode};

use crate::Result;

/// Remote timeline operations used by the sweep.
pub trait TimelineClient {
    /// Returns up to `count` of the most recent tweets, newest first.
    ///
    /// The v1.1 API drops retweets from the page when `count` is given
    /// unless `include_retweets` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    fn user_timeline(&self, count: u32, include_retweets: bool) -> Result<Vec<Tweet>>;

    /// Deletes a tweet (or undoes a retweet) by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    fn delete_tweet(&self, id: i64) -> Result<()>;
}

impl<T: TimelineClient + ?Sized> TimelineClient for &T {
    fn user_timeline(&self, count: u32, include_retweets: bool) -> Result<Vec<Tweet>> {
        (**self).user_timeline(count, include_retweets)
    }

    fn delete_tweet(&self, id: i64) -> Result<()> {
        (**self).delete_tweet(id)
    }
}
