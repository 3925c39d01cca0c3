//! Blocking Twitter v1.1 REST client.

use super::{OAuthSigner, TimelineClient, Tweet};
use crate::config::{Credentials, EphemeralConfig, HttpConfig};
use crate::{Error, Result};
use reqwest::Method;
use reqwest::blocking::Response;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: &HttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Twitter API client authenticated as a single user.
pub struct TwitterClient {
    /// API base URL, without a trailing slash.
    base_url: String,
    /// Request signer.
    signer: OAuthSigner,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl TwitterClient {
    /// Creates a client for the given credentials and HTTP settings.
    #[must_use]
    pub fn new(credentials: Credentials, http: &HttpConfig) -> Self {
        Self {
            base_url: http.base_url.trim_end_matches('/').to_string(),
            signer: OAuthSigner::new(credentials),
            client: build_http_client(http),
        }
    }

    /// Creates a client from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &EphemeralConfig) -> Self {
        Self::new(config.credentials.clone(), &config.http)
    }

    /// Sends a signed request and checks the response status.
    fn send(
        &self,
        method: Method,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response> {
        let url = format!("{}{path}", self.base_url);
        let authorization = self.signer.authorization_header(method.as_str(), &url, query);

        tracing::debug!(operation, method = %method, url = %url, "Making API request");

        let response = self
            .client
            .request(method, &url)
            .query(query)
            .header(AUTHORIZATION, authorization)
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    operation,
                    error = %e,
                    error_kind,
                    "API request failed"
                );
                Error::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                operation,
                status = %status,
                body = %body,
                "API returned error status"
            );
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

impl TimelineClient for TwitterClient {
    fn user_timeline(&self, count: u32, include_retweets: bool) -> Result<Vec<Tweet>> {
        let query = [
            ("count", count.to_string()),
            ("include_rts", include_retweets.to_string()),
        ];
        let response = self.send(
            Method::GET,
            "user_timeline",
            "/statuses/user_timeline.json",
            &query,
        )?;
        let body = response.text()?;
        let timeline: Vec<Tweet> = serde_json::from_str(&body)?;

        tracing::debug!(tweets = timeline.len(), "Fetched timeline");
        Ok(timeline)
    }

    fn delete_tweet(&self, id: i64) -> Result<()> {
        let query = [("trim_user", "true".to_string())];
        self.send(
            Method::POST,
            "destroy",
            &format!("/statuses/destroy/{id}.json"),
            &query,
        )?;
        Ok(())
    }
}
