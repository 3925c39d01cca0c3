//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Every request carries an `Authorization: OAuth ...` header whose
//! signature covers the method, the base URL and all query parameters
//! together with the `oauth_*` protocol parameters.

use crate::config::Credentials;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use secrecy::ExposeSecret;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are left as-is; everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a string as required by OAuth 1.0a.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Signs requests on behalf of a single user.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    /// Creates a signer from credentials.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Builds an `Authorization` header value with a fresh nonce and timestamp.
    #[must_use]
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, String)]) -> String {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().max(0).unsigned_abs();
        self.authorization_header_with(method, url, params, &nonce, timestamp)
    }

    /// Builds an `Authorization` header value for a fixed nonce and timestamp.
    #[must_use]
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: u64,
    ) -> String {
        let mut oauth_params = self.protocol_params(nonce, timestamp);
        let signature = self.signature(method, url, params, &oauth_params);
        oauth_params.push(("oauth_signature", signature));
        oauth_params.sort_by(|a, b| a.0.cmp(b.0));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }

    /// Computes the base64 HMAC-SHA1 signature over the request.
    #[must_use]
    pub fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        oauth_params: &[(&'static str, String)],
    ) -> String {
        let base = signature_base_string(method, url, params, oauth_params);
        let key = format!(
            "{}&{}",
            percent_encode(self.credentials.consumer_secret.expose_secret()),
            percent_encode(self.credentials.access_token_secret.expose_secret())
        );

        // HMAC accepts keys of any length
        let Ok(mut mac) = HmacSha1::new_from_slice(key.as_bytes()) else {
            return String::new();
        };
        mac.update(base.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    fn protocol_params(&self, nonce: &str, timestamp: u64) -> Vec<(&'static str, String)> {
        vec![
            (
                "oauth_consumer_key",
                self.credentials.consumer_key.expose_secret().to_string(),
            ),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            (
                "oauth_token",
                self.credentials.access_token.expose_secret().to_string(),
            ),
            ("oauth_version", "1.0".to_string()),
        ]
    }
}

/// Builds `METHOD&encoded-url&encoded-params` with parameters sorted by
/// encoded key, then encoded value.
fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    oauth_params: &[(&'static str, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}
