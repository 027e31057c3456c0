//! Authenticated HTTP client for the SentinelOne management API.
//!
//! `S1Client` wraps a `reqwest::Client` together with the management
//! console's base URL and a static bearer API token, providing two request
//! helpers: [`get_json`](S1Client::get_json) for the JSON REST endpoints and
//! [`get_text`](S1Client::get_text) for the CSV export endpoint.
//!
//! SentinelOne API tokens are long-lived opaque strings — there is no token
//! endpoint, no expiry tracking, and no refresh flow. Every request carries
//! `Authorization: Bearer {token}` and `Content-Type: application/json`.
//!
//! Non-2xx handling: the response body is read *before* the status check so
//! that SentinelOne's diagnostic error payload (an `errors` array with codes
//! and titles) is preserved in the returned [`S1Error::Api`] rather than
//! discarded the way `error_for_status()` would.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{Result, S1Error};

/// Connect timeout for the management API HTTP client.
/// Covers TCP + TLS handshake only.
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout for management API calls.
/// Covers the full round-trip including response body download. Set to
/// 2 minutes to accommodate large account exports — the CSV body grows
/// with tenant size. Per-account detail calls complete well within this.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds a `reqwest::Client` with explicit timeouts for management API
/// calls.
fn build_api_client() -> Client {
    Client::builder()
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client for SentinelOne API")
}

/// Authenticated HTTP client for the SentinelOne management API.
///
/// Design decisions:
/// - `base_url` is a constructor argument rather than a constant because it
///   is an action input — every tenant has its own management console URL.
///   This also lets tests point the client at a local mock server.
/// - The API token is stored as a plain `String` and never logged; it only
///   ever leaves the struct inside the `Authorization` header.
pub struct S1Client {
    client: Client,
    base_url: String,
    api_token: String,
}

impl S1Client {
    /// Creates a client for the management console at `base_url`,
    /// authenticating every request with `api_token`.
    ///
    /// A trailing slash on `base_url` is trimmed so request paths can be
    /// joined uniformly.
    pub fn new(base_url: &str, api_token: &str) -> Self {
        S1Client {
            client: build_api_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// Sends an authenticated GET request and returns the response body as
    /// text, for endpoints that serve non-JSON payloads (the CSV account
    /// export).
    ///
    /// `path` is relative to the base URL and must start with a slash.
    ///
    /// # Errors
    ///
    /// - `S1Error::Api` — the API returned a non-success status. The error
    ///   preserves the status code and response body.
    /// - `S1Error::Network` — transport-level failure (DNS, TCP, TLS,
    ///   timeout).
    pub async fn get_text(&self, path: &str) -> Result<String> {
        let resp = self.request(path, &[]).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(S1Error::Api { status, body });
        }

        Ok(body)
    }

    /// Sends an authenticated GET request with query parameters and
    /// deserializes the JSON response.
    ///
    /// Query values are percent-encoded by reqwest, so account names with
    /// spaces or reserved characters are safe to pass through.
    ///
    /// The body is read as text and parsed with `serde_json` rather than
    /// `Response::json()` so that a non-2xx status surfaces as
    /// `S1Error::Api` with the body intact, and a malformed success body
    /// surfaces as `S1Error::Parse`.
    ///
    /// # Errors
    ///
    /// - `S1Error::Api` — non-success HTTP status with the body preserved.
    /// - `S1Error::Parse` — the 2xx response body was not valid JSON for `T`.
    /// - `S1Error::Network` — transport-level failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let resp = self.request(path, query).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(S1Error::Api { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Constructs an authenticated GET request builder for `path` with the
    /// given query parameters. Both request helpers delegate here so the
    /// header set stays in one place.
    fn request(&self, path: &str, query: &[(&str, &str)]) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        req
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = S1Client::new("https://console.example.net/", "tok");
        assert_eq!(client.base_url, "https://console.example.net");
    }

    #[test]
    fn base_url_without_slash_is_unchanged() {
        let client = S1Client::new("https://console.example.net", "tok");
        assert_eq!(client.base_url, "https://console.example.net");
    }

    #[test]
    fn token_is_stored_verbatim() {
        let client = S1Client::new("https://console.example.net", "s3cret-token");
        assert_eq!(client.api_token, "s3cret-token");
    }
}
