//! Typed error hierarchy for the s1-accounts crate.
//!
//! `S1Error` is a structured enum that preserves diagnostic context at each
//! failure boundary. Every variant carries enough information for callers to:
//! - Distinguish the failure category (API, network, parse, CSV, file I/O).
//! - Inspect the original cause via `source()` (thiserror derives this
//!   automatically from `#[from]` fields).
//! - Display a human-readable message that includes the relevant context
//!   (status code, response body, underlying error text).
//!
//! Design rationale:
//! - Variants map to real system boundaries, not to internal implementation
//!   details. `Api` covers the SentinelOne REST API; `Network` covers the
//!   transport; `Csv` covers both the export parser and the report writer.
//! - `Api` preserves the response body. SentinelOne error responses carry an
//!   `errors` array with codes and human-readable details that
//!   `error_for_status()` would discard.
//! - The action boundary distinguishes request-level failures (`Api`,
//!   `Network`) from everything else via [`S1Error::is_transport`]: the two
//!   classes produce different terminal messages for the action run.

use reqwest::StatusCode;

/// Unified error type for all s1-accounts library operations.
///
/// Each variant corresponds to a distinct failure boundary in the system.
/// Inner errors are chained via `Error::source()` so callers can traverse
/// the full cause chain.
#[derive(Debug, thiserror::Error)]
pub enum S1Error {
    /// The SentinelOne API returned a non-success HTTP status code.
    ///
    /// The full response body is preserved: SentinelOne error responses
    /// contain diagnostic codes and explanations that are essential for
    /// debugging invalid tokens, missing permissions, and server-side
    /// failures.
    #[error("API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by the management API.
        status: StatusCode,
        /// The raw response body text. May contain JSON error details
        /// from SentinelOne, or an empty string if the body could not
        /// be read.
        body: String,
    },

    /// A network-level failure occurred (DNS resolution, TCP connection,
    /// TLS handshake, request timeout, etc.).
    ///
    /// No HTTP status code is available because the request did not
    /// complete. This wraps the underlying `reqwest::Error` which carries
    /// detailed transport diagnostics.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization failed when parsing an API response body.
    ///
    /// This can occur if the accounts endpoint returns an unexpected
    /// response shape.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// CSV processing failed, either while reading the account export
    /// body or while writing the report file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A file I/O operation failed (creating, writing, or re-reading the
    /// report file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl S1Error {
    /// Returns `true` for request-level failures: non-2xx API responses and
    /// transport errors.
    ///
    /// The action boundary uses this to pick between the two terminal
    /// failure messages — request-level errors report a retrieval failure,
    /// everything else reports an unexpected error.
    pub fn is_transport(&self) -> bool {
        matches!(self, S1Error::Api { .. } | S1Error::Network(_))
    }
}

/// Convenience alias used throughout the library.
/// Keeps function signatures concise while providing the full typed error.
pub type Result<T> = std::result::Result<T, S1Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn api_error_preserves_status_and_body() {
        let err = S1Error::Api {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"errors":[{"code":4010010,"title":"Authentication failed"}]}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"), "display should include status code");
        assert!(
            msg.contains("Authentication failed"),
            "display should include response body"
        );
    }

    #[test]
    fn parse_error_chains_to_serde_json() {
        let json_err: serde_json::Error =
            serde_json::from_str::<String>("{{bad json}}").unwrap_err();
        let err = S1Error::Parse(json_err);
        assert!(
            err.to_string().contains("failed to parse response"),
            "display should indicate parse failure"
        );
        assert!(
            err.source().is_some(),
            "Parse variant should chain to serde_json::Error"
        );
    }

    #[test]
    fn io_error_chains_to_std_io() {
        let err = S1Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        ));
        let msg = err.to_string();
        assert!(msg.contains("read-only filesystem"));
        assert!(err.source().is_some());
    }

    #[test]
    fn api_and_network_are_transport_class() {
        let api = S1Error::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(api.is_transport());

        let io = S1Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(!io.is_transport(), "I/O errors are not request-level");

        let parse: S1Error = serde_json::from_str::<String>("oops").unwrap_err().into();
        assert!(!parse.is_transport(), "parse errors are not request-level");
    }

    #[test]
    fn error_is_send_and_sync() {
        // S1Error must be Send + Sync for use across async task boundaries.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<S1Error>();
    }
}
