//! Error types for the tether-client crate.

use std::time::Duration;

/// Errors that can occur when talking to a remote graph service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, DNS, protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Per-call deadline expired before the service answered
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Response body did not match the wire contract
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The service reported a failure for this run
    #[error("Remote execution failed (HTTP {status}): {detail}")]
    RemoteExecution { status: u16, detail: String },

    /// Missing or invalid client configuration, raised before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// True for transport-level failures (retry may help), false for
    /// remote execution or configuration failures (it will not).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Timeout(_) | ClientError::Malformed(_)
        )
    }
}
