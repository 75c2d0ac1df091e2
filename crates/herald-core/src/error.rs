//! Error types for outbound gateway calls.

use thiserror::Error;

/// Errors that can occur while talking to the messaging gateway.
///
/// None of these ever reach the inbound endpoint; callers log them and move on.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The call did not complete within the configured timeout.
    #[error("gateway call timed out after {0} ms")]
    Timeout(u64),

    /// The request could not be sent or the connection failed.
    #[error("gateway request failed: {0}")]
    Http(String),

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The gateway reported a OneBot-level failure (`retcode != 0`).
    #[error("gateway API error {retcode}: {message}")]
    Api {
        /// OneBot return code.
        retcode: i64,
        /// Error message reported by the gateway.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Creates an HTTP error from anything printable.
    pub fn http(err: impl ToString) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;
