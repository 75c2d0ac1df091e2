//! Transport errors.

use thiserror::Error;

/// Errors raised while setting up a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listener could not bind its address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The requested address.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
