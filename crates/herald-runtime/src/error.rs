//! Runtime error types.

use herald_framework::StoreError;
use herald_transport::TransportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can stop the bot from starting.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The runtime configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The settings or privilege document could not be loaded.
    #[error("Failed to load bot documents: {0}")]
    Store(#[from] StoreError),

    /// The HTTP server or client could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Shutdown signal handlers could not be installed.
    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
