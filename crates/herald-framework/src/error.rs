//! Error types for the Herald framework.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Registration Errors
// =============================================================================

/// A handler that violates the registration contract.
///
/// These are build-time defects: the bot must not start serving traffic
/// while any of them exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The descriptor has no invocation prefix.
    #[error("command #{index} has no invocation prefix")]
    MissingPrefix {
        /// Registration position (0-based).
        index: usize,
    },

    /// The descriptor has no permission level.
    #[error("command \"{prefix}\" has no permission level")]
    MissingPermission {
        /// The command prefix.
        prefix: String,
    },

    /// The prefix cannot be matched by the dispatcher.
    #[error("command \"{prefix}\" has an invalid prefix: {reason}")]
    InvalidPrefix {
        /// The offending prefix.
        prefix: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Two handlers claim the same prefix.
    #[error("command \"{prefix}\" is registered more than once (#{first} and #{second})")]
    DuplicatePrefix {
        /// The contested prefix.
        prefix: String,
        /// Position of the first registration.
        first: usize,
        /// Position of the conflicting registration.
        second: usize,
    },
}

impl RegistrationError {
    /// Returns a hint telling the developer how to fix the registration.
    pub fn remediation(&self) -> String {
        match self {
            Self::MissingPrefix { .. } => {
                "set an invocation prefix, e.g. command(\"/name\")".to_string()
            }
            Self::MissingPermission { prefix } => {
                format!("declare a permission level, e.g. command(\"{prefix}\").permission(1)")
            }
            Self::InvalidPrefix { .. } => {
                "prefixes start with '/' and contain no whitespace, e.g. \"/echo\"".to_string()
            }
            Self::DuplicatePrefix { prefix, .. } => {
                format!("rename one of the handlers bound to \"{prefix}\"")
            }
        }
    }
}

/// Every registration error found while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct RegistrationErrors(pub Vec<RegistrationError>);

impl RegistrationErrors {
    /// Returns the collected errors.
    pub fn errors(&self) -> &[RegistrationError] {
        &self.0
    }
}

impl fmt::Display for RegistrationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} registration error(s)", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  [x] {err}\n      [+] {}", err.remediation())?;
        }
        Ok(())
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by a [`ConfigStore`](crate::config::ConfigStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a document failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The document path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid JSON or does not match its schema.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The document path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The blocking task running the store call panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(#[source] tokio::task::JoinError),
}

impl StoreError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a JSON error for `path`.
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
