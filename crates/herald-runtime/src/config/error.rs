//! Runtime configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// A problem with `herald.toml`, its profile variant or `HERALD_*` overrides.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("runtime config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The file extension has no enabled parser.
    #[error("unsupported runtime config format: .{0}")]
    UnsupportedFormat(String),

    /// The merged sources do not deserialize into [`HeraldConfig`](super::HeraldConfig).
    #[error("cannot read runtime config: {0}")]
    Extract(#[source] Box<figment::Error>),

    /// A required value is empty.
    #[error("{field} must be set")]
    Missing {
        /// Dotted key, e.g. `paths.settings`.
        field: &'static str,
    },

    /// A value is present but unusable.
    #[error("{field} {reason}")]
    Invalid {
        /// Dotted key, e.g. `server.path`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

/// Result type for runtime configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;
