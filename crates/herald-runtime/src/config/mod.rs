//! Runtime configuration.
//!
//! This is the process-level configuration (`herald.toml` plus `HERALD_*`
//! environment variables): where the bot documents live, how the inbound
//! endpoint is mounted, gateway timeouts and logging. The bot documents
//! themselves (settings and privilege grants) are handled by
//! [`JsonConfigStore`](crate::store::JsonConfigStore).

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, ENV_PREFIX, PROFILE_ENV};
pub use schema::{
    GatewayConfig, HeraldConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PathsConfig,
    ServerConfig, SpanEventConfig,
};
pub use validation::validate_config;
