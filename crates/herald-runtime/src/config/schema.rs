//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeraldConfig {
    /// Inbound HTTP endpoint.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound gateway client.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Locations of the bot documents.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// =============================================================================
// Server / Gateway / Paths
// =============================================================================

/// Inbound HTTP endpoint settings.
///
/// The listen address comes from the settings document; `host` and `port`
/// override it when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Route the gateway posts events to.
    #[serde(default = "default_server_path")]
    pub path: String,

    /// Overrides the settings document's listen host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Overrides the settings document's listen port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            path: default_server_path(),
            host: None,
            port: None,
        }
    }
}

fn default_server_path() -> String {
    "/".to_string()
}

/// Outbound gateway settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Timeout for every gateway call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl GatewayConfig {
    /// Returns the timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Locations of the settings and privilege documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Settings document (read-only).
    #[serde(default = "default_settings_path")]
    pub settings: PathBuf,

    /// Privilege document (read-write, created when missing).
    #[serde(default = "default_privilege_path")]
    pub privilege: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            settings: default_settings_path(),
            privilege: default_privilege_path(),
        }
    }
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("configs").join("init.json")
}

fn default_privilege_path() -> PathBuf {
    PathBuf::from("configs").join("privilege.json")
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debugging output.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Recoverable problems.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Returns the level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Single-line, all fields.
    Full,
    /// Multi-line, human oriented.
    Pretty,
    /// One JSON object per line (requires the `json-log` feature).
    Json,
}

/// Where logs are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// `logging.file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    /// Span creation.
    #[serde(default)]
    pub new: bool,
    /// Span entry.
    #[serde(default)]
    pub enter: bool,
    /// Span exit.
    #[serde(default)]
    pub exit: bool,
    /// Span close.
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global level. `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub level: LogLevel,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,

    /// Destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Span events.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    /// Log file, for `output = "file"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `herald_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            filters: HashMap::new(),
        }
    }
}
