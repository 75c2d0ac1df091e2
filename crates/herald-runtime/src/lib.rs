//! Herald Runtime: the orchestration layer.
//!
//! This crate provides:
//! - Runtime configuration loading and validation ([`config`])
//! - The file-backed [`JsonConfigStore`] for the settings and privilege
//!   documents
//! - Logging setup ([`logging`])
//! - [`HeraldRuntime`], which wires everything together and runs until a
//!   shutdown signal
//!
//! ```ignore
//! use herald_framework::{RegistryBuilder, builtin::register_builtins};
//! use herald_runtime::HeraldRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut builder = RegistryBuilder::new();
//!     register_builtins(&mut builder);
//!     let registry = builder.build()?;
//!
//!     HeraldRuntime::builder().build()?.run(registry).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod store;

pub use config::{ConfigError, ConfigLoader, ConfigResult, HeraldConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use runtime::{HeraldRuntime, RunningBot, RuntimeBuilder};
pub use store::JsonConfigStore;

// Re-export tracing for use by other crates
pub use tracing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
