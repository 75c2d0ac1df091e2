//! Runtime orchestration.
//!
//! ```rust,ignore
//! use herald_runtime::HeraldRuntime;
//!
//! let runtime = HeraldRuntime::builder()
//!     .config_file("herald.toml")
//!     .profile("production")
//!     .build()?;
//!
//! runtime.run(registry).await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use herald_framework::{CommandRegistry, ConfigHandle, Dispatcher};
use herald_transport::{HttpGateway, ListenerHandle, listen};
use tokio::signal;
use tracing::{error, info};

use crate::config::{ConfigLoader, HeraldConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::store::JsonConfigStore;

/// Wires the config store, gateway client, dispatcher and HTTP server.
#[derive(Debug, Clone)]
pub struct HeraldRuntime {
    config: HeraldConfig,
}

impl HeraldRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration and
    /// initializes logging from it.
    pub fn from_config(config: HeraldConfig) -> Self {
        logging::init_from_config(&config.logging);
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    /// Opens the file-backed configuration handle.
    pub fn open_config(&self) -> RuntimeResult<Arc<ConfigHandle>> {
        let store = JsonConfigStore::new(&self.config.paths.settings, &self.config.paths.privilege);
        Ok(Arc::new(ConfigHandle::open(Arc::new(store))?))
    }

    /// Starts serving `registry` and returns once the listener is bound.
    pub async fn start(&self, registry: CommandRegistry) -> RuntimeResult<RunningBot> {
        let config = self.open_config()?;
        let snapshot = config.current();
        let settings = &snapshot.settings;

        let gateway = HttpGateway::with_timeout(&settings.gateway_socket, self.config.gateway.timeout())?;
        info!(
            gateway = gateway.base_url(),
            timeout_ms = self.config.gateway.timeout_ms,
            "Gateway client ready"
        );

        let host = self.config.server.host.as_deref().unwrap_or(&settings.listen_host);
        let port = self.config.server.port.unwrap_or(settings.listen_port);
        let addr = format!("{host}:{port}");

        let command_count = registry.len();
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), config, Arc::new(gateway)));
        let listener = listen(&addr, &self.config.server.path, dispatcher.clone()).await?;

        info!(
            bot = %settings.bot_name,
            commands = command_count,
            addr = %listener.local_addr(),
            "Herald is running"
        );

        Ok(RunningBot {
            dispatcher,
            listener,
        })
    }

    /// Serves `registry` until Ctrl+C or SIGTERM.
    pub async fn run(&self, registry: CommandRegistry) -> RuntimeResult<()> {
        let bot = self.start(registry).await?;
        let result = wait_for_shutdown().await;
        bot.shutdown().await;
        result
    }

    /// Serves `registry` until `shutdown` completes.
    pub async fn run_until<F>(&self, registry: CommandRegistry, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let bot = self.start(registry).await?;
        shutdown.await;
        bot.shutdown().await;
        Ok(())
    }
}

/// A started bot.
pub struct RunningBot {
    dispatcher: Arc<Dispatcher>,
    listener: ListenerHandle,
}

impl RunningBot {
    /// Returns the address the inbound server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Stops the inbound server.
    pub async fn shutdown(self) {
        info!("Stopping Herald");
        self.listener.shutdown().await;
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown() -> RuntimeResult<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(RuntimeError::Signal)?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.map_err(RuntimeError::Signal)?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.map_err(RuntimeError::Signal)?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a [`HeraldRuntime`] from configuration sources.
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    config_file: Option<std::path::PathBuf>,
    profile: Option<String>,
    load_env: bool,
    overrides: Option<HeraldConfig>,
}

impl RuntimeBuilder {
    /// Creates a builder that searches the default locations and reads the
    /// environment.
    pub fn new() -> Self {
        Self {
            load_env: true,
            ..Default::default()
        }
    }

    /// Loads exactly this configuration file.
    pub fn config_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Sets the profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Ignores `HERALD_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers `config` above the built-in defaults.
    pub fn merge(mut self, config: HeraldConfig) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Loads, validates and returns the runtime.
    pub fn build(self) -> RuntimeResult<HeraldRuntime> {
        let mut loader = ConfigLoader::new().with_current_dir().with_user_config_dir();
        if let Some(path) = self.config_file {
            loader = loader.file(path);
        }
        if let Some(profile) = self.profile {
            loader = loader.profile(profile);
        }
        if !self.load_env {
            loader = loader.without_env();
        }
        if let Some(overrides) = self.overrides {
            loader = loader.merge(overrides);
        }

        let config = loader.load()?;
        if let Err(e) = validate_config(&config) {
            error!(error = %e, "Invalid runtime configuration");
            return Err(e.into());
        }
        Ok(HeraldRuntime::from_config(config))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use herald_framework::{RegistryBuilder, builtin::register_builtins};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;
    use crate::store::tests::{temp_dir, write_settings};

    fn runtime_in(dir: &std::path::Path) -> HeraldRuntime {
        let mut config = HeraldConfig::default();
        config.paths.settings = write_settings(dir);
        config.paths.privilege = dir.join("privilege.json");
        config.gateway.timeout_ms = 200;
        HeraldRuntime { config }
    }

    fn registry() -> CommandRegistry {
        let mut builder = RegistryBuilder::new();
        register_builtins(&mut builder);
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn test_start_serves_and_stops() {
        let dir = temp_dir();
        let runtime = runtime_in(&dir);
        let bot = runtime.start(registry()).await.unwrap();
        assert_eq!(bot.dispatcher().registry().len(), 6);
        assert!(dir.join("privilege.json").exists());

        let body = r#"{"post_type":"meta_event"}"#;
        let request = format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let mut stream = TcpStream::connect(bot.local_addr()).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
            .await
            .unwrap()
            .unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("OK"));

        bot.shutdown().await;
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_settings_fails_start() {
        let dir = temp_dir();
        let mut runtime = runtime_in(&dir);
        runtime.config.paths.settings = dir.join("absent.json");
        let result = runtime.start(registry()).await;
        assert!(matches!(result, Err(RuntimeError::Store(_))));
        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_run_until() {
        let dir = temp_dir();
        let runtime = runtime_in(&dir);
        runtime
            .run_until(registry(), tokio::time::sleep(Duration::from_millis(10)))
            .await
            .unwrap();
        fs::remove_dir_all(dir).ok();
    }
}
