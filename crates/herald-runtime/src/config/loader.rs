//! Runtime configuration loading.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults, then anything passed to [`ConfigLoader::merge`]
//! 2. `herald.toml` from the first search directory that has one
//! 3. `herald.<profile>.toml` from that same directory
//! 4. `HERALD_*` environment variables, `__` separating nested keys
//!
//! ```text
//! HERALD_PROFILE=production
//! HERALD_LOGGING__LEVEL=debug          → logging.level = "debug"
//! HERALD_GATEWAY__TIMEOUT_MS=3000      → gateway.timeout_ms = 3000
//! HERALD_PATHS__PRIVILEGE=/var/lib/herald/privilege.json
//! ```
//!
//! An explicit [`file`](ConfigLoader::file) replaces the search entirely.

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::{debug, info};

use super::error::{ConfigError, ConfigResult};
use super::schema::HeraldConfig;

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "HERALD_PROFILE";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "HERALD_";

/// Builds a [`HeraldConfig`] from defaults, TOML files and the environment.
pub struct ConfigLoader {
    overrides: Figment,
    profile: Option<String>,
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with no search paths. The profile comes from
    /// `HERALD_PROFILE` when set.
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: std::env::var(PROFILE_ENV).ok().filter(|p| !p.trim().is_empty()),
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
        }
    }

    /// Selects the profile file `herald.<profile>.toml`.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Some(profile.as_ref().trim().to_lowercase());
        self
    }

    /// Returns the selected profile.
    pub fn selected_profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Appends a directory to search for `herald.toml`.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Appends the working directory.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Appends the user config directory (`~/.config/herald` on Linux).
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("herald")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads `HERALD_*` overrides (the default).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Ignores `HERALD_*` overrides.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers `config` directly above the built-in defaults.
    pub fn merge(mut self, config: HeraldConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Merges every source and extracts the configuration.
    pub fn load(self) -> ConfigResult<HeraldConfig> {
        let figment = self.figment()?;
        let config: HeraldConfig = figment.extract()?;
        debug!(
            profile = self.profile.as_deref().unwrap_or("-"),
            level = %config.logging.level,
            "Runtime configuration loaded"
        );
        Ok(config)
    }

    fn figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(HeraldConfig::default()))
            .merge(self.overrides.clone());

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.clone()));
                }
                info!(path = %path.display(), "Using runtime config file");
                figment = merge_file(figment, path)?;
            }
            None => {
                for path in self.discover() {
                    info!(path = %path.display(), "Using runtime config file");
                    figment = merge_file(figment, &path)?;
                }
            }
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }
        Ok(figment)
    }

    /// Returns the files to layer: the base file and the profile file of the
    /// first search directory containing either.
    fn discover(&self) -> Vec<PathBuf> {
        for dir in &self.search_paths {
            let mut found = Vec::new();
            let base = dir.join("herald.toml");
            if base.is_file() {
                found.push(base);
            }
            if let Some(profile) = &self.profile {
                let variant = dir.join(format!("herald.{profile}.toml"));
                if variant.is_file() {
                    found.push(variant);
                }
            }
            if !found.is_empty() {
                return found;
            }
        }
        debug!("No runtime config file found, using defaults");
        Vec::new()
    }
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}
