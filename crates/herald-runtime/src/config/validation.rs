//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HeraldConfig, LogFormat, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_server(config)?;
    validate_gateway(config)?;
    validate_paths(config)?;
    validate_logging(&config.logging)?;
    Ok(())
}

fn validate_server(config: &HeraldConfig) -> ConfigResult<()> {
    let path = &config.server.path;
    if !path.starts_with('/') {
        return Err(ConfigError::invalid(
            "server.path",
            format!("must start with '/', got {path:?}"),
        ));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid("server.path", "contains whitespace"));
    }
    if let Some(host) = &config.server.host {
        if host.trim().is_empty() {
            return Err(ConfigError::missing("server.host"));
        }
    }
    Ok(())
}

fn validate_gateway(config: &HeraldConfig) -> ConfigResult<()> {
    if config.gateway.timeout_ms == 0 {
        return Err(ConfigError::invalid("gateway.timeout_ms", "must be greater than 0"));
    }
    Ok(())
}

fn validate_paths(config: &HeraldConfig) -> ConfigResult<()> {
    if config.paths.settings.as_os_str().is_empty() {
        return Err(ConfigError::missing("paths.settings"));
    }
    if config.paths.privilege.as_os_str().is_empty() {
        return Err(ConfigError::missing("paths.privilege"));
    }
    if config.paths.settings == config.paths.privilege {
        return Err(ConfigError::invalid(
            "paths.privilege",
            "must not be the settings file",
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing("logging.file_path"));
    }
    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::invalid(
            "logging.format",
            "\"json\" needs the json-log feature",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = HeraldConfig::default();
        config.server.path = "events".into();
        assert_eq!(
            validate_config(&config).unwrap_err().to_string(),
            "server.path must start with '/', got \"events\""
        );

        let mut config = HeraldConfig::default();
        config.gateway.timeout_ms = 0;
        assert!(validate_config(&config).is_err());

        let mut config = HeraldConfig::default();
        config.paths.privilege = config.paths.settings.clone();
        assert!(validate_config(&config).is_err());

        let mut config = HeraldConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Missing { field: "logging.file_path" })
        ));
    }
}
