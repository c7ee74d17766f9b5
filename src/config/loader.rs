//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use url::Url;

use crate::config::schema::ClientConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ClientConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Semantic validation on top of serde's syntactic checks. Collects all
/// problems rather than stopping at the first.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.contract.address.is_empty() {
        errors.push("contract.address must not be empty".to_string());
    }
    if config.contract.name.is_empty() {
        errors.push("contract.name must not be empty".to_string());
    }
    if let Err(e) = config.network.rpc_url.parse::<Url>() {
        errors.push(format!(
            "network.rpc_url '{}' is not a valid URL: {}",
            config.network.rpc_url, e
        ));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push("network.rpc_timeout_secs must be positive".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
