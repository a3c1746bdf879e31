//! TOML configuration loader with validation.
//!
//! Parses a [`MadsConfig`] and checks threshold bounds and the `[shared]`
//! table before any session is built from it.

use std::path::Path;

use mads_common::config::{ConfigError, ConfigLoader};
use mads_common::mads::config::MadsConfig;

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<MadsConfig, ConfigError> {
    let config = MadsConfig::load(path)?;
    validated(config)
}

/// Load and validate configuration from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<MadsConfig, ConfigError> {
    let config = MadsConfig::from_toml_str(content)?;
    validated(config)
}

fn validated(config: MadsConfig) -> Result<MadsConfig, ConfigError> {
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}
