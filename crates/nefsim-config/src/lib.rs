// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nefsim Configuration System
//!
//! Type-safe configuration loader for the nefsim demo runners:
//! - TOML file parsing (`nefsim.toml`)
//! - Environment variable overrides (`NEFSIM_*`)
//! - Validation before anything touches the engine
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nefsim_config::{load_or_default, validate_config};
//!
//! let config = load_or_default(None).expect("failed to load config");
//! validate_config(&config).expect("invalid config");
//! println!("running {}s at dt={}", config.simulation.duration, config.simulation.dt);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config, load_or_default};
pub use types::{
    InputSection, IntegratorSection, NefsimConfig, OutputSection, ProbeSection, SimulationSection,
};
pub use validation::validate_config;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NefsimConfig::default();
        assert!(validate_config(&config).is_ok());
    }
}
