// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two-tier loading:
//! 1. TOML file (base values, everything optional)
//! 2. Environment variables (runtime overrides)
//!
//! CLI flags are applied by the binaries themselves on top of the loaded
//! config, keeping this crate free of argument parsing.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::NefsimConfig;
use crate::{ConfigError, ConfigResult};

const CONFIG_FILE_NAME: &str = "nefsim.toml";

/// Find the nefsim configuration file.
///
/// Search order:
/// 1. `NEFSIM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./nefsim.toml`
/// 3. Parent directories (up to 5 levels, for workspace roots)
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEFSIM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "config file specified by NEFSIM_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NEFSIM_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// With `config_path = None` the file is searched for; a missing file is an
/// error (use [`load_or_default`] for the fall-back-to-defaults behavior).
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<NefsimConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NefsimConfig = toml::from_str(&content)?;
    debug!("loaded config from {}", config_file.display());

    apply_environment_overrides(&mut config);
    Ok(config)
}

/// Like [`load_config`], but a missing config file yields the defaults
/// (with environment overrides still applied) instead of an error.
pub fn load_or_default(config_path: Option<&Path>) -> ConfigResult<NefsimConfig> {
    match config_path {
        Some(path) => load_config(Some(path)),
        None => match find_config_file() {
            Ok(path) => load_config(Some(&path)),
            Err(ConfigError::FileNotFound(_)) => {
                debug!("no config file found, using defaults");
                let mut config = NefsimConfig::default();
                apply_environment_overrides(&mut config);
                Ok(config)
            }
            Err(e) => Err(e),
        },
    }
}

/// Apply environment variable overrides to configuration.
///
/// Supported environment variables:
/// - `NEFSIM_DT` -> `simulation.dt`
/// - `NEFSIM_DURATION` -> `simulation.duration`
/// - `NEFSIM_SEED` -> `simulation.seed`
/// - `NEFSIM_N_NEURONS` -> `integrator.n_neurons`
/// - `NEFSIM_TAU` -> `integrator.tau`
/// - `NEFSIM_CSV_PATH` -> `output.csv_path`
pub fn apply_environment_overrides(config: &mut NefsimConfig) {
    if let Ok(value) = env::var("NEFSIM_DT") {
        if let Ok(dt) = value.parse::<f64>() {
            config.simulation.dt = dt;
        }
    }
    if let Ok(value) = env::var("NEFSIM_DURATION") {
        if let Ok(duration) = value.parse::<f64>() {
            config.simulation.duration = duration;
        }
    }
    if let Ok(value) = env::var("NEFSIM_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.simulation.seed = Some(seed);
        }
    }
    if let Ok(value) = env::var("NEFSIM_N_NEURONS") {
        if let Ok(n) = value.parse::<usize>() {
            config.integrator.n_neurons = n;
        }
    }
    if let Ok(value) = env::var("NEFSIM_TAU") {
        if let Ok(tau) = value.parse::<f64>() {
            config.integrator.tau = tau;
        }
    }
    if let Ok(value) = env::var("NEFSIM_CSV_PATH") {
        config.output.csv_path = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [integrator]
            n_neurons = 250
            [input]
            steps = [[0.0, 0.0], [0.5, 1.0]]
            "#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.integrator.n_neurons, 250);
        assert_eq!(config.input.steps, vec![[0.0, 0.0], [0.5, 1.0]]);
        // Unspecified sections keep their defaults
        assert_eq!(config.probe.synapse_tau, 0.01);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[simulation\ndt = ");
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        env::set_var("NEFSIM_DURATION", "2.5");
        env::set_var("NEFSIM_CSV_PATH", "/tmp/out.csv");

        let mut config = NefsimConfig::default();
        apply_environment_overrides(&mut config);

        env::remove_var("NEFSIM_DURATION");
        env::remove_var("NEFSIM_CSV_PATH");

        assert_eq!(config.simulation.duration, 2.5);
        assert_eq!(config.output.csv_path, "/tmp/out.csv");
    }

    #[test]
    fn test_unparsable_override_is_ignored() {
        env::set_var("NEFSIM_N_NEURONS", "many");
        let mut config = NefsimConfig::default();
        apply_environment_overrides(&mut config);
        env::remove_var("NEFSIM_N_NEURONS");
        assert_eq!(config.integrator.n_neurons, 100);
    }
}
