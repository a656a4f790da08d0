// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Catches bad values before they reach the engine, where the errors would
//! surface with less context.

use crate::types::NefsimConfig;
use crate::{ConfigError, ConfigResult};

/// Validate a complete configuration; returns the first problem found.
pub fn validate_config(config: &NefsimConfig) -> ConfigResult<()> {
    let sim = &config.simulation;
    if !(sim.dt > 0.0) || !sim.dt.is_finite() {
        return Err(invalid(format!("simulation.dt must be > 0, got {}", sim.dt)));
    }
    if !(sim.duration > 0.0) || !sim.duration.is_finite() {
        return Err(invalid(format!(
            "simulation.duration must be > 0, got {}",
            sim.duration
        )));
    }
    if sim.dt > sim.duration {
        return Err(invalid(format!(
            "simulation.dt ({}) exceeds simulation.duration ({})",
            sim.dt, sim.duration
        )));
    }

    let integ = &config.integrator;
    if integ.n_neurons == 0 {
        return Err(invalid("integrator.n_neurons must be > 0".to_string()));
    }
    if integ.dimensions == 0 {
        return Err(invalid("integrator.dimensions must be > 0".to_string()));
    }
    if !(integ.tau > 0.0) || !integ.tau.is_finite() {
        return Err(invalid(format!(
            "integrator.tau must be > 0, got {}",
            integ.tau
        )));
    }
    if !(integ.radius > 0.0) || !integ.radius.is_finite() {
        return Err(invalid(format!(
            "integrator.radius must be > 0, got {}",
            integ.radius
        )));
    }

    if config.input.steps.is_empty() {
        return Err(invalid("input.steps must not be empty".to_string()));
    }
    let mut prev = f64::NEG_INFINITY;
    for step in &config.input.steps {
        let [time, _value] = *step;
        if !time.is_finite() || time < 0.0 {
            return Err(invalid(format!(
                "input.steps time {} is not a non-negative finite number",
                time
            )));
        }
        if time <= prev {
            return Err(invalid(format!(
                "input.steps times must be strictly increasing ({} after {})",
                time, prev
            )));
        }
        prev = time;
    }

    let probe = &config.probe;
    if !(probe.synapse_tau > 0.0) || !probe.synapse_tau.is_finite() {
        return Err(invalid(format!(
            "probe.synapse_tau must be > 0, got {}",
            probe.synapse_tau
        )));
    }
    if let Some(interval) = probe.sample_every {
        if !(interval > 0.0) || interval < sim.dt {
            return Err(invalid(format!(
                "probe.sample_every ({}) must be >= simulation.dt ({})",
                interval, sim.dt
            )));
        }
    }

    if config.output.csv_path.is_empty() {
        return Err(invalid("output.csv_path must not be empty".to_string()));
    }

    Ok(())
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::InvalidValue(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NefsimConfig;

    fn base() -> NefsimConfig {
        NefsimConfig::default()
    }

    #[test]
    fn test_defaults_pass() {
        assert!(validate_config(&base()).is_ok());
    }

    #[test]
    fn test_bad_timestep_rejected() {
        let mut config = base();
        config.simulation.dt = 0.0;
        assert!(validate_config(&config).is_err());

        config.simulation.dt = f64::NAN;
        assert!(validate_config(&config).is_err());

        config.simulation.dt = 10.0; // larger than duration
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_integrator_rejected() {
        let mut config = base();
        config.integrator.n_neurons = 0;
        assert!(validate_config(&config).is_err());

        let mut config = base();
        config.integrator.tau = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_schedule_rejected() {
        let mut config = base();
        config.input.steps = vec![];
        assert!(validate_config(&config).is_err());

        config.input.steps = vec![[0.0, 0.0], [0.0, 1.0]];
        assert!(validate_config(&config).is_err());

        config.input.steps = vec![[1.0, 0.0], [0.5, 1.0]];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_sample_every_below_dt_rejected() {
        let mut config = base();
        config.probe.sample_every = Some(0.0001);
        assert!(validate_config(&config).is_err());

        config.probe.sample_every = Some(0.01);
        assert!(validate_config(&config).is_ok());
    }
}
