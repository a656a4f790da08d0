// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Every section and field is optional in the TOML file; missing values
//! fall back to the integrator demo defaults (100 LIF neurons, tau 0.1 s,
//! the classic piecewise schedule, a 6-second run).

use serde::{Deserialize, Serialize};

/// Complete configuration for a demo run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NefsimConfig {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub integrator: IntegratorSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub probe: ProbeSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Timestep in seconds.
    pub dt: f64,
    /// Run length in seconds.
    pub duration: f64,
    /// Build seed; omit for a fresh build every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            dt: 0.001,
            duration: 6.0,
            seed: Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegratorSection {
    pub n_neurons: usize,
    pub dimensions: usize,
    /// Feedback synapse time constant in seconds; also scales the input.
    pub tau: f64,
    pub radius: f64,
}

impl Default for IntegratorSection {
    fn default() -> Self {
        Self {
            n_neurons: 100,
            dimensions: 1,
            tau: 0.1,
            radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputSection {
    /// Piecewise schedule as `[time, value]` pairs, strictly increasing in
    /// time.
    pub steps: Vec<[f64; 2]>,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            steps: vec![
                [0.0, 0.0],
                [0.2, 1.0],
                [1.0, 0.0],
                [2.0, -2.0],
                [3.0, 0.0],
                [4.0, 1.0],
                [5.0, 0.0],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSection {
    /// Lowpass applied to the decoded-value probe, in seconds.
    pub synapse_tau: f64,
    /// Probe sampling interval in seconds; defaults to the timestep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_every: Option<f64>,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            synapse_tau: 0.01,
            sample_every: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Destination for the recorded time series.
    pub csv_path: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            csv_path: "integrator.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_notebook_parameters() {
        let config = NefsimConfig::default();
        assert_eq!(config.integrator.n_neurons, 100);
        assert_eq!(config.integrator.dimensions, 1);
        assert_eq!(config.integrator.tau, 0.1);
        assert_eq!(config.simulation.duration, 6.0);
        assert_eq!(config.probe.synapse_tau, 0.01);
        assert_eq!(config.input.steps.len(), 7);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: NefsimConfig = toml::from_str(
            r#"
            [simulation]
            duration = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.duration, 2.0);
        assert_eq!(config.simulation.dt, 0.001);
        assert_eq!(config.integrator.n_neurons, 100);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<NefsimConfig, _> = toml::from_str(
            r#"
            [simulation]
            dtt = 0.001
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = NefsimConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: NefsimConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
