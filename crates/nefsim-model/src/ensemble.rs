// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ensemble descriptions
//!
//! An ensemble is a population of neurons collectively representing a
//! vector. Per-neuron tuning (max rates, intercepts) is described as
//! distributions sampled at build time.

use nefsim_neural::NeuronModel;

use crate::error::{ModelError, Result};

/// A scalar distribution sampled once per neuron at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Uniform over `[low, high)`.
    Uniform { low: f64, high: f64 },
}

impl Distribution {
    pub fn uniform(low: f64, high: f64) -> Self {
        Distribution::Uniform { low, high }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Distribution::Uniform { low, high } => {
                if low >= high {
                    return Err(ModelError::InvalidDistribution { low, high });
                }
            }
        }
        Ok(())
    }
}

/// A population of neurons representing a `dimensions`-vector.
#[derive(Debug, Clone)]
pub struct Ensemble {
    pub label: Option<String>,
    pub n_neurons: usize,
    pub dimensions: usize,
    /// Representational range: inputs are normalized by this before
    /// encoding, so tuning curves cover `[-radius, radius]`.
    pub radius: f64,
    pub max_rates: Distribution,
    pub intercepts: Distribution,
    pub neuron: NeuronModel,
    /// Build-time sampling seed; falls back to a network-derived seed.
    pub seed: Option<u64>,
}

impl Ensemble {
    /// An ensemble with the standard defaults: LIF neurons, unit radius,
    /// max rates uniform in 200-400 Hz, intercepts uniform in [-1, 0.9).
    pub fn new(n_neurons: usize, dimensions: usize) -> Self {
        Self {
            label: None,
            n_neurons,
            dimensions,
            radius: 1.0,
            max_rates: Distribution::uniform(200.0, 400.0),
            intercepts: Distribution::uniform(-1.0, 0.9),
            neuron: NeuronModel::default(),
            seed: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_neuron(mut self, neuron: NeuronModel) -> Self {
        self.neuron = neuron;
        self
    }

    pub fn with_max_rates(mut self, max_rates: Distribution) -> Self {
        self.max_rates = max_rates;
        self
    }

    pub fn with_intercepts(mut self, intercepts: Distribution) -> Self {
        self.intercepts = intercepts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Display name: the label if set, otherwise a placeholder.
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("<ensemble>")
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_neurons == 0 {
            return Err(ModelError::ZeroNeurons(self.name().to_string()));
        }
        if self.dimensions == 0 {
            return Err(ModelError::ZeroDimensions(self.name().to_string()));
        }
        if !(self.radius > 0.0) || !self.radius.is_finite() {
            return Err(ModelError::InvalidRadius(self.name().to_string()));
        }
        self.max_rates.validate()?;
        self.intercepts.validate()?;
        self.neuron.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Ensemble::new(100, 1).validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_ensembles() {
        assert!(Ensemble::new(0, 1).validate().is_err());
        assert!(Ensemble::new(10, 0).validate().is_err());
        assert!(Ensemble::new(10, 1).with_radius(0.0).validate().is_err());
        assert!(Ensemble::new(10, 1)
            .with_max_rates(Distribution::uniform(400.0, 200.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_builder_chain() {
        let ens = Ensemble::new(50, 2)
            .with_label("memory")
            .with_radius(1.5)
            .with_seed(7);
        assert_eq!(ens.name(), "memory");
        assert_eq!(ens.radius, 1.5);
        assert_eq!(ens.seed, Some(7));
    }
}
