// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic filter models
//!
//! Synapses are linear filters applied to connection and probe signals.
//! [`Synapse`] is the description; [`FilterState`] is its per-dt
//! discretization with the state needed to step it.
//!
//! The lowpass discretization is exact for zero-order-hold input:
//! `y[k+1] = a*y[k] + (1-a)*x[k]` with `a = exp(-dt/tau)`. The alpha
//! synapse is two cascaded lowpass stages with the same coefficient.

use crate::error::{ModelError, Result};

/// Synaptic filter description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Synapse {
    /// First-order lowpass, the standard model of post-synaptic current decay.
    Lowpass { tau: f64 },
    /// Alpha function (second-order), smoother rise than the lowpass.
    Alpha { tau: f64 },
}

impl Synapse {
    pub fn lowpass(tau: f64) -> Self {
        Synapse::Lowpass { tau }
    }

    pub fn alpha(tau: f64) -> Self {
        Synapse::Alpha { tau }
    }

    pub fn tau(&self) -> f64 {
        match *self {
            Synapse::Lowpass { tau } | Synapse::Alpha { tau } => tau,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let tau = self.tau();
        if !(tau > 0.0) || !tau.is_finite() {
            return Err(ModelError::InvalidSynapse(tau));
        }
        Ok(())
    }
}

/// Discretized filter state for one signal.
#[derive(Debug, Clone)]
pub struct FilterState {
    kind: FilterKind,
    /// Decay coefficient `exp(-dt/tau)`; unused for passthrough.
    a: f64,
    y: Vec<f64>,
    /// Second stage (alpha only).
    y2: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FilterKind {
    Passthrough,
    Lowpass,
    Alpha,
}

impl FilterState {
    /// Discretize `synapse` for signals of `dims` dimensions at timestep
    /// `dt`. `None` passes the input through unchanged.
    pub fn new(synapse: Option<Synapse>, dims: usize, dt: f64) -> Self {
        let (kind, a) = match synapse {
            None => (FilterKind::Passthrough, 0.0),
            Some(Synapse::Lowpass { tau }) => (FilterKind::Lowpass, (-dt / tau).exp()),
            Some(Synapse::Alpha { tau }) => (FilterKind::Alpha, (-dt / tau).exp()),
        };
        Self {
            kind,
            a,
            y: vec![0.0; dims],
            y2: vec![0.0; dims],
        }
    }

    /// Feed one input sample and return the filtered output.
    pub fn step(&mut self, x: &[f64]) -> &[f64] {
        debug_assert_eq!(x.len(), self.y.len());
        match self.kind {
            FilterKind::Passthrough => {
                self.y.copy_from_slice(x);
            }
            FilterKind::Lowpass => {
                let a = self.a;
                for (yi, &xi) in self.y.iter_mut().zip(x.iter()) {
                    *yi = a * *yi + (1.0 - a) * xi;
                }
            }
            FilterKind::Alpha => {
                let a = self.a;
                for i in 0..x.len() {
                    self.y2[i] = a * self.y2[i] + (1.0 - a) * x[i];
                    self.y[i] = a * self.y[i] + (1.0 - a) * self.y2[i];
                }
            }
        }
        &self.y
    }

    /// Current output without feeding new input.
    pub fn value(&self) -> &[f64] {
        &self.y
    }

    pub fn reset(&mut self) {
        self.y.fill(0.0);
        self.y2.fill(0.0);
    }
}
