// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron models
//!
//! Each model lives in its own module with its parameters and unit tests.
//! [`NeuronModel`] is the runtime-selectable wrapper the engine dispatches
//! through; populations of mixed models are not supported.

mod izhikevich;
mod lif;
mod rectified_linear;

pub use izhikevich::Izhikevich;
pub use lif::{Lif, LifRate};
pub use rectified_linear::{RectifiedLinear, SpikingRectifiedLinear};

use crate::error::Result;
use crate::state::PopulationState;

/// A runtime-selectable neuron model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeuronModel {
    RectifiedLinear(RectifiedLinear),
    SpikingRectifiedLinear(SpikingRectifiedLinear),
    LifRate(LifRate),
    Lif(Lif),
    Izhikevich(Izhikevich),
}

impl Default for NeuronModel {
    fn default() -> Self {
        NeuronModel::Lif(Lif::default())
    }
}

impl NeuronModel {
    pub fn model_name(&self) -> &'static str {
        match self {
            NeuronModel::RectifiedLinear(_) => "Rectified Linear",
            NeuronModel::SpikingRectifiedLinear(_) => "Spiking Rectified Linear",
            NeuronModel::LifRate(_) => "Leaky Integrate-and-Fire (rate)",
            NeuronModel::Lif(_) => "Leaky Integrate-and-Fire (LIF)",
            NeuronModel::Izhikevich(_) => "Izhikevich",
        }
    }

    /// Whether `step` emits spike impulses (`amplitude / dt`) rather than
    /// instantaneous rates.
    pub fn is_spiking(&self) -> bool {
        matches!(
            self,
            NeuronModel::SpikingRectifiedLinear(_)
                | NeuronModel::Lif(_)
                | NeuronModel::Izhikevich(_)
        )
    }

    /// Check model parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            NeuronModel::RectifiedLinear(m) => m.validate(),
            NeuronModel::SpikingRectifiedLinear(m) => m.validate(),
            NeuronModel::LifRate(m) => m.validate(),
            NeuronModel::Lif(m) => m.validate(),
            NeuronModel::Izhikevich(m) => m.validate(),
        }
    }

    /// Advance the population one timestep.
    ///
    /// `j` holds input currents, `output` receives rates (rate models) or
    /// spike impulses (spiking models). All slices must share one length;
    /// the engine guarantees this, so the check is a debug assertion only.
    pub fn step(&self, dt: f64, j: &[f64], state: &mut PopulationState, output: &mut [f64]) {
        debug_assert_eq!(j.len(), output.len());
        debug_assert_eq!(j.len(), state.len());
        match self {
            NeuronModel::RectifiedLinear(m) => m.step(j, output),
            NeuronModel::SpikingRectifiedLinear(m) => {
                m.step(dt, j, &mut state.voltage, output)
            }
            NeuronModel::LifRate(m) => m.step(j, output),
            NeuronModel::Lif(m) => m.step(dt, j, &mut state.voltage, &mut state.refractory, output),
            NeuronModel::Izhikevich(m) => {
                m.step(dt, j, &mut state.voltage, &mut state.recovery, output)
            }
        }
    }

    /// Steady-state firing rates for the given currents.
    pub fn rates(&self, j: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; j.len()];
        match self {
            NeuronModel::RectifiedLinear(m) => m.rates_into(j, &mut out),
            NeuronModel::SpikingRectifiedLinear(m) => m.rates_into(j, &mut out),
            NeuronModel::LifRate(m) => m.rates_into(j, &mut out),
            NeuronModel::Lif(m) => m.rates_into(j, &mut out),
            NeuronModel::Izhikevich(m) => out = m.rates(j),
        }
        out
    }

    /// Input currents for encoded values: `J_i = gain_i * x_i + bias_i`.
    ///
    /// `x` is assumed already projected onto the encoders and normalized to
    /// radius 1, so a neuron's maximum expected current occurs at `x = 1`.
    pub fn current(&self, x: &[f64], gain: &[f64], bias: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), gain.len());
        debug_assert_eq!(x.len(), bias.len());
        x.iter()
            .zip(gain.iter())
            .zip(bias.iter())
            .map(|((&xi, &g), &b)| g * xi + b)
            .collect()
    }

    /// Gain and bias currents satisfying the requested max rates and
    /// intercepts.
    pub fn gain_bias(&self, max_rates: &[f64], intercepts: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        match self {
            NeuronModel::RectifiedLinear(m) => m.gain_bias(max_rates, intercepts),
            NeuronModel::SpikingRectifiedLinear(m) => m.gain_bias(max_rates, intercepts),
            NeuronModel::LifRate(m) => m.gain_bias(max_rates, intercepts),
            NeuronModel::Lif(m) => m.gain_bias(max_rates, intercepts),
            NeuronModel::Izhikevich(m) => m.gain_bias(max_rates, intercepts),
        }
    }
}
