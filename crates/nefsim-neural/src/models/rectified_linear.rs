// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Rectified linear neuron models
//!
//! The rate model scales linearly with current above zero. The spiking
//! variant integrates rectified current and fires whenever the accumulated
//! voltage crosses whole-number thresholds, which can emit multiple spikes
//! in a single step at high current.

use crate::error::{NeuralError, Result};

/// Rectified linear rate model: `a = amplitude * max(0, J)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectifiedLinear {
    /// Scaling factor on the neuron output.
    pub amplitude: f64,
}

impl Default for RectifiedLinear {
    fn default() -> Self {
        Self { amplitude: 1.0 }
    }
}

impl RectifiedLinear {
    pub fn new(amplitude: f64) -> Self {
        Self { amplitude }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amplitude <= 0.0 {
            return Err(NeuralError::invalid("amplitude", "must be > 0"));
        }
        Ok(())
    }

    #[inline]
    pub fn step(&self, j: &[f64], output: &mut [f64]) {
        for (o, &ji) in output.iter_mut().zip(j.iter()) {
            *o = self.amplitude * ji.max(0.0);
        }
    }

    pub fn rates_into(&self, j: &[f64], out: &mut [f64]) {
        self.step(j, out);
    }

    /// Determine gain and bias by shifting and scaling the lines.
    pub fn gain_bias(&self, max_rates: &[f64], intercepts: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(max_rates, intercepts)?;
        let mut gain = Vec::with_capacity(max_rates.len());
        let mut bias = Vec::with_capacity(max_rates.len());
        for (&max_rate, &intercept) in max_rates.iter().zip(intercepts.iter()) {
            let g = max_rate / (1.0 - intercept);
            gain.push(g);
            bias.push(-intercept * g);
        }
        Ok((gain, bias))
    }

    /// Compute the inverse of `gain_bias`.
    pub fn max_rates_intercepts(&self, gain: &[f64], bias: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut max_rates = Vec::with_capacity(gain.len());
        let mut intercepts = Vec::with_capacity(gain.len());
        for (&g, &b) in gain.iter().zip(bias.iter()) {
            let intercept = -b / g;
            intercepts.push(intercept);
            max_rates.push(g * (1.0 - intercept));
        }
        (max_rates, intercepts)
    }
}

/// Spiking (integrate-and-fire) version of [`RectifiedLinear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikingRectifiedLinear {
    /// Scaling factor on the output spike impulses.
    pub amplitude: f64,
}

impl Default for SpikingRectifiedLinear {
    fn default() -> Self {
        Self { amplitude: 1.0 }
    }
}

impl SpikingRectifiedLinear {
    pub fn new(amplitude: f64) -> Self {
        Self { amplitude }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amplitude <= 0.0 {
            return Err(NeuralError::invalid("amplitude", "must be > 0"));
        }
        Ok(())
    }

    /// Integrate rectified current; fire once per unit of accumulated
    /// voltage, keeping the fractional remainder.
    #[inline]
    pub fn step(&self, dt: f64, j: &[f64], voltage: &mut [f64], output: &mut [f64]) {
        for i in 0..j.len() {
            voltage[i] += j[i].max(0.0) * dt;
            let n_spikes = voltage[i].floor();
            output[i] = self.amplitude * n_spikes / dt;
            voltage[i] -= n_spikes;
        }
    }

    /// Steady-state rates match the non-spiking rectified line.
    pub fn rates_into(&self, j: &[f64], out: &mut [f64]) {
        RectifiedLinear {
            amplitude: self.amplitude,
        }
        .rates_into(j, out);
    }

    pub fn gain_bias(&self, max_rates: &[f64], intercepts: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        RectifiedLinear {
            amplitude: self.amplitude,
        }
        .gain_bias(max_rates, intercepts)
    }
}

pub(crate) fn check_lengths(max_rates: &[f64], intercepts: &[f64]) -> Result<()> {
    if max_rates.len() != intercepts.len() {
        return Err(NeuralError::SizeMismatch {
            expected: max_rates.len(),
            actual: intercepts.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectified_linear_rates() {
        let model = RectifiedLinear::default();
        let mut out = [0.0; 3];
        model.rates_into(&[-1.0, 0.0, 2.5], &mut out);
        assert_eq!(out, [0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_gain_bias_roundtrip() {
        let model = RectifiedLinear::default();
        let max_rates = [100.0, 250.0, 400.0];
        let intercepts = [-0.8, 0.0, 0.5];
        let (gain, bias) = model.gain_bias(&max_rates, &intercepts).unwrap();
        let (mr, ic) = model.max_rates_intercepts(&gain, &bias);
        for i in 0..3 {
            assert!((mr[i] - max_rates[i]).abs() < 1e-9);
            assert!((ic[i] - intercepts[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spiking_matches_rate_over_one_second() {
        let model = SpikingRectifiedLinear::default();
        let dt = 0.001;
        let j = [120.0];
        let mut voltage = [0.0];
        let mut out = [0.0];

        let mut spikes = 0.0;
        for _ in 0..1000 {
            model.step(dt, &j, &mut voltage, &mut out);
            spikes += out[0] * dt;
        }
        // 120 units of charge in one second -> ~120 spikes
        assert!((spikes - 120.0).abs() <= 1.0, "got {} spikes", spikes);
    }

    #[test]
    fn test_negative_current_holds_voltage() {
        let model = SpikingRectifiedLinear::default();
        let mut voltage = [0.4];
        let mut out = [0.0];
        model.step(0.001, &[-50.0], &mut voltage, &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(voltage[0], 0.4);
    }

    #[test]
    fn test_amplitude_validation() {
        assert!(RectifiedLinear::new(0.0).validate().is_err());
        assert!(SpikingRectifiedLinear::new(2.0).validate().is_ok());
    }
}
