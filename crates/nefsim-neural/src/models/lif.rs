// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # LIF (Leaky Integrate-and-Fire) Neuron Model
//!
//! The LIF model is the default neuron model in nefsim.
//!
//! ## Model Dynamics
//!
//! ```text
//! Membrane voltage (normalized, threshold at 1):
//!     tau_rc dv/dt = J - v
//!
//! Firing check:
//!     if refractory time remains:
//!         integrate only over the portion of dt past the refractory end
//!     if v > 1:
//!         FIRE (impulse amplitude/dt), solve the exact threshold-crossing
//!         time within the step, reset v to 0, hold for tau_ref + t_spike
//! ```
//!
//! The closed-form steady-state rate for constant current J > 1 is
//! `amplitude / (tau_ref + tau_rc * ln(1 + 1/(J-1)))`, which [`LifRate`]
//! uses directly and the spiking model converges to.

use super::rectified_linear::check_lengths;
use crate::error::{NeuralError, Result};

/// Non-spiking LIF: emits the closed-form rate every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifRate {
    /// Membrane RC time constant, in seconds.
    pub tau_rc: f64,
    /// Absolute refractory period, in seconds.
    pub tau_ref: f64,
    /// Scaling factor on the neuron output.
    pub amplitude: f64,
}

impl Default for LifRate {
    fn default() -> Self {
        Self {
            tau_rc: 0.02,
            tau_ref: 0.002,
            amplitude: 1.0,
        }
    }
}

impl LifRate {
    pub fn validate(&self) -> Result<()> {
        if self.tau_rc <= 0.0 {
            return Err(NeuralError::invalid("tau_rc", "must be > 0"));
        }
        if self.tau_ref < 0.0 {
            return Err(NeuralError::invalid("tau_ref", "must be >= 0"));
        }
        if self.amplitude <= 0.0 {
            return Err(NeuralError::invalid("amplitude", "must be > 0"));
        }
        Ok(())
    }

    #[inline]
    pub fn step(&self, j: &[f64], output: &mut [f64]) {
        self.rates_into(j, output);
    }

    pub fn rates_into(&self, j: &[f64], out: &mut [f64]) {
        for (o, &ji) in out.iter_mut().zip(j.iter()) {
            let x = ji - 1.0;
            *o = if x > 0.0 {
                self.amplitude / (self.tau_ref + self.tau_rc * (1.0 / x).ln_1p())
            } else {
                0.0
            };
        }
    }

    /// Analytically determine gain and bias.
    pub fn gain_bias(&self, max_rates: &[f64], intercepts: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        check_lengths(max_rates, intercepts)?;

        let rate_limit = if self.tau_ref > 0.0 {
            1.0 / self.tau_ref
        } else {
            f64::INFINITY
        };
        if let Some(&bad) = max_rates.iter().find(|&&r| r > rate_limit) {
            return Err(NeuralError::invalid(
                "max_rates",
                format!(
                    "rate {:.3} exceeds the inverse refractory period ({:.3})",
                    bad, rate_limit
                ),
            ));
        }

        let mut gain = Vec::with_capacity(max_rates.len());
        let mut bias = Vec::with_capacity(max_rates.len());
        for (&max_rate, &intercept) in max_rates.iter().zip(intercepts.iter()) {
            let x = 1.0 / (1.0 - ((self.tau_ref - 1.0 / max_rate) / self.tau_rc).exp());
            let g = (1.0 - x) / (intercept - 1.0);
            gain.push(g);
            bias.push(1.0 - g * intercept);
        }
        Ok((gain, bias))
    }

    /// Compute the inverse of `gain_bias`.
    pub fn max_rates_intercepts(&self, gain: &[f64], bias: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut max_rates = Vec::with_capacity(gain.len());
        let mut intercepts = Vec::with_capacity(gain.len());
        for (&g, &b) in gain.iter().zip(bias.iter()) {
            let intercept = (1.0 - b) / g;
            let rate =
                1.0 / (self.tau_ref - self.tau_rc * (1.0 / (g * (intercept - 1.0) - 1.0)).ln_1p());
            intercepts.push(intercept);
            max_rates.push(rate);
        }
        (max_rates, intercepts)
    }
}

/// Spiking LIF neuron model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lif {
    /// Membrane RC time constant, in seconds.
    pub tau_rc: f64,
    /// Absolute refractory period, in seconds.
    pub tau_ref: f64,
    /// Floor on the membrane voltage.
    pub min_voltage: f64,
    /// Scaling factor on the output spike impulses.
    pub amplitude: f64,
}

impl Default for Lif {
    fn default() -> Self {
        Self {
            tau_rc: 0.02,
            tau_ref: 0.002,
            min_voltage: 0.0,
            amplitude: 1.0,
        }
    }
}

impl Lif {
    pub fn validate(&self) -> Result<()> {
        if self.min_voltage > 0.0 {
            return Err(NeuralError::invalid("min_voltage", "must be <= 0"));
        }
        self.as_rate().validate()
    }

    fn as_rate(&self) -> LifRate {
        LifRate {
            tau_rc: self.tau_rc,
            tau_ref: self.tau_ref,
            amplitude: self.amplitude,
        }
    }

    /// Advance one timestep.
    ///
    /// Refractory times that end midway through the step integrate over the
    /// remaining partial timestep. On firing, the exact in-step crossing
    /// time extends the refractory hold so spike timing stays unbiased by dt.
    #[inline]
    pub fn step(
        &self,
        dt: f64,
        j: &[f64],
        voltage: &mut [f64],
        refractory: &mut [f64],
        output: &mut [f64],
    ) {
        for i in 0..j.len() {
            let r = refractory[i] - dt;
            let delta_t = (dt - r).clamp(0.0, dt);

            // v(t + dt) = v + (J - v)(1 - exp(-dt/tau)), J constant over the step
            let mut v = voltage[i] - (j[i] - voltage[i]) * (-delta_t / self.tau_rc).exp_m1();
            let mut r_next = r;

            if v > 1.0 {
                output[i] = self.amplitude / dt;
                // Solve v(t_spike) = 1 for the crossing time within the step
                let t_spike = dt + self.tau_rc * (-(v - 1.0) / (j[i] - 1.0)).ln_1p();
                r_next = self.tau_ref + t_spike;
                v = 0.0;
            } else {
                output[i] = 0.0;
                if v < self.min_voltage {
                    v = self.min_voltage;
                }
            }

            voltage[i] = v;
            refractory[i] = r_next;
        }
    }

    /// Steady-state rates from the closed form.
    pub fn rates_into(&self, j: &[f64], out: &mut [f64]) {
        self.as_rate().rates_into(j, out);
    }

    pub fn gain_bias(&self, max_rates: &[f64], intercepts: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        self.as_rate().gain_bias(max_rates, intercepts)
    }

    pub fn max_rates_intercepts(&self, gain: &[f64], bias: &[f64]) -> (Vec<f64>, Vec<f64>) {
        self.as_rate().max_rates_intercepts(gain, bias)
    }
}
