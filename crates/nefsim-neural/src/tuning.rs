// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Response-curve math shared across neuron models
//!
//! Models with a closed-form rate equation solve gain/bias analytically; the
//! rest go through [`gain_bias_from_rates`], which inverts an empirically
//! sampled rate curve. [`settled_firing_rate`] estimates steady-state rates
//! for models whose transient dynamics would otherwise bias a naive
//! one-second average.

use crate::error::{NeuralError, Result};

/// `n` evenly spaced values over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// One-dimensional linear interpolation over ascending `xs`.
///
/// Values outside the range clamp to the boundary `ys`, matching the
/// convention of numpy's `interp`.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    // Find the first knot above x.
    let hi = xs.partition_point(|&v| v < x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return ys[lo];
    }
    let frac = (x - xs[lo]) / span;
    ys[lo] + frac * (ys[hi] - ys[lo])
}

/// Average firing rate after transients settle.
///
/// Runs `step(dt, output)` for `settle_time` to let initial transients die
/// out, then accumulates the output over `sim_time` and returns the mean.
/// The step closure owns whatever state the model needs.
pub fn settled_firing_rate<F>(
    mut step: F,
    n_neurons: usize,
    dt: f64,
    settle_time: f64,
    sim_time: f64,
) -> Vec<f64>
where
    F: FnMut(f64, &mut [f64]),
{
    let mut out = vec![0.0; n_neurons];
    let mut total = vec![0.0; n_neurons];

    let settle_steps = (settle_time / dt) as usize;
    for _ in 0..settle_steps {
        step(dt, &mut out);
    }

    let sim_steps = (sim_time / dt) as usize;
    for _ in 0..sim_steps {
        step(dt, &mut out);
        for (t, o) in total.iter_mut().zip(out.iter()) {
            *t += o;
        }
    }
    for t in total.iter_mut() {
        *t /= sim_steps as f64;
    }
    total
}

/// Derive gain and bias by inverting a sampled rate curve.
///
/// `rates_fn` evaluates steady-state rates for raw currents (gain 1, bias 0,
/// so input equals current). The curve is assumed monotonic. The search
/// brackets the firing threshold and the current achieving the largest
/// requested rate, widening the scan window up to ten times before giving up.
pub fn gain_bias_from_rates<F>(
    rates_fn: F,
    max_rates: &[f64],
    intercepts: &[f64],
) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    if max_rates.len() != intercepts.len() {
        return Err(NeuralError::SizeMismatch {
            expected: max_rates.len(),
            actual: intercepts.len(),
        });
    }

    const J_STEPS: usize = 101; // odd so that 0 is a sample
    let top_rate = max_rates.iter().cloned().fold(f64::MIN, f64::max);

    let mut j_threshold = None;
    let mut j_max = None;
    let mut jr = 10.0;
    for _ in 0..10 {
        let j = linspace(-jr, jr, J_STEPS);
        let rate = rates_fn(&j);
        if j_threshold.is_none() {
            if let Some(idx) = rate.iter().rposition(|&r| r <= 0.0) {
                j_threshold = Some(j[idx]);
            }
        }
        if j_max.is_none() {
            if let Some(idx) = rate.iter().position(|&r| r >= top_rate) {
                j_max = Some(j[idx]);
            }
        }
        if j_threshold.is_some() && j_max.is_some() {
            break;
        }
        jr *= 2.0;
    }
    let j_threshold = j_threshold.ok_or(NeuralError::ThresholdNotFound)?;
    let j_max = j_max.ok_or(NeuralError::MaxCurrentNotFound(top_rate))?;

    let j = linspace(j_threshold, j_max, J_STEPS);
    let rate = rates_fn(&j);

    let mut gain = Vec::with_capacity(max_rates.len());
    let mut bias = Vec::with_capacity(max_rates.len());
    for (&max_rate, &intercept) in max_rates.iter().zip(intercepts.iter()) {
        let j_top = interp(max_rate, &rate, &j);
        let g = (j_threshold - j_top) / (intercept - 1.0);
        gain.push(g);
        bias.push(j_top - g);
    }
    Ok((gain, bias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-2.0, 2.0, 5);
        assert_eq!(v, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    }

    #[test]
    fn test_interp_midpoint_and_clamp() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 40.0];
        assert!((interp(0.5, &xs, &ys) - 5.0).abs() < 1e-12);
        assert!((interp(1.5, &xs, &ys) - 25.0).abs() < 1e-12);
        // Outside the range clamps
        assert_eq!(interp(-1.0, &xs, &ys), 0.0);
        assert_eq!(interp(5.0, &xs, &ys), 40.0);
    }

    #[test]
    fn test_gain_bias_from_rates_linear_curve() {
        // Rate curve of a rectified line: r = max(0, J). The inversion should
        // land each neuron at rate max_rate for input 1 and zero at the
        // intercept.
        let rates_fn = |j: &[f64]| j.iter().map(|&v| v.max(0.0)).collect::<Vec<_>>();
        let max_rates = [100.0, 200.0];
        let intercepts = [0.0, -0.5];
        let (gain, bias) = gain_bias_from_rates(rates_fn, &max_rates, &intercepts).unwrap();

        for i in 0..2 {
            let at_one = gain[i] * 1.0 + bias[i];
            let at_intercept = gain[i] * intercepts[i] + bias[i];
            assert!(
                (at_one - max_rates[i]).abs() / max_rates[i] < 0.05,
                "rate at x=1 should be near max_rate, got {}",
                at_one
            );
            assert!(at_intercept.abs() < 1.0, "near-zero at intercept");
        }
    }

    #[test]
    fn test_settled_firing_rate_constant_output() {
        // A "model" that always reports 42 Hz settles to exactly that.
        let rates = settled_firing_rate(|_dt, out| out.fill(42.0), 4, 0.001, 0.1, 1.0);
        assert!(rates.iter().all(|&r| (r - 42.0).abs() < 1e-9));
    }
}
