// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic input processes
//!
//! A [`Process`] is sampled once per timestep to produce a node's output.
//! Processes are pure functions of time; stochastic inputs are out of scope.

use crate::error::{ModelError, Result};

/// Deterministic signal generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Process {
    /// Constant output.
    Constant(Vec<f64>),
    /// Step schedule; see [`Piecewise`].
    Piecewise(Piecewise),
}

impl Process {
    /// Shorthand for a constant scalar output.
    pub fn constant(value: f64) -> Self {
        Process::Constant(vec![value])
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Process::Constant(v) => v.len(),
            Process::Piecewise(p) => p.dimensions(),
        }
    }

    /// Sample the process at time `t`.
    pub fn sample_into(&self, t: f64, out: &mut [f64]) {
        match self {
            Process::Constant(v) => out.copy_from_slice(v),
            Process::Piecewise(p) => p.sample_into(t, out),
        }
    }
}

/// A step schedule: the output at time `t` is the value of the last step
/// whose time is `<= t`, and zero before the first step.
#[derive(Debug, Clone, PartialEq)]
pub struct Piecewise {
    steps: Vec<PiecewiseStep>,
    dimensions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseStep {
    pub time: f64,
    pub value: Vec<f64>,
}

impl Piecewise {
    /// Build a schedule from `(time, value)` pairs.
    ///
    /// Times must be finite, non-negative, and strictly increasing; all
    /// values must share one dimensionality.
    pub fn new(steps: Vec<(f64, Vec<f64>)>) -> Result<Self> {
        if steps.is_empty() {
            return Err(ModelError::InvalidPiecewise("no steps given".into()));
        }
        let dimensions = steps[0].1.len();
        if dimensions == 0 {
            return Err(ModelError::InvalidPiecewise("zero-dimensional value".into()));
        }

        let mut prev = f64::NEG_INFINITY;
        for (time, value) in &steps {
            if !time.is_finite() || *time < 0.0 {
                return Err(ModelError::InvalidPiecewise(format!(
                    "step time {} is not a non-negative finite number",
                    time
                )));
            }
            if *time <= prev {
                return Err(ModelError::InvalidPiecewise(format!(
                    "step times must be strictly increasing ({} after {})",
                    time, prev
                )));
            }
            if value.len() != dimensions {
                return Err(ModelError::InvalidPiecewise(format!(
                    "value at t={} has {} dimensions, expected {}",
                    time,
                    value.len(),
                    dimensions
                )));
            }
            prev = *time;
        }

        Ok(Self {
            steps: steps
                .into_iter()
                .map(|(time, value)| PiecewiseStep { time, value })
                .collect(),
            dimensions,
        })
    }

    /// Build a one-dimensional schedule from `(time, value)` pairs.
    pub fn scalar(steps: &[(f64, f64)]) -> Result<Self> {
        Self::new(steps.iter().map(|&(t, v)| (t, vec![v])).collect())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn steps(&self) -> &[PiecewiseStep] {
        &self.steps
    }

    pub fn sample_into(&self, t: f64, out: &mut [f64]) {
        // Index of the first step strictly after t
        let idx = self.steps.partition_point(|s| s.time <= t);
        if idx == 0 {
            out.fill(0.0);
        } else {
            out.copy_from_slice(&self.steps[idx - 1].value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(p: &Piecewise, t: f64) -> f64 {
        let mut out = [0.0];
        p.sample_into(t, &mut out);
        out[0]
    }

    #[test]
    fn test_piecewise_step_semantics() {
        let p = Piecewise::scalar(&[(0.2, 1.0), (1.0, 0.0), (2.0, -2.0)]).unwrap();
        assert_eq!(sample(&p, 0.0), 0.0, "zero before the first step");
        assert_eq!(sample(&p, 0.1999), 0.0);
        assert_eq!(sample(&p, 0.2), 1.0, "boundary is inclusive");
        assert_eq!(sample(&p, 0.5), 1.0);
        assert_eq!(sample(&p, 1.5), 0.0);
        assert_eq!(sample(&p, 2.0), -2.0);
        assert_eq!(sample(&p, 100.0), -2.0, "last value holds");
    }

    #[test]
    fn test_piecewise_rejects_bad_schedules() {
        assert!(Piecewise::scalar(&[]).is_err());
        assert!(Piecewise::scalar(&[(1.0, 0.0), (1.0, 2.0)]).is_err());
        assert!(Piecewise::scalar(&[(2.0, 0.0), (1.0, 2.0)]).is_err());
        assert!(Piecewise::scalar(&[(-1.0, 0.0)]).is_err());
        assert!(Piecewise::new(vec![(0.0, vec![1.0]), (1.0, vec![1.0, 2.0])]).is_err());
    }

    #[test]
    fn test_constant_process() {
        let p = Process::constant(3.5);
        assert_eq!(p.dimensions(), 1);
        let mut out = [0.0];
        p.sample_into(42.0, &mut out);
        assert_eq!(out[0], 3.5);
    }
}
