// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # nefsim Engine
//!
//! Turns a validated network description into a runnable simulation.
//!
//! ## Two phases
//! - **Build**: sample encoders and tuning parameters, evaluate tuning
//!   curves, solve decoders by regularized least squares. Deterministic
//!   under a fixed seed.
//! - **Run**: fixed-timestep loop. Node sampling, synaptic filtering,
//!   current computation, neuron stepping, probe recording. The neuron
//!   path allocates nothing per step.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod builder;

pub mod error;
pub mod probe_data;
pub mod sampling;
pub mod simulator;
pub mod solver;

pub use error::{EngineError, Result};
pub use probe_data::ProbeRecord;
pub use simulator::Simulator;
pub use solver::lstsq_l2;

/// Aggregate statistics for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimStats {
    pub steps: u64,
    pub spikes_emitted: u64,
    pub wall_time_us: u64,
}

impl SimStats {
    /// Average spikes per timestep across the whole population.
    pub fn avg_spikes_per_step(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.spikes_emitted as f64 / self.steps as f64
        }
    }

    /// Average wall time per step, in microseconds.
    pub fn avg_step_time_us(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.wall_time_us as f64 / self.steps as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_averages() {
        let stats = SimStats {
            steps: 1000,
            spikes_emitted: 42_000,
            wall_time_us: 5_000,
        };
        assert_eq!(stats.avg_spikes_per_step(), 42.0);
        assert_eq!(stats.avg_step_time_us(), 5.0);

        let empty = SimStats::default();
        assert_eq!(empty.avg_spikes_per_step(), 0.0);
    }
}
