// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # nefsim Neural Computation
//!
//! ALL neuron-level computation in one place:
//! - **Models**: Neuron models (LIF, rectified linear, Izhikevich)
//! - **State**: Per-population state arrays stepped in batch
//! - **Tuning**: Response-curve math (gain/bias from max rates and intercepts)
//!
//! Currents, rates, and spike outputs follow the population-coding
//! convention: inputs are assumed projected onto encoders and normalized to
//! radius 1, so a neuron's maximum expected current occurs at input 1.
//! Spiking models emit impulses scaled to `amplitude / dt` so that lowpass
//! filtering recovers firing rates in Hz.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod models;
pub mod state;
pub mod tuning;

pub use error::{NeuralError, Result};
pub use models::{
    Izhikevich, Lif, LifRate, NeuronModel, RectifiedLinear, SpikingRectifiedLinear,
};
pub use state::PopulationState;
pub use tuning::{gain_bias_from_rates, interp, linspace, settled_firing_rate};
