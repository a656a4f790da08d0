// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nefsim - NEF-style Spiking Neural Network Simulation
//!
//! nefsim builds and runs networks of spiking neuron populations that
//! collectively represent and transform vectors: encoders map represented
//! values to neuron currents, decoders (solved by regularized least
//! squares) map spike trains back to values, and synaptic filters carry
//! signals between populations.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! nefsim = "0.1"
//! ```
//!
//! ```rust,no_run
//! use nefsim::prelude::*;
//!
//! // A 1-D population integrating its input
//! let mut net = Network::new("integrator").with_seed(1);
//! let ens = net.add_ensemble(Ensemble::new(100, 1));
//! let input = net.add_node(Node::new(Process::constant(0.5)));
//!
//! net.connect(Connection::new(ens, ens).with_synapse(Synapse::lowpass(0.1)));
//! net.connect(Connection::new(input, ens).with_synapse(Synapse::lowpass(0.1)).scaled(0.1));
//! let probe = net.probe(Probe::decoded(ens, 0.01));
//!
//! let mut sim = Simulator::new(&net)?;
//! sim.run(1.0);
//! let record = sim.probe_record(probe)?;
//! println!("integrated to {:?}", record.last());
//! # Ok::<(), nefsim::engine::EngineError>(())
//! ```
//!
//! ## Components
//!
//! - [`neural`]: neuron models (LIF, rectified linear, Izhikevich) and
//!   tuning math
//! - [`model`]: network descriptions (ensembles, nodes, connections,
//!   probes)
//! - [`engine`]: the build step (encoders/decoders) and the time-stepped
//!   simulator
//! - [`config`] (feature `config`, on by default): TOML + environment
//!   configuration for the demo runners

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nefsim_engine as engine;
pub use nefsim_model as model;
pub use nefsim_neural as neural;

#[cfg(feature = "config")]
pub use nefsim_config as config;

/// The common imports for building and running networks.
pub mod prelude {
    pub use nefsim_engine::{ProbeRecord, SimStats, Simulator};
    pub use nefsim_model::{
        Connection, Distribution, Ensemble, Network, Node, Piecewise, Probe, ProbeId,
        ProbeTarget, Process, Synapse, Transform,
    };
    pub use nefsim_neural::{Lif, LifRate, NeuronModel, RectifiedLinear};
}
