// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # nefsim Network Description
//!
//! Declarative network objects and nothing else: no sampling, no decoder
//! solving, no stepping. A [`Network`] is an arena of ensembles, nodes,
//! connections, and probes addressed by typed ids; `nefsim-engine` turns a
//! validated network into something runnable.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connection;
pub mod ensemble;
pub mod error;
pub mod ids;
pub mod network;
pub mod node;
pub mod probe;
pub mod process;
pub mod synapse;

pub use connection::{ConnSource, Connection, DecodedFunction, Transform};
pub use ensemble::{Distribution, Ensemble};
pub use error::{ModelError, Result};
pub use ids::{ConnectionId, EnsembleId, NodeId, ProbeId};
pub use network::Network;
pub use node::Node;
pub use probe::{Probe, ProbeTarget};
pub use process::{Piecewise, Process};
pub use synapse::{FilterState, Synapse};
