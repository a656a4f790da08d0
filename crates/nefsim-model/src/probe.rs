// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Data probes
//!
//! Probes record a signal over the course of a run: a node's output, an
//! ensemble's decoded value, or raw spike impulses. Decoded probes get
//! their own identity decoders at build time, independent of any
//! connection.

use crate::ids::{EnsembleId, NodeId};
use crate::synapse::Synapse;

/// What a probe records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    /// The ensemble's decoded (represented) value.
    Decoded(EnsembleId),
    /// Raw spike impulses, one channel per neuron.
    Spikes(EnsembleId),
    /// A node's output signal.
    Node(NodeId),
}

/// A recording attachment.
#[derive(Debug, Clone)]
pub struct Probe {
    pub label: Option<String>,
    pub target: ProbeTarget,
    /// Optional filter on the recorded signal; decoded probes usually use a
    /// short lowpass to smooth spike noise.
    pub synapse: Option<Synapse>,
    /// Sampling interval in seconds; `None` records every timestep.
    pub sample_every: Option<f64>,
}

impl Probe {
    pub fn new(target: ProbeTarget) -> Self {
        Self {
            label: None,
            target,
            synapse: None,
            sample_every: None,
        }
    }

    /// Decoded-value probe with a smoothing lowpass.
    pub fn decoded(ensemble: EnsembleId, synapse_tau: f64) -> Self {
        Self::new(ProbeTarget::Decoded(ensemble)).with_synapse(Synapse::lowpass(synapse_tau))
    }

    /// Unfiltered node-output probe.
    pub fn node(node: NodeId) -> Self {
        Self::new(ProbeTarget::Node(node))
    }

    /// Raw spike probe.
    pub fn spikes(ensemble: EnsembleId) -> Self {
        Self::new(ProbeTarget::Spikes(ensemble))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_synapse(mut self, synapse: Synapse) -> Self {
        self.synapse = Some(synapse);
        self
    }

    pub fn with_sample_every(mut self, interval: f64) -> Self {
        self.sample_every = Some(interval);
        self
    }
}
