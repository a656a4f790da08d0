// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The network arena
//!
//! Objects are added through builder-style methods that hand back typed
//! ids. `validate()` checks the whole structure at once and is what the
//! engine calls before building; the add methods themselves stay cheap.

use crate::connection::{ConnSource, Connection, Transform};
use crate::ensemble::Ensemble;
use crate::error::{ModelError, Result};
use crate::ids::{ConnectionId, EnsembleId, NodeId, ProbeId};
use crate::node::Node;
use crate::probe::{Probe, ProbeTarget};

/// A complete network description.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub label: Option<String>,
    /// Build-time sampling seed; ensembles without their own seed derive
    /// one from this.
    pub seed: Option<u64>,
    ensembles: Vec<Ensemble>,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    probes: Vec<Probe>,
}

impl Network {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn add_ensemble(&mut self, ensemble: Ensemble) -> EnsembleId {
        self.ensembles.push(ensemble);
        EnsembleId((self.ensembles.len() - 1) as u32)
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    pub fn connect(&mut self, connection: Connection) -> ConnectionId {
        self.connections.push(connection);
        ConnectionId((self.connections.len() - 1) as u32)
    }

    pub fn probe(&mut self, probe: Probe) -> ProbeId {
        self.probes.push(probe);
        ProbeId((self.probes.len() - 1) as u32)
    }

    pub fn ensembles(&self) -> &[Ensemble] {
        &self.ensembles
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn ensemble(&self, id: EnsembleId) -> Result<&Ensemble> {
        self.ensembles
            .get(id.index())
            .ok_or(ModelError::EnsembleNotFound(id))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.index()).ok_or(ModelError::NodeNotFound(id))
    }

    /// Dimensionality of a connection source's raw output (before any
    /// function or transform).
    pub fn source_dims(&self, source: ConnSource) -> Result<usize> {
        match source {
            ConnSource::Node(id) => Ok(self.node(id)?.dimensions()),
            ConnSource::Ensemble(id) => Ok(self.ensemble(id)?.dimensions),
        }
    }

    /// Check the whole structure; returns the first error found.
    pub fn validate(&self) -> Result<()> {
        for ensemble in &self.ensembles {
            ensemble.validate()?;
        }
        for node in &self.nodes {
            node.validate()?;
        }
        for connection in &self.connections {
            self.validate_connection(connection)?;
        }
        for probe in &self.probes {
            self.validate_probe(probe)?;
        }
        Ok(())
    }

    fn validate_connection(&self, connection: &Connection) -> Result<()> {
        let source_dims = self.source_dims(connection.pre)?;
        let post = self.ensemble(connection.post)?;

        if let Some(synapse) = connection.synapse {
            synapse.validate()?;
        } else if connection.is_recurrent() {
            // The feedback delay comes from the synapse state.
            return Err(ModelError::RecurrentWithoutSynapse(connection.name()));
        }

        if connection.function.is_some() && matches!(connection.pre, ConnSource::Node(_)) {
            return Err(ModelError::FunctionOnNodeSource(connection.name()));
        }

        let value_dims = match &connection.function {
            Some(f) => f.output_dims,
            None => source_dims,
        };

        match &connection.transform {
            Transform::Identity | Transform::Scalar(_) => {
                if value_dims != post.dimensions {
                    return Err(ModelError::DimensionMismatch {
                        connection: connection.name(),
                        expected: post.dimensions,
                        actual: value_dims,
                    });
                }
            }
            Transform::Matrix(rows) => {
                if rows.len() != post.dimensions {
                    return Err(ModelError::DimensionMismatch {
                        connection: connection.name(),
                        expected: post.dimensions,
                        actual: rows.len(),
                    });
                }
                if let Some(row) = rows.iter().find(|r| r.len() != value_dims) {
                    return Err(ModelError::DimensionMismatch {
                        connection: connection.name(),
                        expected: value_dims,
                        actual: row.len(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_probe(&self, probe: &Probe) -> Result<()> {
        match probe.target {
            ProbeTarget::Decoded(id) | ProbeTarget::Spikes(id) => {
                self.ensemble(id)?;
            }
            ProbeTarget::Node(id) => {
                self.node(id)?;
            }
        }
        if let Some(synapse) = probe.synapse {
            synapse.validate()?;
        }
        if let Some(interval) = probe.sample_every {
            if !(interval > 0.0) || !interval.is_finite() {
                return Err(ModelError::InvalidSampleInterval(interval));
            }
        }
        Ok(())
    }
}
