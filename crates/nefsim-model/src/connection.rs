// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connections between network objects
//!
//! A connection carries a (possibly function-mapped, transformed, and
//! synapse-filtered) signal from a node or ensemble into an ensemble.
//! Ensemble sources are decoded: the engine solves decoders against the
//! connection's function at build time.

use core::fmt;
use std::sync::Arc;

use crate::ids::{EnsembleId, NodeId};
use crate::synapse::Synapse;

/// The upstream end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnSource {
    Node(NodeId),
    Ensemble(EnsembleId),
}

impl From<NodeId> for ConnSource {
    fn from(id: NodeId) -> Self {
        ConnSource::Node(id)
    }
}

impl From<EnsembleId> for ConnSource {
    fn from(id: EnsembleId) -> Self {
        ConnSource::Ensemble(id)
    }
}

impl fmt::Display for ConnSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnSource::Node(id) => write!(f, "{}", id),
            ConnSource::Ensemble(id) => write!(f, "{}", id),
        }
    }
}

/// Linear map applied after the (decoded) source value.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// No scaling; source and target dimensions must match.
    Identity,
    /// Uniform scaling; source and target dimensions must match.
    Scalar(f64),
    /// Dense matrix, `rows = post dimensions`, `cols = source dimensions`.
    Matrix(Vec<Vec<f64>>),
}

/// A function computed across an ensemble's represented value, realized in
/// the decoders rather than evaluated at runtime.
#[derive(Clone)]
pub struct DecodedFunction {
    /// Output dimensionality of the function.
    pub output_dims: usize,
    func: Arc<dyn Fn(&[f64], &mut [f64]) + Send + Sync>,
}

impl DecodedFunction {
    pub fn new(output_dims: usize, func: impl Fn(&[f64], &mut [f64]) + Send + Sync + 'static) -> Self {
        Self {
            output_dims,
            func: Arc::new(func),
        }
    }

    pub fn eval_into(&self, x: &[f64], out: &mut [f64]) {
        (self.func)(x, out)
    }
}

impl fmt::Debug for DecodedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedFunction")
            .field("output_dims", &self.output_dims)
            .finish_non_exhaustive()
    }
}

/// A signal path into an ensemble.
#[derive(Debug, Clone)]
pub struct Connection {
    pub label: Option<String>,
    pub pre: ConnSource,
    pub post: EnsembleId,
    /// Synaptic filter on the carried signal. Required (by validation) on
    /// recurrent connections, where it provides the feedback delay.
    pub synapse: Option<Synapse>,
    pub transform: Transform,
    /// Decoded function; ensemble sources only. `None` is identity.
    pub function: Option<DecodedFunction>,
    /// L2 regularization for the decoder solve, as a fraction of the peak
    /// tuning-curve activity.
    pub solver_reg: f64,
}

impl Connection {
    pub fn new(pre: impl Into<ConnSource>, post: EnsembleId) -> Self {
        Self {
            label: None,
            pre: pre.into(),
            post,
            synapse: None,
            transform: Transform::Identity,
            function: None,
            solver_reg: 0.1,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_synapse(mut self, synapse: Synapse) -> Self {
        self.synapse = Some(synapse);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Scale the carried signal uniformly.
    pub fn scaled(self, scale: f64) -> Self {
        self.with_transform(Transform::Scalar(scale))
    }

    pub fn with_function(
        mut self,
        output_dims: usize,
        func: impl Fn(&[f64], &mut [f64]) + Send + Sync + 'static,
    ) -> Self {
        self.function = Some(DecodedFunction::new(output_dims, func));
        self
    }

    pub fn with_solver_reg(mut self, reg: f64) -> Self {
        self.solver_reg = reg;
        self
    }

    pub fn name(&self) -> String {
        match &self.label {
            Some(l) => l.clone(),
            None => format!("{}->{}", self.pre, self.post),
        }
    }

    /// Whether this connection feeds an ensemble back into itself.
    pub fn is_recurrent(&self) -> bool {
        matches!(self.pre, ConnSource::Ensemble(id) if id == self.post)
    }
}
