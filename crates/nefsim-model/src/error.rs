// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for network descriptions

use crate::ids::{EnsembleId, NodeId};

/// Structural errors found while building or validating a network.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("ensemble `{0}` has zero neurons")]
    ZeroNeurons(String),

    #[error("ensemble `{0}` has zero dimensions")]
    ZeroDimensions(String),

    #[error("ensemble `{0}` has non-positive radius")]
    InvalidRadius(String),

    #[error("distribution bounds inverted: low {low} >= high {high}")]
    InvalidDistribution { low: f64, high: f64 },

    #[error("ensemble not found: {0}")]
    EnsembleNotFound(EnsembleId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("connection `{connection}` dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        connection: String,
        expected: usize,
        actual: usize,
    },

    #[error("synapse time constant must be > 0, got {0}")]
    InvalidSynapse(f64),

    #[error("connection `{0}` is recurrent and needs a synapse")]
    RecurrentWithoutSynapse(String),

    #[error("connection `{0}` applies a decoded function to a node source")]
    FunctionOnNodeSource(String),

    #[error("invalid piecewise schedule: {0}")]
    InvalidPiecewise(String),

    #[error("probe sample interval must be > 0, got {0}")]
    InvalidSampleInterval(f64),

    #[error("node `{0}` produces zero dimensions")]
    EmptyNodeOutput(String),

    #[error(transparent)]
    Neural(#[from] nefsim_neural::NeuralError),
}

pub type Result<T> = core::result::Result<T, ModelError>;
