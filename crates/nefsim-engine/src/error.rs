// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for build and simulation

use nefsim_model::ProbeId;

/// Errors raised while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] nefsim_model::ModelError),

    #[error(transparent)]
    Neural(#[from] nefsim_neural::NeuralError),

    #[error("timestep must be > 0 and finite, got {0}")]
    InvalidTimestep(f64),

    #[error("decoder solve failed: gram matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("decoder solve shape mismatch: activities {activities} rows, targets {targets} rows")]
    SolverShapeMismatch { activities: usize, targets: usize },

    #[error("probe not found: {0}")]
    ProbeNotFound(ProbeId),

    #[error("probe export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("probe export failed: {0}")]
    ExportIo(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, EngineError>;
