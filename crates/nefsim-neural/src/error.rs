// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural computation

/// Error types for neural computation
#[derive(Debug, Clone, thiserror::Error)]
pub enum NeuralError {
    #[error("invalid `{attr}`: {msg}")]
    InvalidParameter { attr: &'static str, msg: String },

    #[error("array size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("could not find firing threshold for rate curve")]
    ThresholdNotFound,

    #[error("could not find current achieving max rate {0}")]
    MaxCurrentNotFound(f64),
}

impl NeuralError {
    /// Shorthand for parameter-validation failures.
    pub fn invalid(attr: &'static str, msg: impl Into<String>) -> Self {
        NeuralError::InvalidParameter {
            attr,
            msg: msg.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, NeuralError>;
