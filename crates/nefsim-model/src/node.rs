// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Input nodes

use crate::error::{ModelError, Result};
use crate::process::Process;

/// A non-neural signal source driven by a [`Process`].
#[derive(Debug, Clone)]
pub struct Node {
    pub label: Option<String>,
    pub output: Process,
}

impl Node {
    pub fn new(output: Process) -> Self {
        Self {
            label: None,
            output,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or("<node>")
    }

    pub fn dimensions(&self) -> usize {
        self.output.dimensions()
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimensions() == 0 {
            return Err(ModelError::EmptyNodeOutput(self.name().to_string()));
        }
        Ok(())
    }
}
