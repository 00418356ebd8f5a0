// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::ValuesError;

/// Error returned by a processor's `execute`.
///
/// Processors report domain failures with [`ProcessorError::Failed`] or wrap any
/// other error through `anyhow`; the engine keeps the value intact so callers can
/// inspect every node's original cause.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Reading a property from the input failed
    #[error("invalid input: {0}")]
    Input(#[from] ValuesError),

    /// The run was cancelled while the processor was working
    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcessorError {
    pub fn failed(message: impl Into<String>) -> Self {
        ProcessorError::Failed(message.into())
    }
}
