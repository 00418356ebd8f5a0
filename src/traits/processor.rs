// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::values::{Input, Output};

/// A named, stateless step of a pipeline.
///
/// A processor declares the properties it reads and writes; the graph builder wires
/// processors together purely from those declarations. The same instance is shared
/// by every run of every graph it belongs to.
#[async_trait]
pub trait Processor: Send + Sync {
    fn name(&self) -> &str;

    /// Properties read from the values store, by local name
    fn input_properties(&self) -> Vec<Property>;

    /// Properties written to the values store, by local name
    fn output_properties(&self) -> Vec<Property>;

    async fn execute(&self, input: Input, ctx: &ExecutionContext) -> Result<Output, ProcessorError>;

    /// Processor-specific static checks, folded into graph validation
    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Per-invocation context handed to [`Processor::execute`]
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    processor_id: String,
    cancellation: CancellationToken,
}

impl ExecutionContext {
    pub fn new(processor_id: impl Into<String>, cancellation: CancellationToken) -> Self {
        Self {
            processor_id: processor_id.into(),
            cancellation,
        }
    }

    pub fn processor_id(&self) -> &str {
        &self.processor_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Bail out of long-running work once the run has been cancelled
    pub fn ensure_not_cancelled(&self) -> Result<(), ProcessorError> {
        if self.is_cancelled() {
            Err(ProcessorError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the run is cancelled
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}
