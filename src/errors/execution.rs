// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::errors::{ProcessorError, ValuesError};

/// How a run reacts when a processor fails.
///
/// Dependents of a failed node never execute under either strategy; the strategies
/// differ only in what happens to unrelated branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Cancel every node that has not started yet as soon as one fails
    FailFast,
    /// Let unrelated branches run to completion and report every failure
    #[default]
    ContinueOnError,
}

/// Errors produced while executing a dependency graph.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The processor's own `execute` returned an error
    #[error("Processor '{processor_id}' failed: {source}")]
    ProcessorFailed {
        processor_id: String,
        #[source]
        source: ProcessorError,
    },

    /// A required input was not in the store when the node started
    #[error(
        "Processor '{processor_id}' started without required input '{property}' (global name '{global_name}')"
    )]
    MissingInput {
        processor_id: String,
        property: String,
        global_name: String,
    },

    /// A required output was not returned by the processor
    #[error("Processor '{processor_id}' did not return required output '{property}'")]
    MissingOutput { processor_id: String, property: String },

    /// A returned output's type differs from its declaration
    #[error(
        "Processor '{processor_id}' returned output '{property}' of type {actual}, declared {expected}"
    )]
    OutputTypeMismatch {
        processor_id: String,
        property: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Reading from or writing to the values store failed
    #[error("Processor '{processor_id}' store access failed: {source}")]
    Store {
        processor_id: String,
        #[source]
        source: ValuesError,
    },

    /// The processor task panicked
    #[error("Processor '{processor_id}' panicked: {message}")]
    Panicked { processor_id: String, message: String },

    /// The whole-run deadline expired
    #[error("Execution timed out after {after:?}")]
    TimedOut { after: Duration },

    /// The run was cancelled by its caller
    #[error("Execution was cancelled")]
    Cancelled,

    /// One or more nodes failed; carries every underlying cause
    #[error("{} processor(s) failed{}: {}", count_processors(.failures), format_skipped(.skipped), format_failures(.failures))]
    RunFailed {
        failures: Vec<ExecutionError>,
        skipped: Vec<String>,
    },
}

impl ExecutionError {
    /// The id of the processor a node-level error belongs to
    pub fn processor_id(&self) -> Option<&str> {
        match self {
            ExecutionError::ProcessorFailed { processor_id, .. }
            | ExecutionError::MissingInput { processor_id, .. }
            | ExecutionError::MissingOutput { processor_id, .. }
            | ExecutionError::OutputTypeMismatch { processor_id, .. }
            | ExecutionError::Store { processor_id, .. }
            | ExecutionError::Panicked { processor_id, .. } => Some(processor_id),
            ExecutionError::TimedOut { .. }
            | ExecutionError::Cancelled
            | ExecutionError::RunFailed { .. } => None,
        }
    }

    /// Node-level failures of an aggregated error, or the error itself otherwise
    pub fn failures(&self) -> Vec<&ExecutionError> {
        match self {
            ExecutionError::RunFailed { failures, .. } => failures.iter().collect(),
            other => vec![other],
        }
    }

    /// Ids of nodes that never ran because of an upstream failure or cancellation
    pub fn skipped(&self) -> &[String] {
        match self {
            ExecutionError::RunFailed { skipped, .. } => skipped,
            _ => &[],
        }
    }
}

fn count_processors(failures: &[ExecutionError]) -> usize {
    failures.iter().filter(|e| e.processor_id().is_some()).count()
}

fn format_failures(failures: &[ExecutionError]) -> String {
    failures
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_skipped(skipped: &[String]) -> String {
    if skipped.is_empty() {
        String::new()
    } else {
        format!(" (skipped: {})", skipped.join(", "))
    }
}
