// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion and failure
//! * Nodes skipped because a dependency failed or the run was cancelled
//! * Whole-run deadline expiry

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use processor_graph::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     node_count: 5,
///     root_count: 2,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionStarted {
    pub node_count: usize,
    pub root_count: usize,
    pub max_concurrency: usize,
}

impl Display for ExecutionStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting graph execution: {} processors, {} roots, max_concurrency={}",
            self.node_count, self.root_count, self.max_concurrency
        )
    }
}

impl StructuredLog for ExecutionStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            root_count = self.root_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            node_count = self.node_count,
            root_count = self.root_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionCompleted {
    pub node_count: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph execution completed: {} processors in {:?}",
            self.node_count, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            node_count = self.node_count,
            duration = ?self.duration,
        )
    }
}

/// Execution finished with failures.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub failure_count: usize,
    pub skipped_count: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph execution failed: {} failure(s), {} skipped: {}",
            self.failure_count, self.skipped_count, self.error
        )
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            failure_count = self.failure_count,
            skipped_count = self.skipped_count,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            failure_count = self.failure_count,
            skipped_count = self.skipped_count,
        )
    }
}

/// A node was not executed.
///
/// # Log Level
/// `warn!` - Degraded run
pub struct NodeSkipped<'a> {
    pub processor_id: &'a str,
    pub reason: &'a str,
}

impl Display for NodeSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping processor '{}': {}", self.processor_id, self.reason)
    }
}

impl StructuredLog for NodeSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            processor_id = self.processor_id,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "node_skipped",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}

/// The whole-run deadline expired and the run was cancelled.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DeadlineExceeded {
    pub timeout: Duration,
}

impl Display for DeadlineExceeded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph execution exceeded its deadline of {:?}, cancelling", self.timeout)
    }
}

impl StructuredLog for DeadlineExceeded {
    fn log(&self) {
        tracing::error!(timeout_ms = self.timeout.as_millis() as u64, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("deadline_exceeded", span_name = name, timeout = ?self.timeout)
    }
}
