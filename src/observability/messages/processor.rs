// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processor execution events.
//!
//! This module contains message types for logging events related to:
//! * Processor execution lifecycle (start, completion, failure)
//! * Output write-back into the values store

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Processor execution started.
///
/// # Log Level
/// `debug!` - Per-node detail
///
/// # Example
/// ```
/// use processor_graph::observability::messages::processor::ProcessorExecutionStarted;
///
/// let msg = ProcessorExecutionStarted {
///     processor_id: "createMap",
///     input_count: 3,
/// };
///
/// assert_eq!(msg.to_string(), "Processor 'createMap' execution started: 3 inputs");
/// ```
pub struct ProcessorExecutionStarted<'a> {
    pub processor_id: &'a str,
    pub input_count: usize,
}

impl Display for ProcessorExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution started: {} inputs",
            self.processor_id, self.input_count
        )
    }
}

impl StructuredLog for ProcessorExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_id = self.processor_id,
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}

/// Processor execution completed and its outputs were written.
///
/// # Log Level
/// `debug!` - Per-node detail
pub struct ProcessorExecutionCompleted<'a> {
    pub processor_id: &'a str,
    pub output_count: usize,
    pub duration: std::time::Duration,
}

impl Display for ProcessorExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' completed: {} outputs written in {:?}",
            self.processor_id, self.output_count, self.duration
        )
    }
}

impl StructuredLog for ProcessorExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            processor_id = self.processor_id,
            output_count = self.output_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "processor_completed",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}

/// Processor execution failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ProcessorExecutionFailed<'a> {
    pub processor_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' execution failed: {}",
            self.processor_id, self.error
        )
    }
}

impl StructuredLog for ProcessorExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            processor_id = self.processor_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "processor_failed",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}

/// A processor returned an output it never declared; the entry is dropped.
///
/// # Log Level
/// `warn!` - Misbehaving processor
pub struct UndeclaredOutputIgnored<'a> {
    pub processor_id: &'a str,
    pub property: &'a str,
}

impl Display for UndeclaredOutputIgnored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Processor '{}' returned undeclared output '{}', ignoring it",
            self.processor_id, self.property
        )
    }
}

impl StructuredLog for UndeclaredOutputIgnored<'_> {
    fn log(&self) {
        tracing::warn!(
            processor_id = self.processor_id,
            property = self.property,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "undeclared_output",
            span_name = name,
            processor_id = self.processor_id,
        )
    }
}
