// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph building and validation.
//!
//! This module contains message types for logging events related to:
//! * Dependency inference from processor declarations
//! * Validation failures (one event per problem found)
//! * The shape of a successfully built graph

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Graph building started.
///
/// # Log Level
/// `debug!` - Build-time detail
pub struct GraphBuildStarted {
    pub processor_count: usize,
    pub external_count: usize,
}

impl Display for GraphBuildStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Building dependency graph for {} processors with {} external values",
            self.processor_count, self.external_count
        )
    }
}

impl StructuredLog for GraphBuildStarted {
    fn log(&self) {
        tracing::debug!(
            processor_count = self.processor_count,
            external_count = self.external_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_build",
            span_name = name,
            processor_count = self.processor_count,
            external_count = self.external_count,
        )
    }
}

/// Dependency graph built and validated.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use processor_graph::observability::messages::graph::GraphBuilt;
/// use std::time::Duration;
///
/// let msg = GraphBuilt {
///     node_count: 4,
///     root_count: 2,
///     edge_count: 2,
///     duration: Duration::from_micros(80),
/// };
///
/// assert!(msg.to_string().contains("4 nodes"));
/// ```
pub struct GraphBuilt {
    pub node_count: usize,
    pub root_count: usize,
    pub edge_count: usize,
    pub duration: Duration,
}

impl Display for GraphBuilt {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dependency graph built: {} nodes, {} roots, {} edges in {:?}",
            self.node_count, self.root_count, self.edge_count, self.duration
        )
    }
}

impl StructuredLog for GraphBuilt {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            root_count = self.root_count,
            edge_count = self.edge_count,
            duration_us = self.duration.as_micros() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "graph_built",
            span_name = name,
            node_count = self.node_count,
            root_count = self.root_count,
            edge_count = self.edge_count,
        )
    }
}

/// One validation problem.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationIssue<'a> {
    pub error: &'a ValidationError,
}

impl Display for ValidationIssue<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph validation error: {}", self.error)
    }
}

impl StructuredLog for ValidationIssue<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("validation_issue", span_name = name, error = %self.error)
    }
}

/// Graph building failed; every issue was logged individually before this.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct GraphValidationFailed {
    pub error_count: usize,
}

impl Display for GraphValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dependency graph rejected with {} validation error(s)",
            self.error_count
        )
    }
}

impl StructuredLog for GraphValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "graph_validation_failed",
            span_name = name,
            error_count = self.error_count,
        )
    }
}
