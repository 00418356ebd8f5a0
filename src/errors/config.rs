// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::errors::ProcessorMapError;

/// Errors that can occur while inferring and validating a processor dependency graph.
///
/// The graph builder never stops at the first problem: every check runs to completion
/// and the full list is handed back, so a broken pipeline definition can be fixed in
/// one pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Two definitions share the same id
    #[error("Duplicate processor ID: '{processor_id}'")]
    DuplicateProcessorId { processor_id: String },

    /// A name mapping refers to a property the processor does not declare
    #[error("Processor '{processor_id}' maps unknown {direction} property '{property}'")]
    UnknownMappedProperty {
        processor_id: String,
        direction: PropertyDirection,
        property: String,
    },

    /// More than one non-debug processor writes the same global name
    #[error("Output '{name}' is produced by more than one processor: {}", .producers.join(", "))]
    AmbiguousProducer { name: String, producers: Vec<String> },

    /// A global name is written both as debug output and as a regular output
    #[error(
        "Output '{name}' is produced as debug output by {} and as regular output by {}",
        .debug.join(", "),
        .producers.join(", ")
    )]
    MixedDebugProducer {
        name: String,
        debug: Vec<String>,
        producers: Vec<String>,
    },

    /// Producers of the same global name disagree on its type
    #[error("Output '{name}' is produced with conflicting types: {}", format_typed(.producers))]
    TypeConflict {
        name: String,
        /// (processor id, declared type name) pairs
        producers: Vec<(String, String)>,
    },

    /// A consumer expects a different type than the producer declares
    #[error(
        "Processor '{processor_id}' expects input '{name}' of type {expected} but '{producer}' produces {actual}"
    )]
    InputTypeMismatch {
        processor_id: String,
        name: String,
        expected: String,
        producer: String,
        actual: String,
    },

    /// A required input has no producer and is not supplied externally
    #[error(
        "Processor '{processor_id}' requires '{property}' (global name '{global_name}') but nothing provides it"
    )]
    UnsatisfiedInput {
        processor_id: String,
        property: String,
        global_name: String,
    },

    /// A processor output collides with an externally supplied value without being flagged as an override
    #[error(
        "Processor '{processor_id}' produces '{name}' which is supplied externally; flag it as an override to replace it"
    )]
    ShadowsExternal { processor_id: String, name: String },

    /// A processor consumes its own output
    #[error("Processor '{processor_id}' depends on its own output '{name}'")]
    SelfDependency { processor_id: String, name: String },

    /// A circular dependency was detected in the processor graph
    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },

    /// A processor-specific static check failed
    #[error("Processor '{processor_id}' is misconfigured: {message}")]
    Processor { processor_id: String, message: String },
}

/// Which side of a processor a property lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDirection {
    Input,
    Output,
}

impl fmt::Display for PropertyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDirection::Input => write!(f, "input"),
            PropertyDirection::Output => write!(f, "output"),
        }
    }
}

fn format_typed(producers: &[(String, String)]) -> String {
    producers
        .iter()
        .map(|(id, ty)| format!("{} ({})", id, ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while loading a pipeline configuration and turning it into a graph
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported config format for '{}': expected .yaml, .yml or .toml", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid name mapping for processor '{processor_id}': {source}")]
    Mapping {
        processor_id: String,
        #[source]
        source: crate::errors::NameMappingError,
    },

    #[error(transparent)]
    Processor(#[from] ProcessorMapError),

    #[error("Configuration validation failed:\n{}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// Several processor entries could not be turned into definitions
    #[error("{} processor entries are invalid:\n{}", .0.len(), format_errors(.0))]
    Processors(Vec<ConfigError>),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
