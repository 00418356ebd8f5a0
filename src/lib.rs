// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // processor implementations
pub mod config;        // pipeline files + runtime builder
pub mod engine;        // concurrent graph execution
pub mod errors;        // error handling
pub mod graph;         // builder, validation, dependency graph
pub mod observability;
pub mod traits;        // processor contract
pub mod values;        // shared values store

pub use engine::{ExecutionSummary, ExecutionTask, ExecutorOptions};
pub use graph::{DependencyGraph, GraphBuilder, ProcessorDefinition, Property};
pub use traits::{ExecutionContext, Processor};
pub use values::{Input, Output, Values};
