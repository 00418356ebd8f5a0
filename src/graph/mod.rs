// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor graph model and construction.
//!
//! Processors declare the properties they read and write ([`Property`]); a
//! [`ProcessorDefinition`] places a processor in a pipeline with its name mappings
//! and prefixes. [`GraphBuilder`] turns a set of definitions into a validated
//! [`DependencyGraph`] of [`ProcessorGraphNode`]s, inferring every edge from the
//! declarations alone.

mod builder;
mod definition;
mod dependency_graph;
mod name_mapping;
mod node;
mod property;

pub use builder::GraphBuilder;
pub use definition::ProcessorDefinition;
pub use dependency_graph::DependencyGraph;
pub use name_mapping::NameMapping;
pub use node::{ProcessorGraphNode, ResolvedProperty};
pub use property::{Presence, Property};
