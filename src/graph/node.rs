// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::graph::{ProcessorDefinition, Property};
use crate::traits::Processor;

/// A declared property together with the global name it resolves to
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    property: Property,
    global_name: String,
}

impl ResolvedProperty {
    pub(crate) fn new(property: Property, global_name: String) -> Self {
        Self {
            property,
            global_name,
        }
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    /// The processor's local name for the property
    pub fn local_name(&self) -> &str {
        self.property.name()
    }

    pub fn global_name(&self) -> &str {
        &self.global_name
    }
}

/// One processor definition placed in a dependency graph.
///
/// Nodes are shared by identity: every consumer of a producer holds the same
/// `Arc`, so a producer appears once however many dependents it has. The index is
/// the node's position in the graph's topological order and is unique per graph.
pub struct ProcessorGraphNode {
    index: usize,
    definition: ProcessorDefinition,
    inputs: Vec<ResolvedProperty>,
    outputs: Vec<ResolvedProperty>,
    dependencies: Vec<Arc<ProcessorGraphNode>>,
}

impl ProcessorGraphNode {
    pub(crate) fn new(
        index: usize,
        definition: ProcessorDefinition,
        inputs: Vec<ResolvedProperty>,
        outputs: Vec<ResolvedProperty>,
        dependencies: Vec<Arc<ProcessorGraphNode>>,
    ) -> Self {
        Self {
            index,
            definition,
            inputs,
            outputs,
            dependencies,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &str {
        self.definition.id()
    }

    pub fn definition(&self) -> &ProcessorDefinition {
        &self.definition
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        self.definition.processor()
    }

    pub fn inputs(&self) -> &[ResolvedProperty] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ResolvedProperty] {
        &self.outputs
    }

    /// Direct dependencies, de-duplicated and ordered by index
    pub fn dependencies(&self) -> &[Arc<ProcessorGraphNode>] {
        &self.dependencies
    }

    /// Every node this one transitively depends on, ordered by index
    pub fn all_dependencies(&self) -> Vec<Arc<ProcessorGraphNode>> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&Arc<ProcessorGraphNode>> = self.dependencies.iter().collect();
        let mut result = Vec::new();

        while let Some(node) = stack.pop() {
            if seen.insert(node.index) {
                result.push(Arc::clone(node));
                stack.extend(node.dependencies.iter());
            }
        }

        result.sort_by_key(|node| node.index);
        result
    }

    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl fmt::Debug for ProcessorGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<&str> = self.dependencies.iter().map(|d| d.id()).collect();
        f.debug_struct("ProcessorGraphNode")
            .field("index", &self.index)
            .field("id", &self.id())
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("dependencies", &dependencies)
            .finish()
    }
}
