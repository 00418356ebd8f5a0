// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::engine::{ExecutionTask, ExecutorOptions};
use crate::graph::ProcessorGraphNode;
use crate::values::Values;

/// A validated, immutable processor graph.
///
/// Cloning is cheap and every clone refers to the same nodes, so one graph can
/// serve any number of concurrent runs. Nodes are stored in topological order:
/// a node's dependencies always precede it.
#[derive(Clone)]
pub struct DependencyGraph {
    inner: Arc<GraphInner>,
}

struct GraphInner {
    nodes: Vec<Arc<ProcessorGraphNode>>,
    roots: Vec<Arc<ProcessorGraphNode>>,
    dependents: Vec<Vec<usize>>,
    external: BTreeSet<String>,
}

impl DependencyGraph {
    /// Assemble a graph from nodes already in topological order, indexed by position
    pub(crate) fn new(nodes: Vec<Arc<ProcessorGraphNode>>, external: BTreeSet<String>) -> Self {
        let mut dependents = vec![Vec::new(); nodes.len()];
        for node in &nodes {
            for dependency in node.dependencies() {
                dependents[dependency.index()].push(node.index());
            }
        }

        let roots = nodes.iter().filter(|n| n.is_root()).cloned().collect();

        Self {
            inner: Arc::new(GraphInner {
                nodes,
                roots,
                dependents,
                external,
            }),
        }
    }

    /// Nodes without dependencies
    pub fn roots(&self) -> &[Arc<ProcessorGraphNode>] {
        &self.inner.roots
    }

    /// All nodes, in topological order
    pub fn nodes(&self) -> &[Arc<ProcessorGraphNode>] {
        &self.inner.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Arc<ProcessorGraphNode>> {
        self.inner.nodes.iter().find(|n| n.id() == id)
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    /// Nodes that list `node` as a direct dependency
    pub fn dependents_of(&self, node: &ProcessorGraphNode) -> Vec<&Arc<ProcessorGraphNode>> {
        self.inner
            .dependents
            .get(node.index())
            .map(|indices| indices.iter().map(|&i| &self.inner.nodes[i]).collect())
            .unwrap_or_default()
    }

    /// Global names the graph expects the caller to supply
    pub fn external_dependencies(&self) -> impl Iterator<Item = &str> {
        self.inner.external.iter().map(String::as_str)
    }

    pub fn edge_count(&self) -> usize {
        self.inner.nodes.iter().map(|n| n.dependencies().len()).sum()
    }

    /// A runnable task over `values` with default executor options
    pub fn create_task(&self, values: Values) -> ExecutionTask {
        self.create_task_with(values, ExecutorOptions::default())
    }

    pub fn create_task_with(&self, values: Values, options: ExecutorOptions) -> ExecutionTask {
        ExecutionTask::new(self.clone(), values, options)
    }

    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, index: usize, depth: usize) -> fmt::Result {
        let node = &self.inner.nodes[index];
        if depth == 0 {
            writeln!(f, "{}", node.id())?;
        } else {
            writeln!(f, "{}+-- {}", "    ".repeat(depth - 1), node.id())?;
        }
        for &dependent in &self.inner.dependents[index] {
            self.fmt_subtree(f, dependent, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in self.roots() {
            self.fmt_subtree(f, root.index(), 0)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("nodes", &self.inner.nodes)
            .field("external", &self.inner.external)
            .finish()
    }
}
