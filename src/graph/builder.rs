// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency inference and validation for processor graphs.
//!
//! Processors never name each other. The builder resolves every declared input and
//! output to its global name, then connects each consumer to the processor producing
//! the name it reads. Everything that can be checked before a run is checked here,
//! and every problem is reported, not just the first one.
//!
//! # Build Pipeline
//!
//! 1. **Identity**: definition ids must be unique
//! 2. **Resolution**: local names are translated through the name mapping, falling
//!    back to the prefix and then to the local name itself
//! 3. **Producers**: one non-debug producer per global name, with a single type,
//!    never mixed with debug producers of the same name
//! 4. **Consumers**: every required input is produced or supplied externally
//! 5. **Cycle Detection**: DFS over the inferred edges
//! 6. **Ordering**: Kahn's algorithm places dependencies before dependents
//!
//! Cycle detection always runs, even when earlier stages found problems; it only
//! looks at the edges that could be inferred.
//!
//! # Example
//!
//! ```rust
//! use processor_graph::graph::GraphBuilder;
//!
//! let graph = GraphBuilder::build(Vec::new(), ["text"]).unwrap();
//! assert!(graph.is_empty());
//! assert_eq!(graph.external_dependencies().collect::<Vec<_>>(), vec!["text"]);
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{PropertyDirection, ValidationError};
use crate::graph::{DependencyGraph, ProcessorDefinition, ProcessorGraphNode, Property, ResolvedProperty};
use crate::observability::messages::graph::{
    GraphBuildStarted, GraphBuilt, GraphValidationFailed, ValidationIssue,
};
use crate::observability::messages::StructuredLog;
use crate::values::TypeTag;

/// Infers and validates the edges between processor definitions.
pub struct GraphBuilder;

struct Resolved {
    definition: ProcessorDefinition,
    inputs: Vec<ResolvedProperty>,
    outputs: Vec<ResolvedProperty>,
}

struct Producer<'a> {
    index: usize,
    local: &'a str,
    type_tag: TypeTag,
    debug: bool,
}

impl GraphBuilder {
    /// Build a graph from `definitions`, treating the names in `external` as
    /// supplied by the caller before every run.
    ///
    /// # Returns
    ///
    /// * `Ok(DependencyGraph)` - every check passed
    /// * `Err(Vec<ValidationError>)` - every problem found, in discovery order
    pub fn build<I, S>(
        definitions: Vec<ProcessorDefinition>,
        external: I,
    ) -> Result<DependencyGraph, Vec<ValidationError>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let started = Instant::now();
        let external: BTreeSet<String> = external.into_iter().map(Into::into).collect();

        GraphBuildStarted {
            processor_count: definitions.len(),
            external_count: external.len(),
        }
        .log();

        let mut errors = Vec::new();
        validate_unique_ids(&definitions, &mut errors);

        let resolved: Vec<Resolved> = definitions
            .into_iter()
            .map(|definition| resolve(definition, &mut errors))
            .collect();

        let dependencies = infer_dependencies(&resolved, &external, &mut errors);

        if let Some(cycle) = detect_cycle(&resolved, &dependencies) {
            errors.push(ValidationError::CyclicDependency { cycle });
        }

        if !errors.is_empty() {
            for error in &errors {
                ValidationIssue { error }.log();
            }
            GraphValidationFailed {
                error_count: errors.len(),
            }
            .log();
            return Err(errors);
        }

        let order = topological_order(&dependencies);
        let graph = assemble(resolved, &dependencies, &order, external);

        GraphBuilt {
            node_count: graph.len(),
            root_count: graph.roots().len(),
            edge_count: graph.edge_count(),
            duration: started.elapsed(),
        }
        .log();

        Ok(graph)
    }
}

fn validate_unique_ids(definitions: &[ProcessorDefinition], errors: &mut Vec<ValidationError>) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for definition in definitions {
        *counts.entry(definition.id()).or_insert(0) += 1;
    }

    for (id, count) in counts {
        if count > 1 {
            errors.push(ValidationError::DuplicateProcessorId {
                processor_id: id.to_string(),
            });
        }
    }
}

/// Resolve global names and run the per-definition checks
fn resolve(definition: ProcessorDefinition, errors: &mut Vec<ValidationError>) -> Resolved {
    let processor = Arc::clone(definition.processor());
    let declared_inputs = processor.input_properties();
    let declared_outputs = processor.output_properties();

    check_mapping(
        &definition,
        PropertyDirection::Input,
        definition.input_mapping().locals(),
        &declared_inputs,
        errors,
    );
    check_mapping(
        &definition,
        PropertyDirection::Output,
        definition.output_mapping().locals(),
        &declared_outputs,
        errors,
    );

    for message in processor.validate() {
        errors.push(ValidationError::Processor {
            processor_id: definition.id().to_string(),
            message,
        });
    }

    let inputs = declared_inputs
        .into_iter()
        .map(|p| {
            let global = definition.input_global_name(p.name());
            ResolvedProperty::new(p, global)
        })
        .collect();
    let outputs = declared_outputs
        .into_iter()
        .map(|p| {
            let global = definition.output_global_name(p.name());
            ResolvedProperty::new(p, global)
        })
        .collect();

    Resolved {
        definition,
        inputs,
        outputs,
    }
}

fn check_mapping<'a>(
    definition: &ProcessorDefinition,
    direction: PropertyDirection,
    mapped: impl Iterator<Item = &'a str>,
    declared: &[Property],
    errors: &mut Vec<ValidationError>,
) {
    let mut unknown: Vec<&str> = mapped
        .filter(|local| !declared.iter().any(|p| p.name() == *local))
        .collect();
    unknown.sort_unstable();

    for property in unknown {
        errors.push(ValidationError::UnknownMappedProperty {
            processor_id: definition.id().to_string(),
            direction,
            property: property.to_string(),
        });
    }
}

/// Match consumers to producers; returns each node's dependency indices
fn infer_dependencies(
    resolved: &[Resolved],
    external: &BTreeSet<String>,
    errors: &mut Vec<ValidationError>,
) -> Vec<BTreeSet<usize>> {
    let mut producers: BTreeMap<&str, Vec<Producer>> = BTreeMap::new();
    for (index, node) in resolved.iter().enumerate() {
        for output in &node.outputs {
            producers
                .entry(output.global_name())
                .or_default()
                .push(Producer {
                    index,
                    local: output.local_name(),
                    type_tag: output.property().type_tag(),
                    debug: output.property().is_debug(),
                });
        }
    }

    let id = |index: usize| resolved[index].definition.id().to_string();

    // last registered non-debug producer per global name
    let mut winners: HashMap<&str, &Producer> = HashMap::new();

    for (&name, registered) in &producers {
        let non_debug: Vec<&Producer> = registered.iter().filter(|p| !p.debug).collect();

        if non_debug.len() > 1 {
            errors.push(ValidationError::AmbiguousProducer {
                name: name.to_string(),
                producers: non_debug.iter().map(|p| id(p.index)).collect(),
            });
        }

        let debug: Vec<&Producer> = registered.iter().filter(|p| p.debug).collect();
        if !debug.is_empty() && !non_debug.is_empty() {
            errors.push(ValidationError::MixedDebugProducer {
                name: name.to_string(),
                debug: debug.iter().map(|p| id(p.index)).collect(),
                producers: non_debug.iter().map(|p| id(p.index)).collect(),
            });
        }

        let first_tag = registered[0].type_tag;
        if registered.iter().any(|p| p.type_tag != first_tag) {
            errors.push(ValidationError::TypeConflict {
                name: name.to_string(),
                producers: registered
                    .iter()
                    .map(|p| (id(p.index), p.type_tag.name().to_string()))
                    .collect(),
            });
        }

        if external.contains(name) {
            for producer in &non_debug {
                if !resolved[producer.index]
                    .definition
                    .overrides_external(producer.local)
                {
                    errors.push(ValidationError::ShadowsExternal {
                        processor_id: id(producer.index),
                        name: name.to_string(),
                    });
                }
            }
        }

        if let Some(&last) = non_debug.last() {
            winners.insert(name, last);
        }
    }

    let mut dependencies = vec![BTreeSet::new(); resolved.len()];

    for (index, node) in resolved.iter().enumerate() {
        for input in &node.inputs {
            let property = input.property();
            if property.is_values_passthrough() {
                continue;
            }

            match winners.get(input.global_name()) {
                Some(producer) if producer.index == index => {
                    errors.push(ValidationError::SelfDependency {
                        processor_id: id(index),
                        name: input.global_name().to_string(),
                    });
                }
                Some(producer) => {
                    if producer.type_tag != property.type_tag() {
                        errors.push(ValidationError::InputTypeMismatch {
                            processor_id: id(index),
                            name: input.global_name().to_string(),
                            expected: property.type_tag().name().to_string(),
                            producer: id(producer.index),
                            actual: producer.type_tag.name().to_string(),
                        });
                    }
                    dependencies[index].insert(producer.index);
                }
                None if external.contains(input.global_name()) || !property.is_required() => {}
                None => errors.push(ValidationError::UnsatisfiedInput {
                    processor_id: id(index),
                    property: input.local_name().to_string(),
                    global_name: input.global_name().to_string(),
                }),
            }
        }
    }

    dependencies
}

/// DFS with a recursion stack over dependency -> dependent edges.
///
/// Returns the first cycle found as a closed path of processor ids, e.g.
/// `[A, B, C, A]`.
fn detect_cycle(resolved: &[Resolved], dependencies: &[BTreeSet<usize>]) -> Option<Vec<String>> {
    let mut dependents = vec![Vec::new(); dependencies.len()];
    for (index, deps) in dependencies.iter().enumerate() {
        for &dependency in deps {
            dependents[dependency].push(index);
        }
    }

    let mut visited = vec![false; dependencies.len()];
    let mut on_stack = vec![false; dependencies.len()];
    let mut path = Vec::new();

    for start in 0..dependencies.len() {
        if visited[start] {
            continue;
        }
        if let Some(cycle) = dfs_cycle_detection(start, &dependents, &mut visited, &mut on_stack, &mut path) {
            return Some(
                cycle
                    .into_iter()
                    .map(|i| resolved[i].definition.id().to_string())
                    .collect(),
            );
        }
    }

    None
}

fn dfs_cycle_detection(
    node: usize,
    dependents: &[Vec<usize>],
    visited: &mut [bool],
    on_stack: &mut [bool],
    path: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    visited[node] = true;
    on_stack[node] = true;
    path.push(node);

    for &next in &dependents[node] {
        if !visited[next] {
            if let Some(cycle) = dfs_cycle_detection(next, dependents, visited, on_stack, path) {
                return Some(cycle);
            }
        } else if on_stack[next] {
            let start = path.iter().position(|&i| i == next).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(next);
            return Some(cycle);
        }
    }

    on_stack[node] = false;
    path.pop();
    None
}

/// Kahn's algorithm; ties are broken by definition order so builds are reproducible
fn topological_order(dependencies: &[BTreeSet<usize>]) -> Vec<usize> {
    let mut in_degree: Vec<usize> = dependencies.iter().map(BTreeSet::len).collect();
    let mut dependents = vec![Vec::new(); dependencies.len()];
    for (index, deps) in dependencies.iter().enumerate() {
        for &dependency in deps {
            dependents[dependency].push(index);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut order = Vec::with_capacity(dependencies.len());
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    order
}

fn assemble(
    resolved: Vec<Resolved>,
    dependencies: &[BTreeSet<usize>],
    order: &[usize],
    external: BTreeSet<String>,
) -> DependencyGraph {
    let mut position = vec![0; order.len()];
    for (new_index, &old_index) in order.iter().enumerate() {
        position[old_index] = new_index;
    }

    let mut pending: Vec<Option<Resolved>> = resolved.into_iter().map(Some).collect();
    let mut nodes: Vec<Arc<ProcessorGraphNode>> = Vec::with_capacity(order.len());

    for (new_index, &old_index) in order.iter().enumerate() {
        let Some(Resolved {
            definition,
            inputs,
            outputs,
        }) = pending[old_index].take()
        else {
            continue;
        };

        let mut deps: Vec<usize> = dependencies[old_index].iter().map(|&d| position[d]).collect();
        deps.sort_unstable();
        let deps = deps.into_iter().map(|d| Arc::clone(&nodes[d])).collect();

        nodes.push(Arc::new(ProcessorGraphNode::new(
            new_index, definition, inputs, outputs, deps,
        )));
    }

    DependencyGraph::new(nodes, external)
}
