// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::graph::NameMapping;
use crate::traits::Processor;

/// A processor together with the configuration that places it in a pipeline.
///
/// The processor itself only knows local property names. The definition decides which
/// global names those become:
///
/// 1. an explicit name mapping entry wins,
/// 2. otherwise the prefix (if any) is prepended to the local name.
///
/// The same processor instance may appear in several definitions with different
/// mappings, as long as every definition has its own id.
#[derive(Clone)]
pub struct ProcessorDefinition {
    id: String,
    processor: Arc<dyn Processor>,
    input_mapping: NameMapping,
    output_mapping: NameMapping,
    input_prefix: Option<String>,
    output_prefix: Option<String>,
    overrides: HashSet<String>,
}

impl ProcessorDefinition {
    /// Wrap a processor; the id defaults to the processor's name
    pub fn new(processor: Arc<dyn Processor>) -> Self {
        Self {
            id: processor.name().to_string(),
            processor,
            input_mapping: NameMapping::new(),
            output_mapping: NameMapping::new(),
            input_prefix: None,
            output_prefix: None,
            overrides: HashSet::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_input_mapping(mut self, mapping: NameMapping) -> Self {
        self.input_mapping = mapping;
        self
    }

    pub fn with_output_mapping(mut self, mapping: NameMapping) -> Self {
        self.output_mapping = mapping;
        self
    }

    pub fn with_input_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.input_prefix = Some(prefix.into());
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    /// Allow the output with this local name to replace an externally supplied value
    pub fn with_override(mut self, output: impl Into<String>) -> Self {
        self.overrides.insert(output.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    pub fn input_mapping(&self) -> &NameMapping {
        &self.input_mapping
    }

    pub fn output_mapping(&self) -> &NameMapping {
        &self.output_mapping
    }

    pub fn output_prefix(&self) -> Option<&str> {
        self.output_prefix.as_deref()
    }

    pub fn input_global_name(&self, local: &str) -> String {
        resolve(&self.input_mapping, self.input_prefix.as_deref(), local)
    }

    pub fn output_global_name(&self, local: &str) -> String {
        resolve(&self.output_mapping, self.output_prefix.as_deref(), local)
    }

    pub fn overrides_external(&self, output: &str) -> bool {
        self.overrides.contains(output)
    }
}

fn resolve(mapping: &NameMapping, prefix: Option<&str>, local: &str) -> String {
    match (mapping.to_global(local), prefix) {
        (Some(global), _) => global.to_string(),
        (None, Some(prefix)) => format!("{}{}", prefix, local),
        (None, None) => local.to_string(),
    }
}

impl fmt::Debug for ProcessorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorDefinition")
            .field("id", &self.id)
            .field("processor", &self.processor.name())
            .field("input_mapping", &self.input_mapping)
            .field("output_mapping", &self.output_mapping)
            .field("input_prefix", &self.input_prefix)
            .field("output_prefix", &self.output_prefix)
            .field("overrides", &self.overrides)
            .finish()
    }
}
