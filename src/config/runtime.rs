// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;

use crate::backends::local::LocalProcessorFactory;
use crate::config::{load_config, Config, ProcessorConfig};
use crate::engine::{ExecutionSummary, ExecutionTask, ExecutorOptions};
use crate::errors::{ConfigError, ExecutionError};
use crate::graph::{DependencyGraph, GraphBuilder, NameMapping, ProcessorDefinition};
use crate::values::Values;

/// Pipeline runtime builder - turns a configuration into a validated graph.
///
/// # Examples
///
/// ```
/// use processor_graph::config::{Config, RuntimeBuilder};
///
/// let config: Config = serde_yaml::from_str(
///     "external_dependencies: [text]\nprocessors:\n  - id: reverse\n    processor: reverse_text\n",
/// )
/// .unwrap();
///
/// let pipeline = RuntimeBuilder::from_config(&config).unwrap();
/// assert_eq!(pipeline.graph().len(), 1);
/// assert_eq!(pipeline.graph().roots()[0].id(), "reverse");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a ready-to-run pipeline from configuration.
    ///
    /// Every processor entry is instantiated through the local backend, wrapped
    /// into a [`ProcessorDefinition`] and handed to the [`GraphBuilder`] together
    /// with the configured external dependencies. A single bad processor entry
    /// is returned as is, several as [`ConfigError::Processors`]. Validation
    /// problems are returned all at once as [`ConfigError::Validation`].
    pub fn from_config(cfg: &Config) -> Result<Pipeline, ConfigError> {
        let mut definitions = Vec::with_capacity(cfg.processors.len());
        let mut errors = Vec::new();
        for processor in &cfg.processors {
            match definition_from_config(processor) {
                Ok(definition) => definitions.push(definition),
                Err(e) => errors.push(e),
            }
        }
        if errors.len() == 1 {
            return Err(errors.remove(0));
        }
        if !errors.is_empty() {
            return Err(ConfigError::Processors(errors));
        }

        let graph = GraphBuilder::build(definitions, cfg.external_dependencies.iter().cloned())
            .map_err(ConfigError::Validation)?;

        Ok(Pipeline {
            graph,
            options: cfg.executor_options.clone().with_failure_strategy(cfg.failure_strategy),
        })
    }
}

fn definition_from_config(cfg: &ProcessorConfig) -> Result<ProcessorDefinition, ConfigError> {
    let processor = LocalProcessorFactory::create_processor(cfg)?;
    let mapping_error = |source| ConfigError::Mapping {
        processor_id: cfg.id.clone(),
        source,
    };

    let mut definition = ProcessorDefinition::new(processor)
        .with_id(cfg.id.clone())
        .with_input_mapping(NameMapping::from_pairs(cfg.input_mapping.clone()).map_err(mapping_error)?)
        .with_output_mapping(NameMapping::from_pairs(cfg.output_mapping.clone()).map_err(mapping_error)?);

    if let Some(prefix) = &cfg.input_prefix {
        definition = definition.with_input_prefix(prefix.clone());
    }
    if let Some(prefix) = &cfg.output_prefix {
        definition = definition.with_output_prefix(prefix.clone());
    }
    for output in &cfg.overrides {
        definition = definition.with_override(output.clone());
    }

    Ok(definition)
}

/// A validated graph plus the options every run of it uses
#[derive(Debug, Clone)]
pub struct Pipeline {
    graph: DependencyGraph,
    options: ExecutorOptions,
}

impl Pipeline {
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Names the caller is expected to seed before running
    pub fn external_dependencies(&self) -> impl Iterator<Item = &str> {
        self.graph.external_dependencies()
    }

    pub fn create_task(&self, values: Values) -> ExecutionTask {
        self.graph.create_task_with(values, self.options.clone())
    }

    /// Run the pipeline once over `values`
    pub async fn run(&self, values: Values) -> Result<ExecutionSummary, ExecutionError> {
        self.create_task(values).run().await
    }
}

/// Load a configuration file and build its pipeline
pub fn load_pipeline<P: AsRef<Path>>(path: P) -> Result<Pipeline, ConfigError> {
    let cfg = load_config(path)?;
    RuntimeBuilder::from_config(&cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FailureStrategy, NameMappingError, ProcessorMapError, ValidationError};

    fn config(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_options_carry_failure_strategy() {
        let cfg = config(
            r#"
failure_strategy: fail_fast
executor_options:
  max_concurrency: 3
external_dependencies: [text]
processors:
  - id: reverse
    processor: reverse_text
"#,
        );

        let pipeline = RuntimeBuilder::from_config(&cfg).unwrap();
        assert_eq!(pipeline.options().failure_strategy, FailureStrategy::FailFast);
        assert_eq!(pipeline.options().max_concurrency, Some(3));
        assert_eq!(pipeline.external_dependencies().collect::<Vec<_>>(), vec!["text"]);
    }

    #[test]
    fn test_mappings_wire_processors_together() {
        let cfg = config(
            r#"
external_dependencies: [text]
processors:
  - id: reverse
    processor: reverse_text
    input_mapping:
      text: upper_text
  - id: uppercase
    processor: change_text_case_upper
    output_mapping:
      cased: upper_text
"#,
        );

        let pipeline = RuntimeBuilder::from_config(&cfg).unwrap();
        let graph = pipeline.graph();
        assert_eq!(graph.roots().len(), 1);
        assert_eq!(graph.roots()[0].id(), "uppercase");
        assert_eq!(graph.node("reverse").unwrap().dependencies()[0].id(), "uppercase");
    }

    #[test]
    fn test_prefixes_and_overrides() {
        let cfg = config(
            r#"
external_dependencies: [text, shout_decorated]
processors:
  - id: shout
    processor: prefix_suffix_adder
    output_prefix: shout_
    overrides: [decorated]
    options:
      prefix: "!"
"#,
        );

        let pipeline = RuntimeBuilder::from_config(&cfg).unwrap();
        let node = pipeline.graph().node("shout").unwrap();
        assert_eq!(node.outputs()[0].global_name(), "shout_decorated");
    }

    #[test]
    fn test_unknown_implementation() {
        let cfg = config("processors:\n  - id: mystery\n    processor: does_not_exist\n");

        let error = RuntimeBuilder::from_config(&cfg).err().unwrap();
        assert!(matches!(
            error,
            ConfigError::Processor(ProcessorMapError::UnknownImplementation { ref processor_id, .. })
                if processor_id == "mystery"
        ));
    }

    #[test]
    fn test_non_bijective_mapping() {
        let cfg = config(
            r#"
processors:
  - id: join
    processor: concatenate
    input_mapping:
      first: text
      second: text
"#,
        );

        let error = RuntimeBuilder::from_config(&cfg).err().unwrap();
        assert!(matches!(
            error,
            ConfigError::Mapping { ref processor_id, source: NameMappingError::DuplicateGlobal { .. } }
                if processor_id == "join"
        ));
    }

    #[test]
    fn test_every_bad_processor_entry_is_reported() {
        let cfg = config(
            r#"
processors:
  - id: mystery
    processor: does_not_exist
  - id: reverse
    processor: reverse_text
  - id: join
    processor: concatenate
    input_mapping:
      first: text
      second: text
"#,
        );

        let Err(ConfigError::Processors(errors)) = RuntimeBuilder::from_config(&cfg) else {
            panic!("expected every processor error");
        };
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            ConfigError::Processor(ProcessorMapError::UnknownImplementation { processor_id, .. })
                if processor_id == "mystery"
        ));
        assert!(matches!(
            &errors[1],
            ConfigError::Mapping { processor_id, .. } if processor_id == "join"
        ));

        let message = ConfigError::Processors(errors).to_string();
        assert!(message.starts_with("2 processor entries are invalid:"));
        assert!(message.contains("mystery"));
    }

    #[test]
    fn test_validation_errors_are_collected() {
        let cfg = config(
            r#"
processors:
  - id: reverse
    processor: reverse_text
  - id: count
    processor: token_counter
"#,
        );

        let Err(ConfigError::Validation(errors)) = RuntimeBuilder::from_config(&cfg) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::UnsatisfiedInput { global_name, .. } if global_name == "text")));
    }
}
