// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::engine::ExecutorOptions;
use crate::errors::{ConfigError, FailureStrategy};

/// Main configuration structure for a processor pipeline.
///
/// Processors are wired together from the properties they declare, so the
/// configuration only says which implementations to instantiate and how their
/// local property names map onto the shared values store.
///
/// # Fields
/// * `failure_strategy` - How to handle processor failures (optional, defaults to continue_on_error)
/// * `executor_options` - Concurrency and deadline for each run (optional)
/// * `external_dependencies` - Names seeded into the values store before a run
/// * `processors` - Vector of processor configurations that define the graph nodes
///
/// # Example
/// ```yaml
/// failure_strategy: fail_fast
/// executor_options:
///   max_concurrency: 4
///   timeout_seconds: 30
/// external_dependencies: [text]
/// processors:
///   - id: uppercase
///     processor: change_text_case_upper
///     output_mapping:
///       cased: upper_text
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub external_dependencies: Vec<String>,
    pub processors: Vec<ProcessorConfig>,
}

/// Configuration for a single processor in the graph.
///
/// # Fields
/// * `id` - Unique identifier for this processor
/// * `processor` - Local implementation name
/// * `input_mapping` / `output_mapping` - Local property name to global name
/// * `input_prefix` / `output_prefix` - Prepended to unmapped names
/// * `overrides` - Local outputs allowed to replace an external value
/// * `options` - Additional processor-specific configuration options
///
/// # Example
/// ```yaml
/// id: shout
/// processor: prefix_suffix_adder
/// input_mapping:
///   text: upper_text
/// output_prefix: shout_
/// options:
///   prefix: ">> "
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    pub id: String,
    pub processor: String,
    #[serde(default)]
    pub input_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub output_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub input_prefix: Option<String>,
    #[serde(default)]
    pub output_prefix: Option<String>,
    #[serde(default)]
    pub overrides: Vec<String>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>, // processor-specific options
}

enum Format {
    Yaml,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("toml") => Ok(Format::Toml),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a config from a YAML or TOML file, chosen by extension
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let cfg = match format {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Toml => toml::from_str(&content)?,
    };
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
external_dependencies: [text]
processors:
  - id: uppercase
    processor: change_text_case_upper
    output_mapping:
      cased: upper_text
  - id: reverse
    processor: reverse_text
    input_mapping:
      text: upper_text
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.failure_strategy, FailureStrategy::ContinueOnError);
        assert_eq!(cfg.executor_options, ExecutorOptions::default());
        assert_eq!(cfg.external_dependencies, vec!["text"]);
        assert_eq!(cfg.processors.len(), 2);
        assert_eq!(cfg.processors[0].output_mapping.get("cased").map(String::as_str), Some("upper_text"));
        assert_eq!(cfg.processors[1].input_mapping.get("text").map(String::as_str), Some("upper_text"));
        assert!(cfg.processors[1].overrides.is_empty());
    }

    #[test]
    fn parse_executor_options_and_strategy() {
        let yaml = r#"
failure_strategy: fail_fast
executor_options:
  max_concurrency: 2
  timeout_seconds: 10
processors: []
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.failure_strategy, FailureStrategy::FailFast);
        assert_eq!(cfg.executor_options.concurrency(), 2);
        assert_eq!(cfg.executor_options.timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_unknown_failure_strategy_is_rejected() {
        let yaml = "failure_strategy: retry_forever\nprocessors: []\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_config("pipeline.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
