// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::processors::*;
use crate::config::ProcessorConfig;
use crate::errors::ProcessorMapError;
use crate::traits::Processor;

/// Factory for creating local (in-process) processor instances
pub struct LocalProcessorFactory;

impl LocalProcessorFactory {
    /// Create a processor instance from configuration
    ///
    /// The `processor` field in the config determines which processor to create:
    /// - "change_text_case_upper" -> ChangeTextCaseProcessor (uppercase)
    /// - "change_text_case_lower" -> ChangeTextCaseProcessor (lowercase)
    /// - "change_text_case_proper" -> ChangeTextCaseProcessor (proper case)
    /// - "change_text_case_title" -> ChangeTextCaseProcessor (title case)
    /// - "reverse_text" -> ReverseTextProcessor
    /// - "token_counter" -> TokenCounterProcessor
    /// - "word_frequency_analyzer" -> WordFrequencyAnalyzerProcessor
    /// - "prefix_suffix_adder" -> PrefixSuffixAdderProcessor (options `prefix`, `suffix`)
    /// - "concatenate" -> ConcatenateProcessor (option `separator`)
    pub fn create_processor(config: &ProcessorConfig) -> Result<Arc<dyn Processor>, ProcessorMapError> {
        match config.processor.as_str() {
            "change_text_case_upper" => Ok(Arc::new(ChangeTextCaseProcessor::upper())),
            "change_text_case_lower" => Ok(Arc::new(ChangeTextCaseProcessor::lower())),
            "change_text_case_proper" => Ok(Arc::new(ChangeTextCaseProcessor::proper())),
            "change_text_case_title" => Ok(Arc::new(ChangeTextCaseProcessor::title())),

            "reverse_text" => Ok(Arc::new(ReverseTextProcessor::new())),

            "token_counter" => Ok(Arc::new(TokenCounterProcessor::new())),
            "word_frequency_analyzer" => Ok(Arc::new(WordFrequencyAnalyzerProcessor::new())),

            "prefix_suffix_adder" => Ok(Arc::new(PrefixSuffixAdderProcessor::new(PrefixSuffixConfig {
                prefix: string_option(config, "prefix")?,
                suffix: string_option(config, "suffix")?,
            }))),
            "concatenate" => {
                let separator = string_option(config, "separator")?
                    .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());
                Ok(Arc::new(ConcatenateProcessor::new(separator)))
            }

            other => Err(ProcessorMapError::UnknownImplementation {
                processor_id: config.id.clone(),
                implementation: other.to_string(),
            }),
        }
    }

    /// List all available local processor implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec![
            "change_text_case_upper",
            "change_text_case_lower",
            "change_text_case_proper",
            "change_text_case_title",
            "reverse_text",
            "token_counter",
            "word_frequency_analyzer",
            "prefix_suffix_adder",
            "concatenate",
        ]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(name: &str) -> bool {
        Self::list_available_implementations().contains(&name)
    }
}

fn string_option(config: &ProcessorConfig, option: &str) -> Result<Option<String>, ProcessorMapError> {
    match config.options.get(option) {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(ProcessorMapError::InvalidOption {
            processor_id: config.id.clone(),
            option: option.to_string(),
            reason: format!("expected a string, found {:?}", other),
        }),
    }
}
