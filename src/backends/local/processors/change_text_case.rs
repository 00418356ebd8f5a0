// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::ProcessorError;
use crate::graph::Property;
use crate::traits::{ExecutionContext, Processor};
use crate::values::{Input, Output};

/// Words kept lowercase by title case unless they start the text
const MINOR_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Target case for [`ChangeTextCaseProcessor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    Upper,
    Lower,
    /// First letter of every word capitalized
    Proper,
    /// Like proper case, but minor words stay lowercase
    Title,
}

/// Change Text Case processor - reads `text`, writes `cased`
pub struct ChangeTextCaseProcessor {
    case: TextCase,
    name: &'static str,
}

impl ChangeTextCaseProcessor {
    pub fn new(case: TextCase) -> Self {
        let name = match case {
            TextCase::Upper => "change_text_case_upper",
            TextCase::Lower => "change_text_case_lower",
            TextCase::Proper => "change_text_case_proper",
            TextCase::Title => "change_text_case_title",
        };
        Self { case, name }
    }

    pub fn upper() -> Self {
        Self::new(TextCase::Upper)
    }

    pub fn lower() -> Self {
        Self::new(TextCase::Lower)
    }

    pub fn proper() -> Self {
        Self::new(TextCase::Proper)
    }

    pub fn title() -> Self {
        Self::new(TextCase::Title)
    }

    pub fn convert(&self, input: &str) -> String {
        match self.case {
            TextCase::Upper => input.to_uppercase(),
            TextCase::Lower => input.to_lowercase(),
            TextCase::Proper => input
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
            TextCase::Title => input
                .split_whitespace()
                .enumerate()
                .map(|(i, word)| {
                    let lower = word.to_lowercase();
                    if i > 0 && MINOR_WORDS.contains(&lower.as_str()) {
                        lower
                    } else {
                        capitalize(word)
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

#[async_trait]
impl Processor for ChangeTextCaseProcessor {
    fn name(&self) -> &str {
        self.name
    }

    fn input_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("text")]
    }

    fn output_properties(&self) -> Vec<Property> {
        vec![Property::new::<String>("cased")]
    }

    async fn execute(&self, input: Input, _ctx: &ExecutionContext) -> Result<Output, ProcessorError> {
        let text = input.require::<String>("text")?;
        Ok(Output::new().with("cased", self.convert(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        let cases = vec![
            (ChangeTextCaseProcessor::upper(), "hello", "HELLO"),
            (ChangeTextCaseProcessor::lower(), "HELLO", "hello"),
            (ChangeTextCaseProcessor::proper(), "hello wORLD", "Hello World"),
            (ChangeTextCaseProcessor::title(), "the quick brown fox and the dog", "The Quick Brown Fox and the Dog"),
        ];

        for (processor, input, expected) in cases {
            assert_eq!(processor.convert(input), expected, "failed for {}", processor.name());
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(ChangeTextCaseProcessor::proper().convert(""), "");
        assert_eq!(ChangeTextCaseProcessor::title().convert("   "), "");
    }
}
