// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use serde::Deserialize;

use crate::errors::FailureStrategy;

/// Tuning knobs for one run of a dependency graph.
///
/// Deserialized from the `executor_options` section of a pipeline config; the
/// failure strategy comes from the config's top-level `failure_strategy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorOptions {
    /// Processors allowed to execute at the same time; defaults to available parallelism
    pub max_concurrency: Option<usize>,
    /// Whole-run deadline.
    ///
    /// On expiry the run is cancelled and nodes that have not started are skipped.
    /// Processors still running one second later are aborted and reported as
    /// skipped.
    pub timeout_seconds: Option<u64>,
    #[serde(skip)]
    pub failure_strategy: FailureStrategy,
}

impl ExecutorOptions {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    pub fn with_failure_strategy(mut self, failure_strategy: FailureStrategy) -> Self {
        self.failure_strategy = failure_strategy;
        self
    }

    /// Effective concurrency limit, never below one
    pub fn concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_is_clamped() {
        assert_eq!(ExecutorOptions::default().with_max_concurrency(0).concurrency(), 1);
        assert_eq!(ExecutorOptions::default().with_max_concurrency(3).concurrency(), 3);
        assert!(ExecutorOptions::default().concurrency() >= 1);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ExecutorOptions = serde_yaml::from_str("timeout_seconds: 30").unwrap();
        assert_eq!(options.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(options.max_concurrency, None);
        assert_eq!(options.failure_strategy, FailureStrategy::ContinueOnError);
    }
}
