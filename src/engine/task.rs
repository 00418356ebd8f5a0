// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concurrent, memoized execution of a dependency graph against one values store.
//!
//! # Architecture Overview
//!
//! Every node gets exactly one execution unit per run: a shared future stored in a
//! map keyed by node index. A unit first joins the units of its dependencies, then
//! waits for a semaphore permit, executes the processor and writes its outputs. A
//! dependent asking for a unit that already exists gets a clone of the same shared
//! future, so a producer feeding many consumers still runs once.
//!
//! ```text
//!     CreateMap
//!      /     \
//!  Legend   Scalebar     (both join the one CreateMap unit)
//!      \     /
//!      Layout
//! ```
//!
//! Each unit is also spawned as its own tokio task, so independent branches make
//! progress in parallel regardless of which unit is joined first.
//!
//! # Failure Handling
//!
//! A node that fails records its error; units depending on it observe a
//! non-completed outcome and are skipped without invoking their processor. Under
//! [`FailureStrategy::FailFast`] the first failure also cancels the run, so units
//! that have not started yet are skipped as well. Panics inside `execute` are caught
//! and reported as failures of the panicking node.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::ExecutorOptions;
use crate::errors::{ExecutionError, FailureStrategy, ProcessorError, ValuesError};
use crate::graph::{DependencyGraph, Presence, ProcessorGraphNode};
use crate::observability::messages::engine::{
    DeadlineExceeded, ExecutionCompleted, ExecutionFailed, ExecutionStarted, NodeSkipped,
};
use crate::observability::messages::processor::{
    ProcessorExecutionCompleted, ProcessorExecutionFailed, ProcessorExecutionStarted,
    UndeclaredOutputIgnored,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ExecutionContext;
use crate::values::{Input, Lookup, Output, Slot, Value, Values, WritePolicy};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Number of processors executed
    pub executed: usize,
    pub duration: Duration,
}

/// One run of a [`DependencyGraph`] over one [`Values`] store.
///
/// Created by [`DependencyGraph::create_task`]. The task writes every processor
/// output into the store it was created with; keep a clone of the store to read
/// the results after [`run`](Self::run) returns.
pub struct ExecutionTask {
    graph: DependencyGraph,
    values: Values,
    options: ExecutorOptions,
    cancellation: CancellationToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeOutcome {
    Completed,
    Failed,
    Skipped,
}

type Unit = Shared<BoxFuture<'static, NodeOutcome>>;

struct RunState {
    graph: DependencyGraph,
    values: Values,
    semaphore: Semaphore,
    cancellation: CancellationToken,
    failure_strategy: FailureStrategy,
    units: Mutex<HashMap<usize, Unit>>,
    failures: Mutex<Vec<ExecutionError>>,
    skipped: Mutex<Vec<String>>,
}

impl ExecutionTask {
    pub(crate) fn new(graph: DependencyGraph, values: Values, options: ExecutorOptions) -> Self {
        Self {
            graph,
            values,
            options,
            cancellation: CancellationToken::new(),
        }
    }

    /// The store this task reads from and writes to
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Token that cancels the run when triggered; nodes not yet started are skipped
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Execute every node once, dependencies first.
    ///
    /// # Returns
    ///
    /// * `Ok(ExecutionSummary)` - every node executed and wrote its outputs
    /// * `Err(ExecutionError::RunFailed)` - one or more nodes failed, timed out or
    ///   were cancelled; carries every failure and the ids of skipped nodes
    pub async fn run(self) -> Result<ExecutionSummary, ExecutionError> {
        let started = Instant::now();
        let max_concurrency = self.options.concurrency();
        let timeout = self.options.timeout();

        ExecutionStarted {
            node_count: self.graph.len(),
            root_count: self.graph.roots().len(),
            max_concurrency,
        }
        .log();

        let state = Arc::new(RunState {
            graph: self.graph,
            values: self.values,
            semaphore: Semaphore::new(max_concurrency),
            cancellation: self.cancellation,
            failure_strategy: self.options.failure_strategy,
            units: Mutex::new(HashMap::new()),
            failures: Mutex::new(Vec::new()),
            skipped: Mutex::new(Vec::new()),
        });

        let handles: Vec<JoinHandle<NodeOutcome>> = (0..state.graph.len())
            .map(|index| tokio::spawn(unit(&state, index)))
            .collect();
        let mut guard = RunGuard {
            state: Arc::clone(&state),
            tasks: handles.iter().map(JoinHandle::abort_handle).collect(),
            finished: false,
        };
        let all = join_all(handles);
        tokio::pin!(all);

        let mut timed_out = None;
        let joined = match timeout {
            Some(after) => match tokio::time::timeout(after, all.as_mut()).await {
                Ok(joined) => joined,
                Err(_) => {
                    DeadlineExceeded { timeout: after }.log();
                    timed_out = Some(after);
                    state.cancellation.cancel();
                    match tokio::time::timeout(CANCELLATION_GRACE, all.as_mut()).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            guard.abort();
                            all.await
                        }
                    }
                }
            },
            None => all.await,
        };

        let mut executed = 0;
        for (index, joined) in joined.into_iter().enumerate() {
            match joined {
                Ok(NodeOutcome::Completed) => executed += 1,
                Ok(_) => {}
                Err(join_error) if join_error.is_cancelled() => {
                    // another task may have driven the shared unit to completion
                    let outcome = lock(&state.units).get(&index).and_then(|u| u.peek().copied());
                    match outcome {
                        Some(NodeOutcome::Completed) => executed += 1,
                        Some(_) => {}
                        None => {
                            skip(&state, &state.graph.nodes()[index], "aborted after the deadline");
                        }
                    }
                }
                Err(join_error) => {
                    let processor_id = state.graph.nodes()[index].id().to_string();
                    lock(&state.failures).push(ExecutionError::Panicked {
                        processor_id,
                        message: join_error.to_string(),
                    });
                }
            }
        }

        guard.finish();

        let mut failures = std::mem::take(&mut *lock(&state.failures));
        let skipped = std::mem::take(&mut *lock(&state.skipped));

        if let Some(after) = timed_out {
            failures.push(ExecutionError::TimedOut { after });
        } else if failures.is_empty() && state.cancellation.is_cancelled() && !skipped.is_empty() {
            failures.push(ExecutionError::Cancelled);
        }

        if failures.is_empty() {
            let duration = started.elapsed();
            ExecutionCompleted {
                node_count: executed,
                duration,
            }
            .log();
            return Ok(ExecutionSummary { executed, duration });
        }

        let error = ExecutionError::RunFailed { failures, skipped };
        ExecutionFailed {
            failure_count: error.failures().len(),
            skipped_count: error.skipped().len(),
            error: &error,
        }
        .log();
        Err(error)
    }
}

/// How long in-flight processors may keep running once the deadline has passed
const CANCELLATION_GRACE: Duration = Duration::from_secs(1);

/// Ties the spawned units to the `run` future.
///
/// Dropping an unfinished run cancels it and aborts every unit, so an abandoned
/// run never executes another processor or writes into the store.
struct RunGuard {
    state: Arc<RunState>,
    tasks: Vec<AbortHandle>,
    finished: bool,
}

impl RunGuard {
    fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    /// Units hold the state; drop them so the state is freed
    fn finish(&mut self) {
        self.finished = true;
        lock(&self.state.units).clear();
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.state.cancellation.cancel();
            self.abort();
            lock(&self.state.units).clear();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The memoized unit for `index`, created on first request
fn unit(state: &Arc<RunState>, index: usize) -> Unit {
    let mut units = lock(&state.units);
    if let Some(existing) = units.get(&index) {
        return existing.clone();
    }
    let created = run_node(Arc::clone(state), index).shared();
    units.insert(index, created.clone());
    created
}

fn run_node(state: Arc<RunState>, index: usize) -> BoxFuture<'static, NodeOutcome> {
    async move {
        let node = Arc::clone(&state.graph.nodes()[index]);

        let dependencies: Vec<Unit> = node
            .dependencies()
            .iter()
            .map(|dependency| unit(&state, dependency.index()))
            .collect();
        let outcomes = join_all(dependencies).await;

        if let Some(position) = outcomes.iter().position(|o| *o != NodeOutcome::Completed) {
            let blocker = node.dependencies()[position].id();
            let reason = format!("dependency '{}' did not complete", blocker);
            return skip(&state, &node, &reason);
        }

        if state.cancellation.is_cancelled() {
            return skip(&state, &node, "run cancelled");
        }

        let _permit = tokio::select! {
            permit = state.semaphore.acquire() => match permit {
                Ok(permit) => permit,
                Err(_) => return skip(&state, &node, "executor shut down"),
            },
            _ = state.cancellation.cancelled() => return skip(&state, &node, "run cancelled"),
        };

        let execution = AssertUnwindSafe(execute_node(&state, &node)).catch_unwind().await;

        match execution {
            Ok(Ok(())) => NodeOutcome::Completed,
            Ok(Err(ExecutionError::ProcessorFailed {
                source: ProcessorError::Cancelled,
                ..
            })) if state.cancellation.is_cancelled() => skip(&state, &node, "run cancelled"),
            Ok(Err(error)) => fail(&state, &node, error),
            Err(panic) => {
                let error = ExecutionError::Panicked {
                    processor_id: node.id().to_string(),
                    message: panic_message(panic.as_ref()),
                };
                fail(&state, &node, error)
            }
        }
    }
    .boxed()
}

fn skip(state: &RunState, node: &ProcessorGraphNode, reason: &str) -> NodeOutcome {
    NodeSkipped {
        processor_id: node.id(),
        reason,
    }
    .log();
    lock(&state.skipped).push(node.id().to_string());
    NodeOutcome::Skipped
}

fn fail(state: &RunState, node: &ProcessorGraphNode, error: ExecutionError) -> NodeOutcome {
    ProcessorExecutionFailed {
        processor_id: node.id(),
        error: &error,
    }
    .log();
    lock(&state.failures).push(error);
    if state.failure_strategy == FailureStrategy::FailFast {
        state.cancellation.cancel();
    }
    NodeOutcome::Failed
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

async fn execute_node(state: &RunState, node: &ProcessorGraphNode) -> Result<(), ExecutionError> {
    let input = build_input(node, &state.values)?;

    let started_message = ProcessorExecutionStarted {
        processor_id: node.id(),
        input_count: input.len(),
    };
    started_message.log();
    let span = started_message.span("execute");

    let started = Instant::now();
    let ctx = ExecutionContext::new(node.id(), state.cancellation.clone());
    let output = node
        .processor()
        .execute(input, &ctx)
        .instrument(span)
        .await
        .map_err(|source| ExecutionError::ProcessorFailed {
            processor_id: node.id().to_string(),
            source,
        })?;

    let output_count = write_back(node, output, &state.values)?;

    ProcessorExecutionCompleted {
        processor_id: node.id(),
        output_count,
        duration: started.elapsed(),
    }
    .log();

    Ok(())
}

/// Copy every declared input out of the store under its local name
fn build_input(node: &ProcessorGraphNode, values: &Values) -> Result<Input, ExecutionError> {
    let mut input = Input::new();

    for resolved in node.inputs() {
        let property = resolved.property();
        let local = resolved.local_name();

        if property.is_values_passthrough() {
            input.insert(local, Slot::Value(Value::new(values.clone())));
            input.attach_values(values.clone());
            continue;
        }

        match values.lookup(resolved.global_name()) {
            Lookup::Present(value) => {
                if value.tag() != property.type_tag() {
                    return Err(ExecutionError::Store {
                        processor_id: node.id().to_string(),
                        source: ValuesError::TypeMismatch {
                            name: resolved.global_name().to_string(),
                            expected: property.type_tag().name(),
                            actual: value.tag().name(),
                        },
                    });
                }
                input.insert(local, Slot::Value(value));
            }
            Lookup::Null => input.insert(local, Slot::Null),
            Lookup::Missing => match property.presence() {
                Presence::Required => {
                    return Err(ExecutionError::MissingInput {
                        processor_id: node.id().to_string(),
                        property: local.to_string(),
                        global_name: resolved.global_name().to_string(),
                    })
                }
                Presence::Default(default) => input.insert(local, Slot::Value(default.clone())),
                Presence::Optional => {}
            },
        }
    }

    Ok(input)
}

/// Check every declared output, then publish them under their global names.
///
/// Nothing is written when any declared output is missing, mistyped or already
/// present in the store.
fn write_back(node: &ProcessorGraphNode, mut output: Output, values: &Values) -> Result<usize, ExecutionError> {
    let mut pending = Vec::with_capacity(node.outputs().len());

    for resolved in node.outputs() {
        let property = resolved.property();
        let local = resolved.local_name();

        let Some(slot) = output.take(local) else {
            if property.is_required() {
                return Err(ExecutionError::MissingOutput {
                    processor_id: node.id().to_string(),
                    property: local.to_string(),
                });
            }
            continue;
        };

        if let Some(actual) = slot.tag() {
            if actual != property.type_tag() {
                return Err(ExecutionError::OutputTypeMismatch {
                    processor_id: node.id().to_string(),
                    property: local.to_string(),
                    expected: property.type_tag().name(),
                    actual: actual.name(),
                });
            }
        }

        let policy = if property.is_debug() {
            WritePolicy::Replace
        } else if node.definition().overrides_external(local) {
            WritePolicy::OverrideExternal
        } else {
            WritePolicy::Once
        };
        pending.push((resolved.global_name(), slot, policy));
    }

    for extra in output.remaining() {
        UndeclaredOutputIgnored {
            processor_id: node.id(),
            property: extra,
        }
        .log();
    }

    let written = pending.len();
    values
        .publish_all(pending)
        .map_err(|source| ExecutionError::Store {
            processor_id: node.id().to_string(),
            source,
        })?;

    Ok(written)
}
