//! Hook dispatcher: invokes every plugin bound to a hook and aggregates the
//! results.
//!
//! - Plugins are invoked in registration order, from a registry snapshot
//!   taken when the dispatch starts.
//! - Each plugin's output is flattened into one ordered result list.
//! - A plugin that errors, panics, times out, or returns a value breaking
//!   the hook's contract contributes nothing and is reported in
//!   [`DispatchOutcome::failures`]. Other plugins are unaffected.
//! - In concurrent mode all invocations are polled together and the
//!   aggregate is still assembled in registration order.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use reaper_core::config::{DispatchConfig, DispatchMode};
use reaper_core::error::{ReaperError, ValidationError};
use reaper_core::models::{ActionResult, ScoredSignal, Sense, Signal};
use reaper_core::result::ReaperResult;

use super::definitions::{HookArgs, HookPoint, HookValue};
use super::registry::{BoundHandler, HookBinding};
use crate::registry::{PluginId, PluginRegistry};

/// Why a single plugin's contribution was rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum InvocationError {
    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Failed(String),
    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
    /// The handler did not finish within the configured timeout.
    #[error("handler timed out after {0:?}")]
    TimedOut(Duration),
    /// The handler returned a value that breaks the hook's contract.
    #[error("contract violation: {0}")]
    ContractViolation(ValidationError),
}

/// An isolated failure of one plugin during a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginFailure {
    /// The failing plugin.
    pub plugin: PluginId,
    /// Name the plugin was registered under.
    pub name: Option<String>,
    /// The hook being dispatched.
    pub hook: HookPoint,
    /// What went wrong.
    pub error: InvocationError,
}

impl PluginFailure {
    /// Returns the registered name, or the plugin id when unnamed.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.plugin.to_string())
    }
}

impl From<PluginFailure> for ReaperError {
    fn from(failure: PluginFailure) -> Self {
        ReaperError::PluginInvocation {
            plugin: failure.label(),
            hook: failure.hook.to_string(),
            message: failure.error.to_string(),
        }
    }
}

/// Aggregated result of dispatching a hook to all bound plugins.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome<T> {
    /// The hook that was dispatched.
    pub hook: HookPoint,
    /// Every accepted value, in registration order.
    pub results: Vec<T>,
    /// Plugins whose contribution was rejected, in registration order.
    pub failures: Vec<PluginFailure>,
}

impl<T> DispatchOutcome<T> {
    fn empty(hook: HookPoint) -> Self {
        Self {
            hook,
            results: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Returns whether no plugin failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of accepted values.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns whether no value was accepted.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Discards failures and returns the accepted values.
    pub fn into_results(self) -> Vec<T> {
        self.results
    }

    /// Returns the accepted values, or the first failure as an error.
    pub fn into_result(self) -> ReaperResult<Vec<T>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.into()),
            None => Ok(self.results),
        }
    }

    /// Converts every accepted value.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> DispatchOutcome<U> {
        DispatchOutcome {
            hook: self.hook,
            results: self.results.into_iter().map(f).collect(),
            failures: self.failures,
        }
    }
}

type Invocation<'a, T> = BoxFuture<'a, anyhow::Result<Vec<T>>>;

/// Dispatches hooks to all registered plugins.
///
/// Dispatch futures run on any executor. The per-plugin timeout is enforced
/// only inside a Tokio runtime with the time driver enabled; elsewhere it is
/// skipped with a warning.
#[derive(Debug, Clone)]
pub struct HookDispatcher {
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
    /// Scheduling and timeout policy.
    config: DispatchConfig,
}

impl HookDispatcher {
    /// Creates a dispatcher with the default policy.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    /// Creates a dispatcher with an explicit policy.
    pub fn with_config(registry: Arc<PluginRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// Dispatches a hook by name.
    ///
    /// Fails with `UnknownHook` when the name is not in the hook
    /// table and with `InvalidArguments` when `args` has the wrong shape.
    /// Plugin failures never fail the call; they are reported in the outcome.
    pub async fn dispatch(
        &self,
        hook_name: &str,
        args: impl Into<HookArgs>,
    ) -> ReaperResult<DispatchOutcome<HookValue>> {
        let hook = HookPoint::from_name(hook_name)?;
        self.dispatch_hook(hook, args.into()).await
    }

    /// Dispatches a hook by identifier.
    pub async fn dispatch_hook(
        &self,
        hook: HookPoint,
        args: HookArgs,
    ) -> ReaperResult<DispatchOutcome<HookValue>> {
        let expected = hook.spec().argument;
        match (hook, args) {
            (HookPoint::Detect(sense), HookArgs::Source(source)) => {
                Ok(self.detect(sense, &source).await.map(HookValue::from))
            }
            (HookPoint::Score, HookArgs::Signal(signal)) => {
                Ok(self.score(&signal).await.map(HookValue::from))
            }
            (HookPoint::Act, HookArgs::ScoredSignal(scored)) => {
                Ok(self.act(&scored).await.map(HookValue::from))
            }
            (hook, args) => Err(ReaperError::InvalidArguments {
                hook: hook.to_string(),
                expected: expected.to_string(),
                actual: args.shape().to_string(),
            }),
        }
    }

    /// Runs every detection plugin for `sense` against `source`.
    pub async fn detect(&self, sense: Sense, source: &str) -> DispatchOutcome<Signal> {
        self.run(
            HookPoint::Detect(sense),
            |binding| match binding {
                HookBinding::Detect(handler) => {
                    Some(async move { handler.detect(source).await }.boxed())
                }
                _ => None,
            },
            |signal: &Signal| {
                if signal.sense() == sense {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        "sense",
                        format!("expected {sense}, got {}", signal.sense()),
                    ))
                }
            },
        )
        .await
    }

    /// Runs every scoring plugin against `signal`.
    pub async fn score(&self, signal: &Signal) -> DispatchOutcome<ScoredSignal> {
        self.run(
            HookPoint::Score,
            |binding| match binding {
                HookBinding::Score(handler) => Some(
                    async move {
                        let scored = handler.score(signal).await?;
                        Ok::<Vec<ScoredSignal>, anyhow::Error>(scored.into_iter().collect())
                    }
                    .boxed(),
                ),
                _ => None,
            },
            |scored: &ScoredSignal| {
                if scored.signal() == signal {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        "signal",
                        "must embed the signal that was scored",
                    ))
                }
            },
        )
        .await
    }

    /// Runs every action plugin against `scored`.
    pub async fn act(&self, scored: &ScoredSignal) -> DispatchOutcome<ActionResult> {
        self.run(
            HookPoint::Act,
            |binding| match binding {
                HookBinding::Act(handler) => Some(
                    async move {
                        let result = handler.act(scored).await?;
                        Ok::<Vec<ActionResult>, anyhow::Error>(result.into_iter().collect())
                    }
                    .boxed(),
                ),
                _ => None,
            },
            |result: &ActionResult| {
                if result.scored_signal() == scored {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        "scored_signal",
                        "must embed the scored signal that was acted on",
                    ))
                }
            },
        )
        .await
    }

    async fn run<'a, T, I, C>(&self, hook: HookPoint, invoke: I, check: C) -> DispatchOutcome<T>
    where
        T: Send + 'a,
        I: Fn(HookBinding) -> Option<Invocation<'a, T>>,
        C: Fn(&T) -> Result<(), ValidationError>,
    {
        let snapshot = self.registry.snapshot();
        let handlers = snapshot.handlers(&hook);

        if handlers.is_empty() {
            debug!(hook = %hook, "No handlers bound, nothing to dispatch");
            return DispatchOutcome::empty(hook);
        }

        debug!(
            hook = %hook,
            handler_count = handlers.len(),
            mode = ?self.config.mode,
            "Dispatching hook"
        );

        let limit = self.effective_timeout(hook);
        let invocations: Vec<(&BoundHandler, Invocation<'a, T>)> = handlers
            .iter()
            .filter_map(|bound| invoke(bound.binding.clone()).map(|fut| (bound, fut)))
            .collect();

        let completed = match self.config.mode {
            DispatchMode::Sequential => {
                let mut completed = Vec::with_capacity(invocations.len());
                for (bound, fut) in invocations {
                    completed.push((bound, guard(fut, limit).await));
                }
                completed
            }
            DispatchMode::Concurrent => {
                join_all(
                    invocations
                        .into_iter()
                        .map(|(bound, fut)| async move { (bound, guard(fut, limit).await) }),
                )
                .await
            }
        };

        let mut outcome = DispatchOutcome::empty(hook);
        for (bound, result) in completed {
            let checked = result.and_then(|values| {
                match values.iter().try_for_each(&check) {
                    Ok(()) => Ok(values),
                    Err(violation) => Err(InvocationError::ContractViolation(violation)),
                }
            });

            match checked {
                Ok(values) => {
                    debug!(
                        hook = %hook,
                        plugin = %bound.label(),
                        contributed = values.len(),
                        "Handler completed"
                    );
                    outcome.results.extend(values);
                }
                Err(err) => {
                    match &err {
                        InvocationError::Panicked(_) | InvocationError::TimedOut(_) => error!(
                            hook = %hook,
                            plugin = %bound.label(),
                            error = %err,
                            "Handler aborted, contribution dropped"
                        ),
                        _ => warn!(
                            hook = %hook,
                            plugin = %bound.label(),
                            error = %err,
                            "Handler failed, contribution dropped"
                        ),
                    }
                    outcome.failures.push(PluginFailure {
                        plugin: bound.plugin,
                        name: bound.name.clone(),
                        hook,
                        error: err,
                    });
                }
            }
        }

        outcome
    }

    /// Returns the configured timeout if it can be enforced.
    ///
    /// Timers need a Tokio runtime. Under any other executor the timeout is
    /// skipped and plugins run unbounded.
    fn effective_timeout(&self, hook: HookPoint) -> Option<Duration> {
        let limit = self.config.timeout()?;
        if tokio::runtime::Handle::try_current().is_ok() {
            Some(limit)
        } else {
            warn!(
                hook = %hook,
                timeout_ms = self.config.plugin_timeout_ms,
                "No Tokio runtime, plugin timeout not enforced"
            );
            None
        }
    }

    /// Returns the dispatch policy.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Returns a reference to the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}

/// Awaits one invocation, converting errors, panics, and timeouts.
async fn guard<T>(
    fut: Invocation<'_, T>,
    limit: Option<Duration>,
) -> Result<Vec<T>, InvocationError> {
    let fut = AssertUnwindSafe(fut).catch_unwind();

    let joined = match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(joined) => joined,
            Err(_) => return Err(InvocationError::TimedOut(limit)),
        },
        None => fut.await,
    };

    match joined {
        Ok(Ok(values)) => Ok(values),
        Ok(Err(err)) => Err(InvocationError::Failed(format!("{err:#}"))),
        Err(panic) => Err(InvocationError::Panicked(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
