//! Plugin manager: one handle over a registry and its dispatcher.

use std::sync::Arc;

use tracing::info;

use reaper_core::config::{DispatchConfig, ReaperConfig, RegistryConfig};
use reaper_core::models::{ActionResult, ScoredSignal, Sense, Signal};
use reaper_core::result::ReaperResult;

use crate::hooks::definitions::{HookArgs, HookValue};
use crate::hooks::dispatcher::{DispatchOutcome, HookDispatcher};
use crate::registry::{Plugin, PluginId, PluginRegistry, RegistrySnapshot};

/// Registers plugins and runs pipeline stages against them.
///
/// A manager is an ordinary value. Create as many as needed and pass them to
/// the code that drives the pipeline.
#[derive(Debug, Clone)]
pub struct PluginManager {
    /// Plugin registry.
    registry: Arc<PluginRegistry>,
    /// Hook dispatcher over `registry`.
    dispatcher: HookDispatcher,
}

impl PluginManager {
    /// Creates an empty manager with default policies.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default(), DispatchConfig::default())
    }

    /// Creates an empty manager with explicit policies.
    pub fn with_config(registry: RegistryConfig, dispatch: DispatchConfig) -> Self {
        let registry = Arc::new(PluginRegistry::with_config(registry));
        let dispatcher = HookDispatcher::with_config(registry.clone(), dispatch);
        Self {
            registry,
            dispatcher,
        }
    }

    /// Creates an empty manager from loaded configuration.
    pub fn from_config(config: &ReaperConfig) -> ReaperResult<Self> {
        config.validate()?;
        info!(
            mode = ?config.dispatch.mode,
            plugin_timeout_ms = config.dispatch.plugin_timeout_ms,
            max_plugins = ?config.registry.max_plugins,
            "Creating plugin manager"
        );
        Ok(Self::with_config(
            config.registry.clone(),
            config.dispatch.clone(),
        ))
    }

    /// Registers a plugin, optionally under a name.
    pub fn register_plugin(&self, plugin: Plugin, name: Option<&str>) -> ReaperResult<PluginId> {
        self.registry.register(plugin, name)
    }

    /// Unregisters a plugin instance.
    pub fn unregister_plugin(&self, plugin: &Plugin) -> ReaperResult<()> {
        self.registry.unregister(plugin)
    }

    /// Returns the registered plugins in registration order.
    pub fn list_plugins(&self) -> Arc<RegistrySnapshot> {
        self.registry.list()
    }

    /// Returns the number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.registry.count()
    }

    /// Runs the sight detectors.
    pub async fn detect_sight(&self, source: &str) -> DispatchOutcome<Signal> {
        self.dispatcher.detect(Sense::Sight, source).await
    }

    /// Runs the hearing detectors.
    pub async fn detect_hearing(&self, source: &str) -> DispatchOutcome<Signal> {
        self.dispatcher.detect(Sense::Hearing, source).await
    }

    /// Runs the touch detectors.
    pub async fn detect_touch(&self, source: &str) -> DispatchOutcome<Signal> {
        self.dispatcher.detect(Sense::Touch, source).await
    }

    /// Runs the taste detectors.
    pub async fn detect_taste(&self, source: &str) -> DispatchOutcome<Signal> {
        self.dispatcher.detect(Sense::Taste, source).await
    }

    /// Runs the smell detectors.
    pub async fn detect_smell(&self, source: &str) -> DispatchOutcome<Signal> {
        self.dispatcher.detect(Sense::Smell, source).await
    }

    /// Runs the scorers against one signal.
    pub async fn score_signal(&self, signal: &Signal) -> DispatchOutcome<ScoredSignal> {
        self.dispatcher.score(signal).await
    }

    /// Runs the actions against one scored signal.
    pub async fn execute_action(&self, scored: &ScoredSignal) -> DispatchOutcome<ActionResult> {
        self.dispatcher.act(scored).await
    }

    /// Dispatches a hook by name.
    pub async fn dispatch(
        &self,
        hook_name: &str,
        args: impl Into<HookArgs>,
    ) -> ReaperResult<DispatchOutcome<HookValue>> {
        self.dispatcher.dispatch(hook_name, args).await
    }

    /// Returns the hook dispatcher.
    pub fn dispatcher(&self) -> &HookDispatcher {
        &self.dispatcher
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
