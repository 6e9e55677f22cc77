//! Plugin registry: stores registered plugin instances in registration order.
//!
//! The registry holds one lock around an immutable [`RegistrySnapshot`].
//! Mutations build a fresh snapshot; readers and in-flight dispatches keep
//! the snapshot they started with.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use reaper_core::config::RegistryConfig;
use reaper_core::error::ReaperError;
use reaper_core::models::Sense;
use reaper_core::result::ReaperResult;

use crate::hooks::definitions::HookPoint;
use crate::hooks::registry::{BoundHandler, HookBinding, HookIndex};
use crate::traits::{ActionHandler, DetectionHandler, ScoringHandler};

/// Identity of a plugin instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(Uuid);

impl PluginId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
struct PluginHandlers {
    detectors: BTreeMap<Sense, Arc<dyn DetectionHandler>>,
    scorer: Option<Arc<dyn ScoringHandler>>,
    actor: Option<Arc<dyn ActionHandler>>,
}

/// A plugin instance: a set of typed handlers with one identity.
///
/// Clones share the identity, so a clone kept by the caller can later be
/// passed to [`PluginRegistry::unregister`].
#[derive(Debug, Clone)]
pub struct Plugin {
    id: PluginId,
    handlers: Arc<PluginHandlers>,
}

impl Plugin {
    /// Starts building a plugin.
    pub fn builder() -> PluginBuilder {
        PluginBuilder::default()
    }

    /// A plugin with a single detection handler.
    pub fn detection<H: DetectionHandler + 'static>(sense: Sense, handler: H) -> Self {
        Self::builder().detector(sense, handler).build()
    }

    /// A plugin with a single scoring handler.
    pub fn scoring<H: ScoringHandler + 'static>(handler: H) -> Self {
        Self::builder().scorer(handler).build()
    }

    /// A plugin with a single action handler.
    pub fn action<H: ActionHandler + 'static>(handler: H) -> Self {
        Self::builder().actor(handler).build()
    }

    /// Returns the plugin's identity.
    pub fn id(&self) -> PluginId {
        self.id
    }

    /// Returns the handler bound to `hook`, if any.
    pub fn binding(&self, hook: HookPoint) -> Option<HookBinding> {
        match hook {
            HookPoint::Detect(sense) => self
                .handlers
                .detectors
                .get(&sense)
                .cloned()
                .map(HookBinding::Detect),
            HookPoint::Score => self.handlers.scorer.clone().map(HookBinding::Score),
            HookPoint::Act => self.handlers.actor.clone().map(HookBinding::Act),
        }
    }

    /// Returns whether the plugin implements `hook`.
    pub fn implements(&self, hook: HookPoint) -> bool {
        match hook {
            HookPoint::Detect(sense) => self.handlers.detectors.contains_key(&sense),
            HookPoint::Score => self.handlers.scorer.is_some(),
            HookPoint::Act => self.handlers.actor.is_some(),
        }
    }

    /// Returns every hook the plugin implements, in table order.
    pub fn hooks(&self) -> Vec<HookPoint> {
        HookPoint::all().filter(|hook| self.implements(*hook)).collect()
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Plugin {}

/// Builder for [`Plugin`].
#[derive(Debug, Default)]
pub struct PluginBuilder {
    handlers: PluginHandlers,
}

impl PluginBuilder {
    /// Binds a detection handler for `sense`, replacing any earlier one.
    pub fn detector<H: DetectionHandler + 'static>(mut self, sense: Sense, handler: H) -> Self {
        self.handlers.detectors.insert(sense, Arc::new(handler));
        self
    }

    /// Binds the scoring handler.
    pub fn scorer<H: ScoringHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.scorer = Some(Arc::new(handler));
        self
    }

    /// Binds the action handler.
    pub fn actor<H: ActionHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.actor = Some(Arc::new(handler));
        self
    }

    /// Builds the plugin with a fresh identity.
    pub fn build(self) -> Plugin {
        Plugin {
            id: PluginId::new(),
            handlers: Arc::new(self.handlers),
        }
    }
}

/// A registered plugin and the optional name it was registered under.
#[derive(Debug, Clone)]
pub struct PluginEntry {
    plugin: Plugin,
    name: Option<String>,
}

impl PluginEntry {
    /// The plugin instance.
    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    /// The registered name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the registered name, or the plugin id when unnamed.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.plugin.id.to_string())
    }
}

/// Immutable view of the registry at one point in time.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    entries: Vec<PluginEntry>,
    index: HookIndex,
}

impl RegistrySnapshot {
    fn new(entries: Vec<PluginEntry>) -> Self {
        let index = HookIndex::build(&entries);
        Self { entries, index }
    }

    /// Registered plugins, in registration order.
    pub fn entries(&self) -> &[PluginEntry] {
        &self.entries
    }

    /// Iterates registered plugins, in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, PluginEntry> {
        self.entries.iter()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handlers bound to `hook`, in registration order.
    pub fn handlers(&self, hook: &HookPoint) -> &[BoundHandler] {
        self.index.get(hook)
    }

    /// The per-hook lookup table.
    pub fn index(&self) -> &HookIndex {
        &self.index
    }
}

impl<'a> IntoIterator for &'a RegistrySnapshot {
    type Item = &'a PluginEntry;
    type IntoIter = std::slice::Iter<'a, PluginEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Registry of all registered plugins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    snapshot: RwLock<Arc<RegistrySnapshot>>,
    config: RegistryConfig,
}

impl PluginRegistry {
    /// Creates a new empty registry with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty registry with the given limits.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            snapshot: RwLock::default(),
            config,
        }
    }

    /// Registers a plugin, optionally under a name.
    ///
    /// Fails with `DuplicatePlugin` if the same instance, or another plugin
    /// with the same name, is already registered.
    pub fn register(&self, plugin: Plugin, name: Option<&str>) -> ReaperResult<PluginId> {
        let mut guard = self.snapshot.write();

        if guard.entries.iter().any(|e| e.plugin.id == plugin.id) {
            return Err(ReaperError::duplicate_plugin(format!(
                "Plugin '{}' is already registered",
                plugin.id
            )));
        }
        if let Some(name) = name {
            if guard.entries.iter().any(|e| e.name() == Some(name)) {
                return Err(ReaperError::duplicate_plugin(format!(
                    "A plugin named '{name}' is already registered"
                )));
            }
        }
        if let Some(max) = self.config.max_plugins {
            if guard.entries.len() >= max {
                return Err(ReaperError::configuration(format!(
                    "Registry limit of {max} plugins reached"
                )));
            }
        }

        let hooks = plugin.hooks();
        if hooks.is_empty() {
            warn!(plugin_id = %plugin.id, "Registering plugin that implements no hooks");
        }

        let id = plugin.id;
        let mut entries = guard.entries.clone();
        entries.push(PluginEntry {
            plugin,
            name: name.map(str::to_string),
        });
        *guard = Arc::new(RegistrySnapshot::new(entries));

        info!(
            plugin_id = %id,
            name = name.unwrap_or("<unnamed>"),
            hooks = ?hooks.iter().map(HookPoint::as_str).collect::<Vec<_>>(),
            "Plugin registered"
        );

        Ok(id)
    }

    /// Unregisters a plugin instance.
    pub fn unregister(&self, plugin: &Plugin) -> ReaperResult<()> {
        self.unregister_id(plugin.id).map(|_| ())
    }

    /// Unregisters a plugin by identity, returning its entry.
    pub fn unregister_id(&self, id: PluginId) -> ReaperResult<PluginEntry> {
        self.remove_where(|e| e.plugin.id == id)
            .ok_or_else(|| ReaperError::plugin_not_found(format!("Plugin '{id}' is not registered")))
    }

    /// Unregisters a plugin by registered name, returning its entry.
    pub fn unregister_name(&self, name: &str) -> ReaperResult<PluginEntry> {
        self.remove_where(|e| e.name() == Some(name))
            .ok_or_else(|| {
                ReaperError::plugin_not_found(format!("No plugin named '{name}' is registered"))
            })
    }

    fn remove_where(&self, predicate: impl Fn(&PluginEntry) -> bool) -> Option<PluginEntry> {
        let mut guard = self.snapshot.write();
        let position = guard.entries.iter().position(predicate)?;

        let mut entries = guard.entries.clone();
        let removed = entries.remove(position);
        *guard = Arc::new(RegistrySnapshot::new(entries));

        info!(
            plugin_id = %removed.plugin.id,
            name = removed.name().unwrap_or("<unnamed>"),
            "Plugin unregistered"
        );

        Some(removed)
    }

    /// Returns the current snapshot.
    ///
    /// Cheap: clones an `Arc`. Later registry changes do not affect it.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.snapshot.read().clone()
    }

    /// Registered plugins and their names, in registration order.
    pub fn list(&self) -> Arc<RegistrySnapshot> {
        self.snapshot()
    }

    /// Number of registered plugins.
    pub fn count(&self) -> usize {
        self.snapshot.read().len()
    }

    /// Returns whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns whether a plugin is registered.
    pub fn contains(&self, id: PluginId) -> bool {
        self.snapshot.read().entries.iter().any(|e| e.plugin.id == id)
    }

    /// Looks up a plugin by registered name.
    pub fn get_by_name(&self, name: &str) -> Option<Plugin> {
        self.snapshot
            .read()
            .entries
            .iter()
            .find(|e| e.name() == Some(name))
            .map(|e| e.plugin.clone())
    }

    /// Handlers bound to `hook`, in registration order.
    pub fn handlers_for(&self, hook: HookPoint) -> Vec<BoundHandler> {
        self.snapshot().handlers(&hook).to_vec()
    }
}
