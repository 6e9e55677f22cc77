//! Hook index: hook point to the ordered handler bindings implementing it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::registry::{PluginEntry, PluginId};
use crate::traits::{ActionHandler, DetectionHandler, ScoringHandler};

use super::definitions::{HookPoint, HookRole};

/// A typed reference to the handler a plugin bound to a hook.
#[derive(Debug, Clone)]
pub enum HookBinding {
    /// Detection handler.
    Detect(Arc<dyn DetectionHandler>),
    /// Scoring handler.
    Score(Arc<dyn ScoringHandler>),
    /// Action handler.
    Act(Arc<dyn ActionHandler>),
}

impl HookBinding {
    /// Returns the pipeline role of the bound handler.
    pub fn role(&self) -> HookRole {
        match self {
            Self::Detect(_) => HookRole::Detect,
            Self::Score(_) => HookRole::Score,
            Self::Act(_) => HookRole::Act,
        }
    }
}

/// A handler binding together with the plugin that owns it.
#[derive(Debug, Clone)]
pub struct BoundHandler {
    /// Owning plugin.
    pub plugin: PluginId,
    /// Name the plugin was registered under.
    pub name: Option<String>,
    /// The handler.
    pub binding: HookBinding,
}

impl BoundHandler {
    /// Returns the registered name, or the plugin id when unnamed.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.plugin.to_string())
    }
}

/// Map from hook point to handlers, each list in registration order.
#[derive(Debug, Default)]
pub struct HookIndex {
    handlers: HashMap<HookPoint, Vec<BoundHandler>>,
}

impl HookIndex {
    /// Builds the index from registry entries, preserving their order.
    pub fn build(entries: &[PluginEntry]) -> Self {
        let mut handlers: HashMap<HookPoint, Vec<BoundHandler>> = HashMap::new();
        for entry in entries {
            for hook in HookPoint::all() {
                if let Some(binding) = entry.plugin().binding(hook) {
                    handlers.entry(hook).or_default().push(BoundHandler {
                        plugin: entry.plugin().id(),
                        name: entry.name().map(str::to_string),
                        binding,
                    });
                }
            }
        }
        Self { handlers }
    }

    /// Returns the handlers for a hook point, in registration order.
    pub fn get(&self, hook: &HookPoint) -> &[BoundHandler] {
        self.handlers.get(hook).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether any handler is bound to a hook point.
    pub fn has_handlers(&self, hook: &HookPoint) -> bool {
        !self.get(hook).is_empty()
    }

    /// Returns the number of handlers bound to a hook point.
    pub fn handler_count(&self, hook: &HookPoint) -> usize {
        self.get(hook).len()
    }

    /// Returns every hook point with at least one handler, in table order.
    pub fn registered_hooks(&self) -> Vec<HookPoint> {
        HookPoint::all()
            .filter(|hook| self.has_handlers(hook))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Plugin, PluginRegistry};
    use crate::traits::{FnActor, FnDetector, FnScorer};
    use reaper_core::models::Sense;

    fn multi_role_plugin() -> Plugin {
        Plugin::builder()
            .detector(Sense::Smell, FnDetector::new("smell", |_| Ok(Vec::new())))
            .detector(Sense::Sight, FnDetector::new("sight", |_| Ok(Vec::new())))
            .actor(FnActor::new("act", |_| Ok(None)))
            .build()
    }

    #[test]
    fn test_bindings_carry_table_role() {
        let plugin = multi_role_plugin();
        for hook in HookPoint::all() {
            match plugin.binding(hook) {
                Some(binding) => assert_eq!(binding.role(), hook.spec().role, "{hook}"),
                None => assert!(!plugin.implements(hook)),
            }
        }
    }

    #[test]
    fn test_registered_hooks_in_table_order() {
        let registry = PluginRegistry::new();
        assert!(registry.snapshot().index().registered_hooks().is_empty());

        registry.register(multi_role_plugin(), None).expect("register");
        registry
            .register(
                Plugin::scoring(FnScorer::new("score", |_| Ok(None))),
                Some("scorer"),
            )
            .expect("register");

        let snapshot = registry.snapshot();
        let index = snapshot.index();
        assert_eq!(
            index.registered_hooks(),
            vec![
                HookPoint::Detect(Sense::Sight),
                HookPoint::Detect(Sense::Smell),
                HookPoint::Score,
                HookPoint::Act,
            ]
        );
        assert!(index.has_handlers(&HookPoint::Detect(Sense::Smell)));
        assert!(!index.has_handlers(&HookPoint::Detect(Sense::Taste)));
        assert_eq!(index.handler_count(&HookPoint::Score), 1);
        assert_eq!(index.get(&HookPoint::Score)[0].label(), "scorer");
    }
}
