//! # reaper-pipeline
//!
//! Reference plugins for every REAPER hook:
//!
//! - Stub detectors for the five senses
//! - A stub scorer and a stub action
//! - [`KeywordScorer`], a working keyword-matching scorer

pub mod action;
pub mod keyword;
pub mod scoring;
pub mod senses;

pub use action::StubAction;
pub use keyword::{KeywordMatches, KeywordScorer};
pub use scoring::StubScorer;
pub use senses::{HearingPlugin, SightPlugin, SmellPlugin, TastePlugin, TouchPlugin};

use tracing::info;

use reaper_core::result::ReaperResult;
use reaper_plugin::{Plugin, PluginId, PluginManager};

/// The stub plugins with their conventional names, in pipeline order.
pub fn stub_plugins() -> Vec<(&'static str, Plugin)> {
    vec![
        ("sight", SightPlugin::plugin()),
        ("hearing", HearingPlugin::plugin()),
        ("touch", TouchPlugin::plugin()),
        ("taste", TastePlugin::plugin()),
        ("smell", SmellPlugin::plugin()),
        ("scoring", StubScorer::plugin()),
        ("action", StubAction::plugin()),
    ]
}

/// Registers every stub plugin under its conventional name.
pub fn register_stubs(manager: &PluginManager) -> ReaperResult<Vec<PluginId>> {
    let ids = stub_plugins()
        .into_iter()
        .map(|(name, plugin)| manager.register_plugin(plugin, Some(name)))
        .collect::<ReaperResult<Vec<_>>>()?;
    info!(count = ids.len(), "Stub plugins registered");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaper_core::error::ErrorKind;

    #[test]
    fn test_register_stubs_once() {
        let manager = PluginManager::new();
        let ids = register_stubs(&manager).unwrap();
        assert_eq!(ids.len(), 7);
        assert_eq!(manager.plugin_count(), 7);

        let names: Vec<_> = manager
            .list_plugins()
            .iter()
            .filter_map(|entry| entry.name().map(str::to_string))
            .collect();
        assert_eq!(
            names,
            ["sight", "hearing", "touch", "taste", "smell", "scoring", "action"]
        );

        let err = register_stubs(&manager).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatePlugin);
    }
}
