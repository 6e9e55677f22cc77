//! Stub action.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use reaper_core::models::{ActionResult, ScoredSignal};
use reaper_plugin::{ActionHandler, Plugin};

/// Action type reported by [`StubAction`].
pub const STUB_ACTION_TYPE: &str = "stub_action";

/// Reports a successful no-op action for every scored signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAction;

impl StubAction {
    /// Wraps the action in a plugin.
    pub fn plugin() -> Plugin {
        Plugin::action(Self)
    }
}

#[async_trait]
impl ActionHandler for StubAction {
    async fn act(&self, scored: &ScoredSignal) -> anyhow::Result<Option<ActionResult>> {
        debug!(score = scored.score(), "Stub action");
        let result = ActionResult::builder(scored.clone(), STUB_ACTION_TYPE, true)
            .result_data("description", json!("Stub action executed successfully"))
            .result_data("stub", json!(true))
            .build()?;
        Ok(Some(result))
    }
}
