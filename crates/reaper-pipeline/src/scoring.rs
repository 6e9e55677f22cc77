//! Stub scorer.

use async_trait::async_trait;
use serde_json::json;

use reaper_core::models::{ScoredSignal, Signal};
use reaper_plugin::{Plugin, ScoringHandler};

/// Neutral score assigned by [`StubScorer`].
pub const STUB_SCORE: f64 = 0.5;

/// Scores every signal at [`STUB_SCORE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StubScorer;

impl StubScorer {
    /// Wraps the scorer in a plugin.
    pub fn plugin() -> Plugin {
        Plugin::scoring(Self)
    }
}

#[async_trait]
impl ScoringHandler for StubScorer {
    async fn score(&self, signal: &Signal) -> anyhow::Result<Option<ScoredSignal>> {
        let scored = ScoredSignal::builder(signal.clone(), STUB_SCORE)
            .analysis("description", json!("Stub scoring applied"))
            .analysis("stub", json!(true))
            .tag("stub")
            .build()?;
        Ok(Some(scored))
    }
}
