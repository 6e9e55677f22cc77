//! Shared test helpers for dispatcher integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use reaper_core::config::{DispatchConfig, DispatchMode};
use reaper_plugin::prelude::*;
use reaper_plugin::{HookDispatcher, PluginRegistry};

/// Detector returning `count` signals tagged with `label` and their index.
pub fn counting_detector(sense: Sense, label: &'static str, count: usize) -> Plugin {
    Plugin::detection(
        sense,
        FnDetector::new(label, move |source| {
            (0..count)
                .map(|i| {
                    Signal::builder(sense, source)
                        .payload("plugin", serde_json::json!(label))
                        .payload("index", serde_json::json!(i))
                        .build()
                        .map_err(Into::into)
                })
                .collect()
        }),
    )
}

/// Scorer assigning a fixed score.
pub fn fixed_scorer(score: f64) -> Plugin {
    Plugin::scoring(FnScorer::new("fixed", move |signal| {
        Ok(Some(ScoredSignal::new(signal.clone(), score)?))
    }))
}

/// Detector that sleeps before returning one signal.
#[derive(Debug)]
pub struct SlowDetector {
    pub sense: Sense,
    pub delay: Duration,
    pub label: &'static str,
}

#[async_trait]
impl DetectionHandler for SlowDetector {
    async fn detect(&self, source: &str) -> anyhow::Result<Vec<Signal>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![
            Signal::builder(self.sense, source)
                .payload("plugin", serde_json::json!(self.label))
                .build()?,
        ])
    }
}

/// Reads the `plugin` payload entry written by the helpers above.
pub fn plugin_label(signal: &Signal) -> &str {
    signal
        .payload()
        .get("plugin")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
}

/// Dispatcher over a fresh registry.
pub fn dispatcher(mode: DispatchMode, timeout: Option<Duration>) -> HookDispatcher {
    let config = DispatchConfig::default()
        .with_mode(mode)
        .with_timeout(timeout);
    HookDispatcher::with_config(Arc::new(PluginRegistry::new()), config)
}
