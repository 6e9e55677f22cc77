//! Handler traits, one per pipeline role.
//!
//! A plugin implements any subset of these. Handlers report "nothing to
//! contribute" with an empty vector or `Ok(None)`; an `Err` or a panic is
//! isolated by the dispatcher and reported as a failure for that plugin only.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use reaper_core::models::{ActionResult, ScoredSignal, Signal};

/// Detection handler for one sense.
#[async_trait]
pub trait DetectionHandler: Send + Sync + fmt::Debug {
    /// Detects signals from `source`.
    ///
    /// Every returned signal must carry the sense the handler was bound to.
    async fn detect(&self, source: &str) -> anyhow::Result<Vec<Signal>>;
}

/// Scoring handler.
#[async_trait]
pub trait ScoringHandler: Send + Sync + fmt::Debug {
    /// Scores `signal`, or abstains with `Ok(None)`.
    ///
    /// The returned value must embed `signal` unchanged.
    async fn score(&self, signal: &Signal) -> anyhow::Result<Option<ScoredSignal>>;
}

/// Action handler.
#[async_trait]
pub trait ActionHandler: Send + Sync + fmt::Debug {
    /// Acts on `scored`, or abstains with `Ok(None)`.
    ///
    /// The returned value must embed `scored` unchanged.
    async fn act(&self, scored: &ScoredSignal) -> anyhow::Result<Option<ActionResult>>;
}

type DetectFn = dyn Fn(&str) -> anyhow::Result<Vec<Signal>> + Send + Sync;
type ScoreFn = dyn Fn(&Signal) -> anyhow::Result<Option<ScoredSignal>> + Send + Sync;
type ActFn = dyn Fn(&ScoredSignal) -> anyhow::Result<Option<ActionResult>> + Send + Sync;

/// Closure-based detection handler.
#[derive(Clone)]
pub struct FnDetector {
    label: String,
    handler: Arc<DetectFn>,
}

impl FnDetector {
    /// Wraps a closure.
    pub fn new<F>(label: &str, handler: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Vec<Signal>> + Send + Sync + 'static,
    {
        Self {
            label: label.to_string(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for FnDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDetector")
            .field("label", &self.label)
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl DetectionHandler for FnDetector {
    async fn detect(&self, source: &str) -> anyhow::Result<Vec<Signal>> {
        (self.handler)(source)
    }
}

/// Closure-based scoring handler.
#[derive(Clone)]
pub struct FnScorer {
    label: String,
    handler: Arc<ScoreFn>,
}

impl FnScorer {
    /// Wraps a closure.
    pub fn new<F>(label: &str, handler: F) -> Self
    where
        F: Fn(&Signal) -> anyhow::Result<Option<ScoredSignal>> + Send + Sync + 'static,
    {
        Self {
            label: label.to_string(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for FnScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnScorer")
            .field("label", &self.label)
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl ScoringHandler for FnScorer {
    async fn score(&self, signal: &Signal) -> anyhow::Result<Option<ScoredSignal>> {
        (self.handler)(signal)
    }
}

/// Closure-based action handler.
#[derive(Clone)]
pub struct FnActor {
    label: String,
    handler: Arc<ActFn>,
}

impl FnActor {
    /// Wraps a closure.
    pub fn new<F>(label: &str, handler: F) -> Self
    where
        F: Fn(&ScoredSignal) -> anyhow::Result<Option<ActionResult>> + Send + Sync + 'static,
    {
        Self {
            label: label.to_string(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for FnActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnActor")
            .field("label", &self.label)
            .field("handler", &"<closure>")
            .finish()
    }
}

#[async_trait]
impl ActionHandler for FnActor {
    async fn act(&self, scored: &ScoredSignal) -> anyhow::Result<Option<ActionResult>> {
        (self.handler)(scored)
    }
}
