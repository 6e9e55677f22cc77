//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use reaper_core::error::{ReaperError, ValidationError};
pub use reaper_core::models::{ActionResult, Attributes, Priority, ScoredSignal, Sense, Signal};
pub use reaper_core::result::ReaperResult;

pub use crate::hooks::definitions::{HookArgs, HookPoint, HookValue};
pub use crate::hooks::dispatcher::{DispatchOutcome, InvocationError, PluginFailure};
pub use crate::manager::PluginManager;
pub use crate::registry::{Plugin, PluginId};
pub use crate::traits::{
    ActionHandler, DetectionHandler, FnActor, FnDetector, FnScorer, ScoringHandler,
};

pub use crate::attributes;
