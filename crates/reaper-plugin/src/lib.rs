//! # reaper-plugin
//!
//! Plugin framework for the REAPER pipeline. Provides:
//!
//! - A closed hook table (five detectors, a scorer, an action)
//! - Typed handler traits, one per pipeline role
//! - A registry preserving registration order, with snapshot reads
//! - A dispatcher that aggregates results and isolates plugin failures
//! - A [`PluginManager`] facade over both

pub mod hooks;
pub mod macros;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use hooks::definitions::{HookArgs, HookPoint, HookRole, HookSpec, HookValue, HOOK_SPECS};
pub use hooks::dispatcher::{DispatchOutcome, HookDispatcher, InvocationError, PluginFailure};
pub use manager::PluginManager;
pub use registry::{Plugin, PluginBuilder, PluginEntry, PluginId, PluginRegistry, RegistrySnapshot};
pub use traits::{ActionHandler, DetectionHandler, FnActor, FnDetector, FnScorer, ScoringHandler};

#[doc(hidden)]
pub use serde_json;
