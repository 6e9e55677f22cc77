//! Hook system: specification table, per-hook handler index, and dispatcher.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{
    ArgumentShape, HOOK_COUNT, HOOK_SPECS, HookArgs, HookPoint, HookRole, HookSpec, HookValue,
    ReturnShape,
};
pub use dispatcher::{DispatchOutcome, HookDispatcher, InvocationError, PluginFailure};
pub use registry::{BoundHandler, HookBinding, HookIndex};
