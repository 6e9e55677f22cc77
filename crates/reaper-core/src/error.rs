//! Unified error types for REAPER.
//!
//! Contract violations are surfaced as [`ValidationError`] at construction
//! time. Everything the registry and dispatcher can fail with is mapped into
//! [`ReaperError`] so callers can propagate with `?`.

use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A data contract invariant was violated.
    Validation,
    /// A hook name is not in the hook table.
    UnknownHook,
    /// Dispatch arguments do not match the hook's declared shape.
    InvalidArguments,
    /// The plugin is not registered.
    PluginNotFound,
    /// The plugin instance or name is already registered.
    DuplicatePlugin,
    /// A plugin failed while being invoked.
    PluginInvocation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::UnknownHook => write!(f, "UNKNOWN_HOOK"),
            Self::InvalidArguments => write!(f, "INVALID_ARGUMENTS"),
            Self::PluginNotFound => write!(f, "PLUGIN_NOT_FOUND"),
            Self::DuplicatePlugin => write!(f, "DUPLICATE_PLUGIN"),
            Self::PluginInvocation => write!(f, "PLUGIN_INVOCATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// A data contract invariant was violated.
///
/// Names the offending field and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error("invalid `{field}`: {constraint}")]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The constraint that was violated.
    pub constraint: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

/// The unified error used across the REAPER crates.
#[derive(Debug, Error)]
pub enum ReaperError {
    /// A data contract invariant was violated.
    #[error("VALIDATION: {0}")]
    Validation(#[from] ValidationError),

    /// `dispatch` was called with a hook name absent from the table.
    #[error("UNKNOWN_HOOK: no hook named '{0}'")]
    UnknownHook(String),

    /// The dispatch arguments do not match the hook's argument shape.
    #[error("INVALID_ARGUMENTS: hook '{hook}' expects {expected}, got {actual}")]
    InvalidArguments {
        /// Hook name.
        hook: String,
        /// Expected argument shape.
        expected: String,
        /// Supplied argument shape.
        actual: String,
    },

    /// `unregister` was called with a plugin that is not registered.
    #[error("PLUGIN_NOT_FOUND: {0}")]
    PluginNotFound(String),

    /// The plugin instance or its name is already registered.
    #[error("DUPLICATE_PLUGIN: {0}")]
    DuplicatePlugin(String),

    /// An isolated plugin failure was escalated by the caller.
    #[error("PLUGIN_INVOCATION: plugin '{plugin}' failed on '{hook}': {message}")]
    PluginInvocation {
        /// Plugin label (name or id).
        plugin: String,
        /// Hook name.
        hook: String,
        /// Failure description.
        message: String,
    },

    /// A configuration error occurred.
    #[error("CONFIGURATION: {0}")]
    Configuration(String),

    /// A serialization/deserialization error occurred.
    #[error("SERIALIZATION: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReaperError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownHook(_) => ErrorKind::UnknownHook,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::PluginNotFound(_) => ErrorKind::PluginNotFound,
            Self::DuplicatePlugin(_) => ErrorKind::DuplicatePlugin,
            Self::PluginInvocation { .. } => ErrorKind::PluginInvocation,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a plugin-not-found error.
    pub fn plugin_not_found(message: impl Into<String>) -> Self {
        Self::PluginNotFound(message.into())
    }

    /// Create a duplicate-plugin error.
    pub fn duplicate_plugin(message: impl Into<String>) -> Self {
        Self::DuplicatePlugin(message.into())
    }
}

impl From<config::ConfigError> for ReaperError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(format!("Configuration error: {err}"))
    }
}
