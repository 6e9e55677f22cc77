//! Data contracts passed between pipeline stages.
//!
//! Every record is validated when it is built and again when it is
//! deserialized. None of them can be mutated afterwards; a later stage wraps
//! the earlier record in a new value instead.

pub mod action;
pub mod scored;
pub mod sense;
pub mod signal;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ValidationError;
use crate::result::ReaperResult;

pub use action::{ActionResult, ActionResultBuilder};
pub use scored::{Priority, ScoredSignal, ScoredSignalBuilder};
pub use sense::Sense;
pub use signal::{Signal, SignalBuilder};

/// Open key/value mapping carried by every record.
///
/// Ordered so the serialized form is canonical.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Serializes a record into its canonical JSON form.
pub fn to_json<T: Serialize>(value: &T) -> ReaperResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Parses a record from JSON, running the same validation as construction.
pub fn from_json<T: DeserializeOwned>(json: &str) -> ReaperResult<T> {
    Ok(serde_json::from_str(json)?)
}

pub(crate) fn validate_keys(field: &str, map: &Attributes) -> Result<(), ValidationError> {
    if map.keys().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::new(field, "keys must not be blank"));
    }
    Ok(())
}
