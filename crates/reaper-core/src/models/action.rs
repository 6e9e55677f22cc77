//! Outcomes reported by action plugins.

use serde::{Deserialize, Serialize};

use super::{Attributes, ScoredSignal, validate_keys};
use crate::error::ValidationError;

/// The outcome of acting on a [`ScoredSignal`].
///
/// `error` is only ever set when `success` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawActionResult")]
pub struct ActionResult {
    scored_signal: ScoredSignal,
    action_type: String,
    success: bool,
    result_data: Attributes,
    metadata: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct RawActionResult {
    scored_signal: ScoredSignal,
    action_type: String,
    success: bool,
    #[serde(default)]
    result_data: Attributes,
    #[serde(default)]
    metadata: Attributes,
    #[serde(default)]
    error: Option<String>,
}

impl TryFrom<RawActionResult> for ActionResult {
    type Error = ValidationError;

    fn try_from(raw: RawActionResult) -> Result<Self, Self::Error> {
        ActionResult::validated(
            raw.scored_signal,
            raw.action_type,
            raw.success,
            raw.result_data,
            raw.metadata,
            raw.error,
        )
    }
}

impl ActionResult {
    /// A successful action with no extra data.
    pub fn succeeded(
        scored_signal: ScoredSignal,
        action_type: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::builder(scored_signal, action_type, true).build()
    }

    /// A failed action carrying an error message.
    pub fn failed(
        scored_signal: ScoredSignal,
        action_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::builder(scored_signal, action_type, false)
            .error(error)
            .build()
    }

    /// Starts building an action result.
    pub fn builder(
        scored_signal: ScoredSignal,
        action_type: impl Into<String>,
        success: bool,
    ) -> ActionResultBuilder {
        ActionResultBuilder {
            scored_signal,
            action_type: action_type.into(),
            success,
            result_data: Attributes::new(),
            metadata: Attributes::new(),
            error: None,
        }
    }

    fn validated(
        scored_signal: ScoredSignal,
        action_type: String,
        success: bool,
        result_data: Attributes,
        metadata: Attributes,
        error: Option<String>,
    ) -> Result<Self, ValidationError> {
        if action_type.trim().is_empty() {
            return Err(ValidationError::new("action_type", "must not be blank"));
        }
        if success && error.is_some() {
            return Err(ValidationError::new(
                "error",
                "must be absent when success is true",
            ));
        }
        validate_keys("result_data", &result_data)?;
        validate_keys("metadata", &metadata)?;
        Ok(Self {
            scored_signal,
            action_type,
            success,
            result_data,
            metadata,
            error,
        })
    }

    /// The scored signal that was acted on.
    pub fn scored_signal(&self) -> &ScoredSignal {
        &self.scored_signal
    }

    /// What kind of action was attempted.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Whether the action succeeded.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Action-specific detail.
    pub fn result_data(&self) -> &Attributes {
        &self.result_data
    }

    /// Cross-cutting annotations.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }

    /// Failure description, only when `success` is false.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Builder for [`ActionResult`].
#[derive(Debug, Clone)]
pub struct ActionResultBuilder {
    scored_signal: ScoredSignal,
    action_type: String,
    success: bool,
    result_data: Attributes,
    metadata: Attributes,
    error: Option<String>,
}

impl ActionResultBuilder {
    /// Inserts a result value.
    pub fn result_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.result_data.insert(key.into(), value);
        self
    }

    /// Inserts a metadata value.
    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sets the error message.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Validates and builds the action result.
    pub fn build(self) -> Result<ActionResult, ValidationError> {
        ActionResult::validated(
            self.scored_signal,
            self.action_type,
            self.success,
            self.result_data,
            self.metadata,
            self.error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sense, Signal};
    use serde_json::json;

    fn scored(score: f64) -> ScoredSignal {
        ScoredSignal::new(Signal::new(Sense::Smell, "test"), score).expect("scored")
    }

    #[test]
    fn test_success_has_no_error() {
        let result = ActionResult::builder(scored(0.8), "test_action", true)
            .result_data("status", json!("completed"))
            .build()
            .expect("build");
        assert!(result.success());
        assert_eq!(result.error(), None);
        assert_eq!(result.result_data()["status"], json!("completed"));
    }

    #[test]
    fn test_failure_carries_error() {
        let result =
            ActionResult::failed(scored(0.3), "test_action", "Something went wrong").expect("build");
        assert!(!result.success());
        assert_eq!(result.error(), Some("Something went wrong"));
    }

    #[test]
    fn test_failure_without_error_is_allowed() {
        let result = ActionResult::builder(scored(0.3), "notify", false)
            .build()
            .expect("build");
        assert_eq!(result.error(), None);
    }

    #[test]
    fn test_error_on_success_rejected() {
        let err = ActionResult::builder(scored(0.3), "notify", true)
            .error("oops")
            .build()
            .unwrap_err();
        assert_eq!(err.field, "error");
    }

    #[test]
    fn test_blank_action_type_rejected() {
        let err = ActionResult::succeeded(scored(0.3), "").unwrap_err();
        assert_eq!(err.field, "action_type");
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = ActionResult::builder(scored(0.95), "open_ticket", false)
            .result_data("attempts", json!(2))
            .metadata("plugin", json!("ActionPlugin"))
            .error("timeout")
            .build()
            .expect("build");
        let json = serde_json::to_string(&result).expect("serialize");
        let parsed: ActionResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(result, parsed);
    }
}
