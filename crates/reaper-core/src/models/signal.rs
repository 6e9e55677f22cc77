//! Raw signals produced by detection plugins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, Sense, validate_keys};
use crate::error::ValidationError;

/// One observed unit of potential interest.
///
/// `created_at` is stamped when the signal is built and cannot be chosen by
/// the producing plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSignal")]
pub struct Signal {
    sense: Sense,
    source: String,
    created_at: DateTime<Utc>,
    payload: Attributes,
    metadata: Attributes,
}

/// Unvalidated wire form of [`Signal`].
#[derive(Deserialize)]
struct RawSignal {
    sense: Sense,
    source: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    payload: Attributes,
    #[serde(default)]
    metadata: Attributes,
}

impl TryFrom<RawSignal> for Signal {
    type Error = ValidationError;

    fn try_from(raw: RawSignal) -> Result<Self, Self::Error> {
        Signal::validated(
            raw.sense,
            raw.source,
            raw.created_at,
            raw.payload,
            raw.metadata,
        )
    }
}

impl Signal {
    /// Creates a signal with empty payload and metadata.
    pub fn new(sense: Sense, source: impl Into<String>) -> Self {
        Self {
            sense,
            source: source.into(),
            created_at: Utc::now(),
            payload: Attributes::new(),
            metadata: Attributes::new(),
        }
    }

    /// Starts building a signal.
    pub fn builder(sense: Sense, source: impl Into<String>) -> SignalBuilder {
        SignalBuilder {
            sense,
            source: source.into(),
            payload: Attributes::new(),
            metadata: Attributes::new(),
        }
    }

    /// Builds several signals that share one timestamp, drawn once.
    ///
    /// Each item is `(source, payload)`.
    pub fn batch<I, S>(sense: Sense, items: I) -> Result<Vec<Signal>, ValidationError>
    where
        I: IntoIterator<Item = (S, Attributes)>,
        S: Into<String>,
    {
        let created_at = Utc::now();
        items
            .into_iter()
            .map(|(source, payload)| {
                Signal::validated(sense, source.into(), created_at, payload, Attributes::new())
            })
            .collect()
    }

    fn validated(
        sense: Sense,
        source: String,
        created_at: DateTime<Utc>,
        payload: Attributes,
        metadata: Attributes,
    ) -> Result<Self, ValidationError> {
        validate_keys("payload", &payload)?;
        validate_keys("metadata", &metadata)?;
        Ok(Self {
            sense,
            source,
            created_at,
            payload,
            metadata,
        })
    }

    /// Which sense detected this signal.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Where the signal originated, as supplied by the caller.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// When the signal was built (UTC).
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Detection-specific data.
    pub fn payload(&self) -> &Attributes {
        &self.payload
    }

    /// Cross-cutting annotations.
    pub fn metadata(&self) -> &Attributes {
        &self.metadata
    }
}

/// Builder for [`Signal`].
#[derive(Debug, Clone)]
pub struct SignalBuilder {
    sense: Sense,
    source: String,
    payload: Attributes,
    metadata: Attributes,
}

impl SignalBuilder {
    /// Inserts a payload value.
    pub fn payload(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Merges a whole payload map.
    pub fn payload_map(mut self, map: Attributes) -> Self {
        self.payload.extend(map);
        self
    }

    /// Inserts a metadata value.
    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Merges a whole metadata map.
    pub fn metadata_map(mut self, map: Attributes) -> Self {
        self.metadata.extend(map);
        self
    }

    /// Validates and stamps the signal.
    pub fn build(self) -> Result<Signal, ValidationError> {
        Signal::validated(
            self.sense,
            self.source,
            Utc::now(),
            self.payload,
            self.metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signal_minimal_defaults() {
        let before = Utc::now();
        let signal = Signal::new(Sense::Sight, "minimal");
        assert_eq!(signal.sense(), Sense::Sight);
        assert_eq!(signal.source(), "minimal");
        assert!(signal.payload().is_empty());
        assert!(signal.metadata().is_empty());
        assert!(signal.created_at() >= before);
    }

    #[test]
    fn test_empty_source_is_accepted() {
        let signal = Signal::builder(Sense::Touch, "").build().expect("build");
        assert_eq!(signal.source(), "");
    }

    #[test]
    fn test_builder_rejects_blank_keys() {
        let err = Signal::builder(Sense::Hearing, "chat")
            .payload(" ", json!(1))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "payload");

        let err = Signal::builder(Sense::Hearing, "chat")
            .metadata("", json!("x"))
            .build()
            .unwrap_err();
        assert_eq!(err.field, "metadata");
    }

    #[test]
    fn test_large_payload() {
        let payload: Attributes = (0..1000)
            .map(|i| (format!("key_{i}"), json!(format!("value_{i}"))))
            .collect();
        let signal = Signal::builder(Sense::Hearing, "large-data")
            .payload_map(payload)
            .build()
            .expect("build");
        assert_eq!(signal.payload().len(), 1000);
        assert_eq!(signal.payload()["key_500"], json!("value_500"));
    }

    #[test]
    fn test_batch_shares_timestamp() {
        let signals = Signal::batch(
            Sense::Sight,
            vec![("cam1", Attributes::new()), ("cam2", Attributes::new())],
        )
        .expect("batch");
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].created_at(), signals[1].created_at());
        assert_eq!(signals[1].source(), "cam2");
    }

    #[test]
    fn test_serde_roundtrip() {
        let signal = Signal::builder(Sense::Smell, "error-logs")
            .payload("count", json!(3))
            .payload("nested", json!({"a": [1, 2.5, null]}))
            .metadata("plugin", json!("SmellPlugin"))
            .build()
            .expect("build");
        let json = serde_json::to_string(&signal).expect("serialize");
        let parsed: Signal = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(signal, parsed);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"sense":"sight","source":"s","created_at":"2024-01-01T00:00:00Z","payload":{"":1}}"#;
        assert!(serde_json::from_str::<Signal>(json).is_err());

        let json = r#"{"sense":"sight","source":"s","created_at":"2024-01-01T00:00:00Z"}"#;
        let signal: Signal = serde_json::from_str(json).expect("defaults apply");
        assert!(signal.payload().is_empty());
    }
}
