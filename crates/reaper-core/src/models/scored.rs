//! Signals after evaluation by a scoring plugin.

use serde::{Deserialize, Serialize};

use super::{Attributes, Signal, validate_keys};
use crate::error::ValidationError;

/// A [`Signal`] plus a bounded evaluation.
///
/// `score` always lies in `[0.0, 1.0]`. Out-of-range scores are rejected,
/// never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoredSignal")]
pub struct ScoredSignal {
    signal: Signal,
    score: f64,
    analysis: Attributes,
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct RawScoredSignal {
    signal: Signal,
    score: f64,
    #[serde(default)]
    analysis: Attributes,
    #[serde(default)]
    tags: Vec<String>,
}

impl TryFrom<RawScoredSignal> for ScoredSignal {
    type Error = ValidationError;

    fn try_from(raw: RawScoredSignal) -> Result<Self, Self::Error> {
        ScoredSignal::validated(raw.signal, raw.score, raw.analysis, raw.tags)
    }
}

/// Coarse bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Score >= 0.7.
    High,
    /// Score >= 0.4.
    Medium,
    /// Anything lower.
    Low,
}

impl Priority {
    /// Buckets a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the tag used for this bucket.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::High => "high_priority",
            Self::Medium => "medium_priority",
            Self::Low => "low_priority",
        }
    }
}

impl ScoredSignal {
    /// Wraps a signal with a score and no analysis or tags.
    pub fn new(signal: Signal, score: f64) -> Result<Self, ValidationError> {
        Self::validated(signal, score, Attributes::new(), Vec::new())
    }

    /// Starts building a scored signal.
    pub fn builder(signal: Signal, score: f64) -> ScoredSignalBuilder {
        ScoredSignalBuilder {
            signal,
            score,
            analysis: Attributes::new(),
            tags: Vec::new(),
        }
    }

    fn validated(
        signal: Signal,
        score: f64,
        analysis: Attributes,
        tags: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ValidationError::new(
                "score",
                format!("must be within [0.0, 1.0], got {score}"),
            ));
        }
        validate_keys("analysis", &analysis)?;
        if let Some(pos) = tags.iter().position(|t| t.trim().is_empty()) {
            return Err(ValidationError::new(
                "tags",
                format!("tag at index {pos} is blank"),
            ));
        }
        Ok(Self {
            signal,
            score,
            analysis,
            tags,
        })
    }

    /// The original signal.
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// The score, in `[0.0, 1.0]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// How the score was derived.
    pub fn analysis(&self) -> &Attributes {
        &self.analysis
    }

    /// Classification labels, in the order the scorer added them.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns whether a tag is present.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Buckets the score.
    pub fn priority(&self) -> Priority {
        Priority::from_score(self.score)
    }

    /// Gives back the wrapped signal.
    pub fn into_signal(self) -> Signal {
        self.signal
    }
}

/// Builder for [`ScoredSignal`].
#[derive(Debug, Clone)]
pub struct ScoredSignalBuilder {
    signal: Signal,
    score: f64,
    analysis: Attributes,
    tags: Vec<String>,
}

impl ScoredSignalBuilder {
    /// Inserts an analysis value.
    pub fn analysis(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.analysis.insert(key.into(), value);
        self
    }

    /// Merges a whole analysis map.
    pub fn analysis_map(mut self, map: Attributes) -> Self {
        self.analysis.extend(map);
        self
    }

    /// Appends a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Appends several tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Validates and builds the scored signal.
    pub fn build(self) -> Result<ScoredSignal, ValidationError> {
        ScoredSignal::validated(self.signal, self.score, self.analysis, self.tags)
    }
}
