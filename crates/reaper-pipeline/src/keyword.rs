//! Keyword-matching scorer.
//!
//! Scores a signal by the keywords that appear anywhere in its payload.
//! Matching is a case-insensitive substring search over:
//!
//! - string values, lowercased
//! - the JSON text of array and object values, lowercased
//!
//! Numbers, booleans and nulls are ignored. Each matched keyword adds its
//! tier weight to the score, and the total is capped at 1.0.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use reaper_core::models::{Attributes, Priority, ScoredSignal, Signal};
use reaper_plugin::{Plugin, ScoringHandler};

/// Default high priority keywords.
pub const DEFAULT_HIGH_PRIORITY: [&str; 5] = ["urgent", "critical", "blocker", "emergency", "broken"];
/// Default medium priority keywords.
pub const DEFAULT_MEDIUM_PRIORITY: [&str; 5] = ["bug", "issue", "problem", "error", "failure"];
/// Default low priority keywords.
pub const DEFAULT_LOW_PRIORITY: [&str; 5] = ["todo", "improvement", "enhancement", "minor", "question"];

const HIGH_WEIGHT: f64 = 0.3;
const MEDIUM_WEIGHT: f64 = 0.2;
const LOW_WEIGHT: f64 = 0.1;

/// Tag added when no keyword matched.
pub const NO_KEYWORDS_TAG: &str = "no_keywords";

/// Scores signals by keyword matches in their payload.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    high_priority: Vec<String>,
    medium_priority: Vec<String>,
    low_priority: Vec<String>,
}

/// Keywords from each tier found in one signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatches {
    /// Matched high priority keywords, in list order.
    pub high: Vec<String>,
    /// Matched medium priority keywords, in list order.
    pub medium: Vec<String>,
    /// Matched low priority keywords, in list order.
    pub low: Vec<String>,
}

impl KeywordMatches {
    /// Total number of matched keywords.
    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }

    /// Weighted score, capped at 1.0.
    pub fn score(&self) -> f64 {
        let mut score = 0.0;
        score += self.high.len() as f64 * HIGH_WEIGHT;
        score += self.medium.len() as f64 * MEDIUM_WEIGHT;
        score += self.low.len() as f64 * LOW_WEIGHT;
        score.min(1.0)
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self {
            high_priority: to_owned(&DEFAULT_HIGH_PRIORITY),
            medium_priority: to_owned(&DEFAULT_MEDIUM_PRIORITY),
            low_priority: to_owned(&DEFAULT_LOW_PRIORITY),
        }
    }
}

impl KeywordScorer {
    /// Creates a scorer with the default keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the high priority keywords. An empty list keeps the current one.
    pub fn with_high_priority<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        replace_if_nonempty(&mut self.high_priority, keywords);
        self
    }

    /// Replaces the medium priority keywords. An empty list keeps the current one.
    pub fn with_medium_priority<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        replace_if_nonempty(&mut self.medium_priority, keywords);
        self
    }

    /// Replaces the low priority keywords. An empty list keeps the current one.
    pub fn with_low_priority<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        replace_if_nonempty(&mut self.low_priority, keywords);
        self
    }

    /// High priority keywords.
    pub fn high_priority(&self) -> &[String] {
        &self.high_priority
    }

    /// Medium priority keywords.
    pub fn medium_priority(&self) -> &[String] {
        &self.medium_priority
    }

    /// Low priority keywords.
    pub fn low_priority(&self) -> &[String] {
        &self.low_priority
    }

    /// Wraps the scorer in a plugin.
    pub fn into_plugin(self) -> Plugin {
        Plugin::scoring(self)
    }

    /// Finds the keywords present in a payload.
    pub fn find_matches(&self, payload: &Attributes) -> KeywordMatches {
        let text = extract_text(payload);
        let matching = |keywords: &[String]| -> Vec<String> {
            keywords
                .iter()
                .filter(|kw| text.contains(&kw.to_lowercase()))
                .cloned()
                .collect()
        };
        KeywordMatches {
            high: matching(&self.high_priority),
            medium: matching(&self.medium_priority),
            low: matching(&self.low_priority),
        }
    }

    /// Scores one signal.
    pub fn evaluate(&self, signal: &Signal) -> anyhow::Result<ScoredSignal> {
        let matches = self.find_matches(signal.payload());
        let score = matches.score();
        let priority = Priority::from_score(score);

        debug!(
            source = signal.source(),
            score,
            total_matches = matches.total(),
            "Keyword scoring"
        );

        let mut builder = ScoredSignal::builder(signal.clone(), score)
            .analysis("method", json!("keyword_matching"))
            .analysis("high_priority_matches", json!(matches.high))
            .analysis("medium_priority_matches", json!(matches.medium))
            .analysis("low_priority_matches", json!(matches.low))
            .analysis("total_matches", json!(matches.total()))
            .tag(priority.as_tag());
        if matches.total() == 0 {
            builder = builder.tag(NO_KEYWORDS_TAG);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl ScoringHandler for KeywordScorer {
    async fn score(&self, signal: &Signal) -> anyhow::Result<Option<ScoredSignal>> {
        self.evaluate(signal).map(Some)
    }
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|kw| kw.to_string()).collect()
}

fn replace_if_nonempty<I, S>(target: &mut Vec<String>, keywords: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
    if !keywords.is_empty() {
        *target = keywords;
    }
}

fn extract_text(payload: &Attributes) -> String {
    payload
        .values()
        .filter_map(|value| match value {
            Value::String(s) => Some(s.to_lowercase()),
            Value::Array(_) | Value::Object(_) => Some(value.to_string().to_lowercase()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
