//! Detection channels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The channel a [`Signal`](super::Signal) was detected through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    /// Visual detection (screenshots, cameras, UI state).
    Sight,
    /// Audio or textual detection (chat, logs, transcripts).
    Hearing,
    /// Interaction detection (clicks, API usage).
    Touch,
    /// Quality sampling (health checks, metrics).
    Taste,
    /// Pattern and anomaly detection.
    Smell,
}

impl Sense {
    /// Every sense, in declaration order.
    pub const ALL: [Sense; 5] = [
        Sense::Sight,
        Sense::Hearing,
        Sense::Touch,
        Sense::Taste,
        Sense::Smell,
    ];

    /// Returns the string name of this sense.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sight => "sight",
            Self::Hearing => "hearing",
            Self::Touch => "touch",
            Self::Taste => "taste",
            Self::Smell => "smell",
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sense {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sense::ALL
            .into_iter()
            .find(|sense| sense.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::new("sense", format!("unknown sense '{s}'")))
    }
}
