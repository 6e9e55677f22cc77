//! Hook point definitions and the static hook table.
//!
//! [`HOOK_SPECS`] is the one place that declares which operations exist, what
//! they take, what they return, and which pipeline role they belong to.
//! Adding a sense means adding a [`Sense`] variant and one entry here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use reaper_core::error::ReaperError;
use reaper_core::models::{ActionResult, ScoredSignal, Sense, Signal};

/// Identifier of a hook in the hook table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookPoint {
    /// Detection through one sense. Takes a source, returns signals.
    Detect(Sense),
    /// Scoring. Takes a signal, returns a scored signal.
    Score,
    /// Action. Takes a scored signal, returns an action result.
    Act,
}

/// Pipeline role a hook belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookRole {
    /// Produces [`Signal`]s.
    Detect,
    /// Produces [`ScoredSignal`]s.
    Score,
    /// Produces [`ActionResult`]s.
    Act,
}

/// Shape of the argument a hook is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentShape {
    /// A caller-chosen source identifier.
    Source,
    /// A [`Signal`].
    Signal,
    /// A [`ScoredSignal`].
    ScoredSignal,
}

/// Shape of what each plugin returns from a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// Zero or more [`Signal`]s, concatenated across plugins.
    Signals,
    /// At most one [`ScoredSignal`] per plugin.
    ScoredSignal,
    /// At most one [`ActionResult`] per plugin.
    ActionResult,
}

/// One entry in the hook table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSpec {
    /// The hook this entry describes.
    pub point: HookPoint,
    /// Canonical dispatch name.
    pub name: &'static str,
    /// Name accepted for compatibility with older orchestrators.
    pub alias: &'static str,
    /// Pipeline role.
    pub role: HookRole,
    /// Expected argument.
    pub argument: ArgumentShape,
    /// Expected return value.
    pub returns: ReturnShape,
    /// Human-readable summary.
    pub description: &'static str,
}

/// Number of hooks in [`HOOK_SPECS`].
pub const HOOK_COUNT: usize = Sense::ALL.len() + 2;

const fn detect_spec(
    sense: Sense,
    name: &'static str,
    alias: &'static str,
    description: &'static str,
) -> HookSpec {
    HookSpec {
        point: HookPoint::Detect(sense),
        name,
        alias,
        role: HookRole::Detect,
        argument: ArgumentShape::Source,
        returns: ReturnShape::Signals,
        description,
    }
}

/// The closed table of supported hooks.
///
/// Detection entries are ordered like [`Sense::ALL`], followed by scoring and
/// action.
pub static HOOK_SPECS: [HookSpec; HOOK_COUNT] = [
    detect_spec(
        Sense::Sight,
        "detect_sight",
        "reaper_sight_detect",
        "Visual detection of signals",
    ),
    detect_spec(
        Sense::Hearing,
        "detect_hearing",
        "reaper_hearing_detect",
        "Audio or textual detection of signals",
    ),
    detect_spec(
        Sense::Touch,
        "detect_touch",
        "reaper_touch_detect",
        "Interaction detection of signals",
    ),
    detect_spec(
        Sense::Taste,
        "detect_taste",
        "reaper_taste_detect",
        "Quality sampling detection of signals",
    ),
    detect_spec(
        Sense::Smell,
        "detect_smell",
        "reaper_smell_detect",
        "Pattern and anomaly detection of signals",
    ),
    HookSpec {
        point: HookPoint::Score,
        name: "score_signal",
        alias: "reaper_score_signal",
        role: HookRole::Score,
        argument: ArgumentShape::Signal,
        returns: ReturnShape::ScoredSignal,
        description: "Score a detected signal",
    },
    HookSpec {
        point: HookPoint::Act,
        name: "execute_action",
        alias: "reaper_action_execute",
        role: HookRole::Act,
        argument: ArgumentShape::ScoredSignal,
        returns: ReturnShape::ActionResult,
        description: "Act on a scored signal",
    },
];

impl HookPoint {
    fn index(&self) -> usize {
        match self {
            Self::Detect(sense) => *sense as usize,
            Self::Score => Sense::ALL.len(),
            Self::Act => Sense::ALL.len() + 1,
        }
    }

    /// Returns the table entry for this hook.
    pub fn spec(&self) -> &'static HookSpec {
        &HOOK_SPECS[self.index()]
    }

    /// Returns the canonical name of this hook.
    pub fn as_str(&self) -> &'static str {
        self.spec().name
    }

    /// Returns the pipeline role of this hook.
    pub fn role(&self) -> HookRole {
        self.spec().role
    }

    /// Returns the sense of a detection hook.
    pub fn sense(&self) -> Option<Sense> {
        match self {
            Self::Detect(sense) => Some(*sense),
            Self::Score | Self::Act => None,
        }
    }

    /// Iterates every hook in table order.
    pub fn all() -> impl Iterator<Item = HookPoint> {
        HOOK_SPECS.iter().map(|spec| spec.point)
    }

    /// Resolves a hook by canonical name or alias.
    pub fn from_name(name: &str) -> Result<Self, ReaperError> {
        HOOK_SPECS
            .iter()
            .find(|spec| spec.name == name || spec.alias == name)
            .map(|spec| spec.point)
            .ok_or_else(|| ReaperError::UnknownHook(name.to_string()))
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HookPoint {
    type Err = ReaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl Serialize for HookPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HookPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ArgumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Signal => write!(f, "signal"),
            Self::ScoredSignal => write!(f, "scored_signal"),
        }
    }
}

/// Arguments of a name-keyed dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum HookArgs {
    /// Source identifier for a detection hook.
    Source(String),
    /// Signal for the scoring hook.
    Signal(Signal),
    /// Scored signal for the action hook.
    ScoredSignal(ScoredSignal),
}

impl HookArgs {
    /// Returns the shape of these arguments.
    pub fn shape(&self) -> ArgumentShape {
        match self {
            Self::Source(_) => ArgumentShape::Source,
            Self::Signal(_) => ArgumentShape::Signal,
            Self::ScoredSignal(_) => ArgumentShape::ScoredSignal,
        }
    }
}

impl From<&str> for HookArgs {
    fn from(source: &str) -> Self {
        Self::Source(source.to_string())
    }
}

impl From<String> for HookArgs {
    fn from(source: String) -> Self {
        Self::Source(source)
    }
}

impl From<Signal> for HookArgs {
    fn from(signal: Signal) -> Self {
        Self::Signal(signal)
    }
}

impl From<ScoredSignal> for HookArgs {
    fn from(scored: ScoredSignal) -> Self {
        Self::ScoredSignal(scored)
    }
}

/// One aggregated item of a name-keyed dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HookValue {
    /// Produced by a detection hook.
    Signal(Signal),
    /// Produced by the scoring hook.
    ScoredSignal(ScoredSignal),
    /// Produced by the action hook.
    ActionResult(ActionResult),
}

impl HookValue {
    /// Returns the signal, if this is one.
    pub fn as_signal(&self) -> Option<&Signal> {
        match self {
            Self::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    /// Returns the scored signal, if this is one.
    pub fn as_scored_signal(&self) -> Option<&ScoredSignal> {
        match self {
            Self::ScoredSignal(scored) => Some(scored),
            _ => None,
        }
    }

    /// Returns the action result, if this is one.
    pub fn as_action_result(&self) -> Option<&ActionResult> {
        match self {
            Self::ActionResult(result) => Some(result),
            _ => None,
        }
    }
}

impl From<Signal> for HookValue {
    fn from(signal: Signal) -> Self {
        Self::Signal(signal)
    }
}

impl From<ScoredSignal> for HookValue {
    fn from(scored: ScoredSignal) -> Self {
        Self::ScoredSignal(scored)
    }
}

impl From<ActionResult> for HookValue {
    fn from(result: ActionResult) -> Self {
        Self::ActionResult(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaper_core::error::ErrorKind;

    #[test]
    fn test_table_is_indexed_by_point() {
        for (i, spec) in HOOK_SPECS.iter().enumerate() {
            assert_eq!(spec.point.index(), i, "{} out of place", spec.name);
            assert_eq!(spec.point.spec(), spec);
        }
    }

    #[test]
    fn test_seven_hooks_one_per_sense() {
        assert_eq!(HookPoint::all().count(), 7);
        for sense in Sense::ALL {
            let spec = HookPoint::Detect(sense).spec();
            assert_eq!(spec.role, HookRole::Detect);
            assert_eq!(spec.argument, ArgumentShape::Source);
            assert_eq!(spec.returns, ReturnShape::Signals);
            assert_eq!(spec.name, format!("detect_{sense}"));
        }
        assert_eq!(HookPoint::Score.spec().argument, ArgumentShape::Signal);
        assert_eq!(HookPoint::Act.spec().returns, ReturnShape::ActionResult);
    }

    #[test]
    fn test_names_and_aliases_resolve() {
        assert_eq!(
            HookPoint::from_name("detect_sight").expect("name"),
            HookPoint::Detect(Sense::Sight)
        );
        assert_eq!(
            HookPoint::from_name("reaper_action_execute").expect("alias"),
            HookPoint::Act
        );
        assert_eq!(
            "score_signal".parse::<HookPoint>().expect("parse"),
            HookPoint::Score
        );
    }

    #[test]
    fn test_unknown_hook() {
        let err = HookPoint::from_name("unknown_hook").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownHook);
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = HOOK_SPECS
            .iter()
            .flat_map(|spec| [spec.name, spec.alias])
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), HOOK_COUNT * 2);
    }

    #[test]
    fn test_hook_point_serde() {
        let json = serde_json::to_string(&HookPoint::Detect(Sense::Taste)).expect("serialize");
        assert_eq!(json, "\"detect_taste\"");
        let parsed: HookPoint = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, HookPoint::Detect(Sense::Taste));
        assert!(serde_json::from_str::<HookPoint>("\"detect_sound\"").is_err());
    }

    #[test]
    fn test_args_shape() {
        assert_eq!(HookArgs::from("s1").shape(), ArgumentShape::Source);
        let signal = Signal::new(Sense::Sight, "s1");
        assert_eq!(HookArgs::from(signal).shape(), ArgumentShape::Signal);
    }
}
