//! Dispatcher policy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How plugin invocations within one dispatch are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One plugin after another, in registration order.
    #[default]
    Sequential,
    /// All plugins polled together; results re-assembled in registration order.
    Concurrent,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Scheduling mode.
    #[serde(default)]
    pub mode: DispatchMode,
    /// Per-plugin invocation timeout in milliseconds. `0` disables it.
    ///
    /// Enforced only when dispatching inside a Tokio runtime with timers
    /// enabled.
    #[serde(default = "default_plugin_timeout_ms")]
    pub plugin_timeout_ms: u64,
}

impl DispatchConfig {
    /// Returns the per-plugin timeout, if enabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.plugin_timeout_ms > 0).then(|| Duration::from_millis(self.plugin_timeout_ms))
    }

    /// Sets the scheduling mode.
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the per-plugin timeout.
    ///
    /// `None` and a zero duration both disable it. A non-zero duration below
    /// one millisecond rounds up to 1 ms; durations beyond `u64::MAX`
    /// milliseconds saturate.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.plugin_timeout_ms = match timeout {
            None => 0,
            Some(t) if t.is_zero() => 0,
            Some(t) => u64::try_from(t.as_millis()).unwrap_or(u64::MAX).max(1),
        };
        self
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            plugin_timeout_ms: default_plugin_timeout_ms(),
        }
    }
}

fn default_plugin_timeout_ms() -> u64 {
    30_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = DispatchConfig::default();
        assert_eq!(config.mode, DispatchMode::Sequential);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_with_timeout_zero_disables() {
        let config = DispatchConfig::default().with_timeout(Some(Duration::ZERO));
        assert_eq!(config.plugin_timeout_ms, 0);
        assert_eq!(config.timeout(), None);
        assert_eq!(DispatchConfig::default().with_timeout(None).timeout(), None);
    }

    #[test]
    fn test_with_timeout_rounds_and_saturates() {
        let sub_ms = DispatchConfig::default().with_timeout(Some(Duration::from_micros(200)));
        assert_eq!(sub_ms.plugin_timeout_ms, 1);

        let exact = DispatchConfig::default().with_timeout(Some(Duration::from_millis(250)));
        assert_eq!(exact.timeout(), Some(Duration::from_millis(250)));

        let huge = DispatchConfig::default().with_timeout(Some(Duration::MAX));
        assert_eq!(huge.plugin_timeout_ms, u64::MAX);
    }
}
