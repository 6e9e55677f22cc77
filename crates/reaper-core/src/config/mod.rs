//! Configuration schemas.
//!
//! Every struct deserializes from TOML via the `config` crate and every
//! field has a default, so an empty file (or no file) is a valid
//! configuration. Nothing in the core reads configuration implicitly; the
//! caller loads a [`ReaperConfig`] and hands the sections to the components.

pub mod dispatch;
pub mod logging;
pub mod registry;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::dispatch::{DispatchConfig, DispatchMode};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::registry::RegistryConfig;

use crate::error::ReaperError;

/// Environment variable prefix for overrides, e.g. `REAPER__DISPATCH__MODE`.
pub const ENV_PREFIX: &str = "REAPER";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaperConfig {
    /// Dispatcher policy.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Registry limits.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReaperConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// The file may be missing. Values are then overlaid with environment
    /// variables prefixed with `REAPER__`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReaperError> {
        let path = path.as_ref();
        debug!(path = %path.display(), env_prefix = ENV_PREFIX, "Loading configuration");
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ReaperError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    /// Parse configuration from a TOML string, without environment overlay.
    pub fn from_toml_str(toml: &str) -> Result<Self, ReaperError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| ReaperError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, ReaperError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| ReaperError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        debug!(
            mode = ?parsed.dispatch.mode,
            plugin_timeout_ms = parsed.dispatch.plugin_timeout_ms,
            max_plugins = ?parsed.registry.max_plugins,
            log_level = %parsed.logging.level,
            "Configuration loaded"
        );
        Ok(parsed)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ReaperError> {
        if self.registry.max_plugins == Some(0) {
            return Err(ReaperError::configuration(
                "registry.max_plugins must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_loaded_configuration_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            ReaperConfig::from_toml_str("[dispatch]\nmode = \"concurrent\"\n")
        })
        .expect("parse");
        assert_eq!(config.dispatch.mode, DispatchMode::Concurrent);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Configuration loaded"), "{output}");
        assert!(output.contains("Concurrent"), "{output}");
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ReaperConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, ReaperConfig::default());
        assert_eq!(config.dispatch.mode, DispatchMode::Sequential);
        assert_eq!(config.dispatch.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.registry.max_plugins, None);
    }

    #[test]
    fn test_parse_sections() {
        let config = ReaperConfig::from_toml_str(
            r#"
            [dispatch]
            mode = "concurrent"
            plugin_timeout_ms = 0

            [registry]
            max_plugins = 8

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .expect("parse");
        assert_eq!(config.dispatch.mode, DispatchMode::Concurrent);
        assert_eq!(config.dispatch.timeout(), None);
        assert_eq!(config.registry.max_plugins, Some(8));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_zero_max_plugins_rejected() {
        let err = ReaperConfig::from_toml_str("[registry]\nmax_plugins = 0\n").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[dispatch]\nplugin_timeout_ms = 250").expect("write");

        let config = ReaperConfig::load(file.path()).expect("load");
        assert_eq!(config.dispatch.timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ReaperConfig::load(dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.registry, RegistryConfig::default());
    }
}
