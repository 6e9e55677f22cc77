//! Stub detectors, one per sense.
//!
//! Each returns a single signal for the requested source. Real detectors
//! replace these; they exist as templates and to exercise the full pipeline.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use reaper_core::models::{Sense, Signal};
use reaper_plugin::{DetectionHandler, Plugin};

macro_rules! stub_detector {
    ($(#[$doc:meta])* $name:ident, $sense:expr, $description:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            /// Sense this detector reports.
            pub const SENSE: Sense = $sense;

            /// Wraps the detector in a plugin bound to its sense.
            pub fn plugin() -> Plugin {
                Plugin::detection(Self::SENSE, Self)
            }
        }

        #[async_trait]
        impl DetectionHandler for $name {
            async fn detect(&self, source: &str) -> anyhow::Result<Vec<Signal>> {
                debug!(sense = %Self::SENSE, source, plugin = stringify!($name), "Stub detection");
                let signal = Signal::builder(Self::SENSE, source)
                    .payload("description", json!($description))
                    .payload("stub", json!(true))
                    .metadata("plugin", json!(stringify!($name)))
                    .build()?;
                Ok(vec![signal])
            }
        }
    };
}

stub_detector!(
    /// Visual detection stub.
    SightPlugin,
    Sense::Sight,
    "Stub visual signal detected"
);
stub_detector!(
    /// Audio and text detection stub.
    HearingPlugin,
    Sense::Hearing,
    "Stub audio/textual signal detected"
);
stub_detector!(
    /// Physical interaction detection stub.
    TouchPlugin,
    Sense::Touch,
    "Stub physical/interaction signal detected"
);
stub_detector!(
    /// Quality sampling detection stub.
    TastePlugin,
    Sense::Taste,
    "Stub quality/sampling signal detected"
);
stub_detector!(
    /// Pattern and anomaly detection stub.
    SmellPlugin,
    Sense::Smell,
    "Stub pattern/anomaly signal detected"
);
